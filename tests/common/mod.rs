//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use farm_finance::api;
use farm_finance::auth::{Claims, JwtVerifier};
use farm_finance::store::{FinanceStore, MemoryFinanceStore, StoreError, UpsertOutcome};
use farm_finance::{AppState, FinanceData, FinanceRecord};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_AUDIENCE: &str = "authenticated";

/// Full application over an in-memory store. The store is returned so tests
/// can inspect what was (or was not) written.
pub fn test_app() -> (Router, Arc<MemoryFinanceStore>) {
    let store = Arc::new(MemoryFinanceStore::new());
    (app_with_store(store.clone()), store)
}

pub fn app_with_store(store: Arc<dyn FinanceStore>) -> Router {
    let verifier = Arc::new(JwtVerifier::new(TEST_SECRET, Some(TEST_AUDIENCE)));
    api::build_app(AppState::new(store, verifier))
}

fn sign(claims: &Claims) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Access token for `user_id`, valid for an hour
pub fn token_for(user_id: Uuid) -> String {
    let exp = (chrono::Utc::now().timestamp() + 3600) as usize;
    sign(&Claims::new(user_id, exp).with_audience(TEST_AUDIENCE))
}

pub fn expired_token_for(user_id: Uuid) -> String {
    let exp = (chrono::Utc::now().timestamp() - 3600) as usize;
    sign(&Claims::new(user_id, exp).with_audience(TEST_AUDIENCE))
}

/// Store whose every call fails with `message`
pub struct FailingStore {
    pub message: String,
}

impl FailingStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn fail(&self) -> StoreError {
        StoreError::Unavailable(self.message.clone())
    }
}

#[async_trait]
impl FinanceStore for FailingStore {
    async fn find_by_user(&self, _: Uuid) -> Result<Option<FinanceRecord>, StoreError> {
        Err(self.fail())
    }

    async fn upsert(&self, _: Uuid, _: FinanceData) -> Result<UpsertOutcome, StoreError> {
        Err(self.fail())
    }

    async fn delete_by_user(&self, _: Uuid) -> Result<bool, StoreError> {
        Err(self.fail())
    }
}

/// Store that panics on every call, for exercising the panic boundary
pub struct PanickingStore;

#[async_trait]
impl FinanceStore for PanickingStore {
    async fn find_by_user(&self, _: Uuid) -> Result<Option<FinanceRecord>, StoreError> {
        panic!("connection string postgres://admin:hunter2@db leaked")
    }

    async fn upsert(&self, _: Uuid, _: FinanceData) -> Result<UpsertOutcome, StoreError> {
        panic!("upsert exploded")
    }

    async fn delete_by_user(&self, _: Uuid) -> Result<bool, StoreError> {
        panic!("delete exploded")
    }
}

/// Connect to `DATABASE_URL` and make sure the schema exists.
///
/// Tables are not truncated: tests run concurrently and each one works on
/// its own random user ids.
pub async fn setup_test_db() -> sqlx::PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::query(include_str!("../../migrations/001_create_farm_finance.sql"))
        .execute(&pool)
        .await
        .expect("Failed to apply migration");

    pool
}
