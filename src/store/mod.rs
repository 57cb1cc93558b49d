//! Finance Store module
//!
//! Persistence for finance records, keyed by owner.
//! `PgFinanceStore` is used by the server; `MemoryFinanceStore` backs tests
//! and local runs without a database.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{FinanceData, FinanceRecord};

pub use error::StoreError;
pub use memory::MemoryFinanceStore;
pub use postgres::PgFinanceStore;

/// Result of an upsert
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub record: FinanceRecord,
    /// True when no record existed for the owner before this call
    pub created: bool,
}

/// Record store holding at most one finance record per user.
#[async_trait]
pub trait FinanceStore: Send + Sync {
    /// Fetch the owner's record, if any
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<FinanceRecord>, StoreError>;

    /// Insert or fully replace the owner's record in one atomic step
    async fn upsert(&self, user_id: Uuid, data: FinanceData) -> Result<UpsertOutcome, StoreError>;

    /// Remove the owner's record. Returns whether a record was removed.
    async fn delete_by_user(&self, user_id: Uuid) -> Result<bool, StoreError>;
}
