//! PostgreSQL Finance Store
//!
//! Stores one row per user in `farm_finance`. Upserts are a single
//! `INSERT .. ON CONFLICT (user_id)` statement, so concurrent writers for the
//! same user update the one row instead of creating duplicates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{ExpenseCategory, FinanceData, FinanceRecord, OtherExpense};

use super::{FinanceStore, StoreError, UpsertOutcome};

const RECORD_COLUMNS: &str = r#"
    id, user_id, expense_categories, other_expenses, total_expense,
    predicted_yield, yield_unit, predicted_price, price_unit, crop_type,
    expected_revenue, net_profit_loss, profit_loss_percentage, break_even_price,
    created_at, updated_at
"#;

/// Row shape of `farm_finance`
#[derive(Debug, sqlx::FromRow)]
struct FinanceRow {
    id: Uuid,
    user_id: Uuid,
    expense_categories: Json<Vec<ExpenseCategory>>,
    other_expenses: Json<Vec<OtherExpense>>,
    total_expense: Decimal,
    predicted_yield: Option<Decimal>,
    yield_unit: String,
    predicted_price: Option<Decimal>,
    price_unit: String,
    crop_type: Option<String>,
    expected_revenue: Option<Decimal>,
    net_profit_loss: Option<Decimal>,
    profit_loss_percentage: Option<Decimal>,
    break_even_price: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    record: FinanceRow,
    inserted: bool,
}

impl From<FinanceRow> for FinanceRecord {
    fn from(row: FinanceRow) -> Self {
        FinanceRecord {
            id: row.id,
            user_id: row.user_id,
            data: FinanceData {
                expense_categories: row.expense_categories.0,
                other_expenses: row.other_expenses.0,
                total_expense: row.total_expense,
                predicted_yield: row.predicted_yield,
                yield_unit: row.yield_unit,
                predicted_price: row.predicted_price,
                price_unit: row.price_unit,
                crop_type: row.crop_type,
                expected_revenue: row.expected_revenue,
                net_profit_loss: row.net_profit_loss,
                profit_loss_percentage: row.profit_loss_percentage,
                break_even_price: row.break_even_price,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Finance store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgFinanceStore {
    pool: PgPool,
}

impl PgFinanceStore {
    /// Create a new PgFinanceStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FinanceStore for PgFinanceStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<FinanceRecord>, StoreError> {
        let query = format!("SELECT {RECORD_COLUMNS} FROM farm_finance WHERE user_id = $1");

        let row: Option<FinanceRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(FinanceRecord::from))
    }

    async fn upsert(&self, user_id: Uuid, data: FinanceData) -> Result<UpsertOutcome, StoreError> {
        // xmax is 0 only for a freshly inserted tuple
        let query = format!(
            r#"
            INSERT INTO farm_finance (
                id, user_id, expense_categories, other_expenses, total_expense,
                predicted_yield, yield_unit, predicted_price, price_unit, crop_type,
                expected_revenue, net_profit_loss, profit_loss_percentage, break_even_price,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW(), NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                expense_categories = EXCLUDED.expense_categories,
                other_expenses = EXCLUDED.other_expenses,
                total_expense = EXCLUDED.total_expense,
                predicted_yield = EXCLUDED.predicted_yield,
                yield_unit = EXCLUDED.yield_unit,
                predicted_price = EXCLUDED.predicted_price,
                price_unit = EXCLUDED.price_unit,
                crop_type = EXCLUDED.crop_type,
                expected_revenue = EXCLUDED.expected_revenue,
                net_profit_loss = EXCLUDED.net_profit_loss,
                profit_loss_percentage = EXCLUDED.profit_loss_percentage,
                break_even_price = EXCLUDED.break_even_price,
                updated_at = NOW()
            RETURNING {RECORD_COLUMNS}, (xmax = 0) AS inserted
            "#
        );

        let UpsertRow { record, inserted } = sqlx::query_as(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(Json(data.expense_categories))
            .bind(Json(data.other_expenses))
            .bind(data.total_expense)
            .bind(data.predicted_yield)
            .bind(data.yield_unit)
            .bind(data.predicted_price)
            .bind(data.price_unit)
            .bind(data.crop_type)
            .bind(data.expected_revenue)
            .bind(data.net_profit_loss)
            .bind(data.profit_loss_percentage)
            .bind(data.break_even_price)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(%user_id, created = inserted, "Finance row upserted");

        Ok(UpsertOutcome {
            record: record.into(),
            created: inserted,
        })
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM farm_finance WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
