//! In-memory Finance Store
//!
//! Process-local store with the same one-record-per-user semantics as the
//! PostgreSQL store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{FinanceData, FinanceRecord};

use super::{FinanceStore, StoreError, UpsertOutcome};

/// Finance store held in a map guarded by an async lock
#[derive(Debug, Default)]
pub struct MemoryFinanceStore {
    records: RwLock<HashMap<Uuid, FinanceRecord>>,
}

impl MemoryFinanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl FinanceStore for MemoryFinanceStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<FinanceRecord>, StoreError> {
        Ok(self.records.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: Uuid, data: FinanceData) -> Result<UpsertOutcome, StoreError> {
        let now = Utc::now();
        let mut records = self.records.write().await;

        let (record, created) = match records.get(&user_id) {
            Some(existing) => (
                FinanceRecord {
                    id: existing.id,
                    user_id,
                    data,
                    created_at: existing.created_at,
                    updated_at: now,
                },
                false,
            ),
            None => (
                FinanceRecord {
                    id: Uuid::new_v4(),
                    user_id,
                    data,
                    created_at: now,
                    updated_at: now,
                },
                true,
            ),
        };

        records.insert(user_id, record.clone());
        Ok(UpsertOutcome { record, created })
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(&user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseCategory, OtherExpense};
    use rust_decimal_macros::dec;

    fn sample_data() -> FinanceData {
        FinanceData::new(vec![ExpenseCategory::new("1", "Seeds", dec!(100)).required()])
            .with_total_expense(dec!(100))
    }

    #[tokio::test]
    async fn test_first_upsert_creates() {
        let store = MemoryFinanceStore::new();
        let user_id = Uuid::new_v4();

        let outcome = store.upsert(user_id, sample_data()).await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.record.user_id, user_id);
        assert_eq!(outcome.record.data, sample_data());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_second_upsert_replaces_in_place() {
        let store = MemoryFinanceStore::new();
        let user_id = Uuid::new_v4();

        let first = store.upsert(user_id, sample_data()).await.unwrap();
        let replacement = FinanceData::new(vec![])
            .with_other_expenses(vec![OtherExpense::new("o1", "Labour", dec!(60))])
            .with_total_expense(dec!(60));
        let second = store.upsert(user_id, replacement.clone()).await.unwrap();

        assert!(!second.created);
        assert_eq!(second.record.id, first.record.id);
        assert_eq!(second.record.created_at, first.record.created_at);
        // Full replace, not merge
        assert!(second.record.data.expense_categories.is_empty());
        assert_eq!(second.record.data, replacement);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_records_are_scoped_by_user() {
        let store = MemoryFinanceStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.upsert(alice, sample_data()).await.unwrap();

        assert!(store.find_by_user(alice).await.unwrap().is_some());
        assert!(store.find_by_user(bob).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryFinanceStore::new();
        let user_id = Uuid::new_v4();

        store.upsert(user_id, sample_data()).await.unwrap();

        assert!(store.delete_by_user(user_id).await.unwrap());
        assert!(!store.delete_by_user(user_id).await.unwrap());
        assert!(store.is_empty().await);
    }
}
