//! Finance Handler
//!
//! Fetch, upsert and delete of the caller's finance record.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{FinanceRecord, OperationContext};
use crate::error::AppResult;
use crate::store::FinanceStore;

use super::{UpsertFinanceCommand, UpsertFinanceResult};

/// Handler for finance record operations
#[derive(Clone)]
pub struct FinanceHandler {
    store: Arc<dyn FinanceStore>,
}

impl FinanceHandler {
    pub fn new(store: Arc<dyn FinanceStore>) -> Self {
        Self { store }
    }

    /// Load the owner's record. `None` is a normal "no data yet" result.
    pub async fn fetch(
        &self,
        user_id: Uuid,
        context: &OperationContext,
    ) -> AppResult<Option<FinanceRecord>> {
        let record = self.store.find_by_user(user_id).await?;

        tracing::debug!(
            %user_id,
            request_id = context.request_id_or_dash(),
            exists = record.is_some(),
            "Finance data fetched"
        );

        Ok(record)
    }

    /// Insert or fully replace the owner's record
    pub async fn upsert(
        &self,
        command: UpsertFinanceCommand,
        context: &OperationContext,
    ) -> AppResult<UpsertFinanceResult> {
        let outcome = self.store.upsert(command.user_id, command.data).await?;

        let result = UpsertFinanceResult {
            record: outcome.record,
            created: outcome.created,
        };

        tracing::info!(
            user_id = %command.user_id,
            request_id = context.request_id_or_dash(),
            created = result.created,
            "{}",
            result.message()
        );

        Ok(result)
    }

    /// Remove the owner's record; succeeds when there was nothing to remove
    pub async fn delete(&self, user_id: Uuid, context: &OperationContext) -> AppResult<()> {
        let removed = self.store.delete_by_user(user_id).await?;

        tracing::info!(
            %user_id,
            request_id = context.request_id_or_dash(),
            removed,
            "Finance data deleted"
        );

        Ok(())
    }
}
