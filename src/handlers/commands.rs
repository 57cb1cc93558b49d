//! Command definitions
//!
//! Commands and results exchanged between the routes and the finance handler.

use uuid::Uuid;

use crate::domain::{FinanceData, FinanceRecord};

/// Replace the owner's finance record with `data`
#[derive(Debug, Clone)]
pub struct UpsertFinanceCommand {
    /// Verified owner; never taken from the request body
    pub user_id: Uuid,
    pub data: FinanceData,
}

impl UpsertFinanceCommand {
    pub fn new(user_id: Uuid, data: FinanceData) -> Self {
        Self { user_id, data }
    }
}

/// Result of a successful upsert
#[derive(Debug, Clone)]
pub struct UpsertFinanceResult {
    pub record: FinanceRecord,
    pub created: bool,
}

impl UpsertFinanceResult {
    /// Message returned to the client
    pub fn message(&self) -> &'static str {
        if self.created {
            "Finance data created"
        } else {
            "Finance data updated"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(created: bool) -> UpsertFinanceResult {
        UpsertFinanceResult {
            record: FinanceRecord {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                data: FinanceData::new(vec![]),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            created,
        }
    }

    #[test]
    fn test_upsert_messages() {
        assert_eq!(result(true).message(), "Finance data created");
        assert_eq!(result(false).message(), "Finance data updated");
    }
}
