//! Finance hook state
//!
//! An immutable value. Every step of an operation produces the next state
//! from the previous one; nothing mutates a state in place.

use chrono::{DateTime, Utc};

use crate::domain::FinanceRecord;

/// What a UI renders for the finance screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinanceState {
    /// Last record known to the client
    pub data: Option<FinanceRecord>,
    /// Fetch in flight
    pub loading: bool,
    /// Save or clear in flight
    pub saving: bool,
    /// Message of the last failure
    pub error: Option<String>,
    /// When the last save succeeded
    pub last_saved: Option<DateTime<Utc>>,
}

impl FinanceState {
    pub fn fetch_started(&self) -> Self {
        Self {
            loading: true,
            error: None,
            ..self.clone()
        }
    }

    /// `data` is `None` when the server has no record for the user
    pub fn fetch_succeeded(&self, data: Option<FinanceRecord>) -> Self {
        Self {
            data,
            loading: false,
            error: None,
            ..self.clone()
        }
    }

    /// Keeps whatever `data` was already there
    pub fn fetch_failed(&self, message: impl Into<String>) -> Self {
        Self {
            loading: false,
            error: Some(message.into()),
            ..self.clone()
        }
    }

    pub fn save_started(&self) -> Self {
        Self {
            saving: true,
            error: None,
            ..self.clone()
        }
    }

    pub fn save_succeeded(&self, record: FinanceRecord, saved_at: DateTime<Utc>) -> Self {
        Self {
            data: Some(record),
            saving: false,
            error: None,
            last_saved: Some(saved_at),
            ..self.clone()
        }
    }

    pub fn save_failed(&self, message: impl Into<String>) -> Self {
        Self {
            saving: false,
            error: Some(message.into()),
            ..self.clone()
        }
    }

    pub fn clear_started(&self) -> Self {
        self.save_started()
    }

    pub fn clear_succeeded(&self) -> Self {
        Self {
            data: None,
            saving: false,
            error: None,
            ..self.clone()
        }
    }

    pub fn clear_failed(&self, message: impl Into<String>) -> Self {
        self.save_failed(message)
    }
}
