//! Domain Error Types
//!
//! Validation failures for finance payloads. These don't depend on the web
//! layer; `AppError` maps them to 400 responses.

use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a finance payload is rejected before reaching the store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// `expense_categories` missing or not an array
    #[error("Invalid expense categories: expense_categories must be an array")]
    InvalidExpenseCategories,

    /// Body is not JSON or does not match the record shape
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Amount for '{field}' must not be negative (got {amount})")]
    NegativeAmount { field: String, amount: Decimal },
}

impl DomainError {
    /// Machine-readable code used in error responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidExpenseCategories => "invalid_expense_categories",
            Self::MalformedBody(_) => "malformed_body",
            Self::NegativeAmount { .. } => "negative_amount",
        }
    }
}
