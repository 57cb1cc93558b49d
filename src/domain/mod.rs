//! Domain module
//!
//! Finance record types and payload validation.

pub mod context;
pub mod error;
pub mod finance;

pub use context::OperationContext;
pub use error::DomainError;
pub use finance::{
    ExpenseCategory, FinanceData, FinanceInput, FinanceRecord, OtherExpense, DEFAULT_PRICE_UNIT,
    DEFAULT_YIELD_UNIT,
};
