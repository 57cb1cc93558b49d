//! farm-finance Library
//!
//! Per-user farm finance records over HTTP, plus the client-side state
//! container that drives them from a UI.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod state;
pub mod store;

mod error;

pub use config::Config;
pub use domain::{ExpenseCategory, FinanceData, FinanceRecord, OtherExpense};
pub use error::{AppError, AppResult, ErrorResponse};
pub use state::AppState;
