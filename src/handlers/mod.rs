//! Command Handlers module
//!
//! Orchestrates finance operations against the record store.

mod commands;
mod finance_handler;

pub use commands::*;
pub use finance_handler::FinanceHandler;
