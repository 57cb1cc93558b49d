//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthVerifier;
use crate::handlers::FinanceHandler;
use crate::store::FinanceStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub finance: FinanceHandler,
    pub verifier: Arc<dyn AuthVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn FinanceStore>, verifier: Arc<dyn AuthVerifier>) -> Self {
        Self {
            finance: FinanceHandler::new(store),
            verifier,
        }
    }
}

impl FromRef<AppState> for FinanceHandler {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.finance.clone()
    }
}

impl FromRef<AppState> for Arc<dyn AuthVerifier> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.verifier.clone()
    }
}
