//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    body::Bytes,
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::{FinanceInput, FinanceRecord, OperationContext};
use crate::error::{AppError, AppResult};
use crate::handlers::{FinanceHandler, UpsertFinanceCommand};
use crate::state::AppState;

use super::middleware::AuthenticatedUser;

/// Path of the finance record resource
pub const FINANCE_PATH: &str = "/farm-finance";

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct FetchFinanceResponse {
    pub data: Option<FinanceRecord>,
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertFinanceResponse {
    pub data: FinanceRecord,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteFinanceResponse {
    pub message: String,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router. Expects `auth_middleware` to be layered on top.
pub fn create_router() -> Router<AppState> {
    Router::new().route(
        FINANCE_PATH,
        get(fetch_finance)
            .put(upsert_finance)
            .delete(delete_finance)
            .fallback(method_not_allowed),
    )
}

// =========================================================================
// GET /farm-finance
// =========================================================================

/// Fetch the caller's finance record
async fn fetch_finance(
    State(finance): State<FinanceHandler>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
) -> AppResult<Json<FetchFinanceResponse>> {
    let record = finance.fetch(user.user_id, &context).await?;

    Ok(Json(FetchFinanceResponse {
        exists: record.is_some(),
        data: record,
    }))
}

// =========================================================================
// PUT /farm-finance
// =========================================================================

/// Create or replace the caller's finance record
async fn upsert_finance(
    State(finance): State<FinanceHandler>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    body: Bytes,
) -> AppResult<Json<UpsertFinanceResponse>> {
    // Raw bytes so shape errors map to our own 400 rather than axum's rejection
    let data = FinanceInput::from_json(&body)?.into_data()?;

    let result = finance
        .upsert(UpsertFinanceCommand::new(user.user_id, data), &context)
        .await?;

    Ok(Json(UpsertFinanceResponse {
        message: result.message().to_string(),
        data: result.record,
    }))
}

// =========================================================================
// DELETE /farm-finance
// =========================================================================

/// Delete the caller's finance record
async fn delete_finance(
    State(finance): State<FinanceHandler>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
) -> AppResult<Json<DeleteFinanceResponse>> {
    finance.delete(user.user_id, &context).await?;

    Ok(Json(DeleteFinanceResponse {
        message: "Finance data deleted".to_string(),
    }))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
