//! Balance monitor routes, scoped under an account.

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::{get, post};
use axum::{Json, Router};
use ledgr_core::ledger::{AlertCondition, BalanceMonitor};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{check_scope, AuthUser};
use crate::routes::common::parse_id;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ledgers/{ledger_id}/accounts/{account_id}/monitors",
            post(create_monitor).get(list_monitors),
        )
        .route("/ledgers/{ledger_id}/accounts/{account_id}/monitors/{id}", get(get_monitor).delete(delete_monitor))
}

#[derive(Debug, Deserialize)]
struct CreateMonitorRequest {
    alert_conditions: Vec<AlertCondition>,
    description: Option<String>,
    metadata: Option<serde_json::Value>,
}

async fn create_monitor(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((_ledger_id, account_id)): Path<(String, String)>,
    Json(payload): Json<CreateMonitorRequest>,
) -> Result<Json<BalanceMonitor>, ApiError> {
    check_scope(&user.0, "ledger:account:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let account_id = parse_id(&account_id, "account id", &uri)?;

    let mut monitor = BalanceMonitor::new(account_id, payload.alert_conditions);
    monitor.description = payload.description;
    monitor.metadata = payload.metadata;

    let created = state
        .ledger_service
        .create_monitor(monitor)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(created))
}

async fn get_monitor(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((_ledger_id, _account_id, id)): Path<(String, String, String)>,
) -> Result<Json<BalanceMonitor>, ApiError> {
    check_scope(&user.0, "ledger:account:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let id = parse_id(&id, "balance monitor id", &uri)?;

    let monitor = state
        .ledger_service
        .get_monitor(&id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(monitor))
}

async fn list_monitors(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((_ledger_id, account_id)): Path<(String, String)>,
) -> Result<Json<Vec<BalanceMonitor>>, ApiError> {
    check_scope(&user.0, "ledger:account:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let account_id = parse_id(&account_id, "account id", &uri)?;

    let monitors = state
        .ledger_service
        .list_monitors(&account_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(monitors))
}

async fn delete_monitor(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((_ledger_id, _account_id, id)): Path<(String, String, String)>,
) -> Result<axum::http::StatusCode, ApiError> {
    check_scope(&user.0, "ledger:account:delete").map_err(|e| ApiError::new(e, uri.path()))?;
    let id = parse_id(&id, "balance monitor id", &uri)?;

    state
        .ledger_service
        .delete_monitor(&id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
