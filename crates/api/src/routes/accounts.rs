//! Account CRUD routes, scoped under a ledger.

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::{get, post};
use axum::{Json, Router};
use ledgr_core::ledger::{Account, NormalBalance};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{check_scope, AuthUser};
use crate::routes::common::{organization_id, parse_id};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledgers/{ledger_id}/accounts", post(create_account).get(list_accounts))
        .route(
            "/ledgers/{ledger_id}/accounts/{account_id}",
            get(get_account).delete(delete_account),
        )
}

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    name: String,
    normal_balance: NormalBalance,
    description: Option<String>,
    metadata: Option<serde_json::Value>,
}

async fn create_account(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path(ledger_id): Path<String>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<Json<Account>, ApiError> {
    check_scope(&user.0, "ledger:account:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;

    let mut account = Account::new(organization_id, ledger_id, payload.name, payload.normal_balance);
    account.description = payload.description;
    account.metadata = payload.metadata;

    let created = state
        .ledger_service
        .create_account(account)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(created))
}

async fn get_account(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((ledger_id, account_id)): Path<(String, String)>,
) -> Result<Json<Account>, ApiError> {
    check_scope(&user.0, "ledger:account:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;
    let account_id = parse_id(&account_id, "account id", &uri)?;

    let account = state
        .ledger_service
        .get_account(&organization_id, &ledger_id, &account_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(account))
}

async fn list_accounts(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path(ledger_id): Path<String>,
) -> Result<Json<Vec<Account>>, ApiError> {
    check_scope(&user.0, "ledger:account:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;

    let accounts = state
        .ledger_service
        .list_accounts(&organization_id, &ledger_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(accounts))
}

async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((ledger_id, account_id)): Path<(String, String)>,
) -> Result<axum::http::StatusCode, ApiError> {
    check_scope(&user.0, "ledger:account:delete").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;
    let account_id = parse_id(&account_id, "account id", &uri)?;

    state
        .ledger_service
        .delete_account(&organization_id, &ledger_id, &account_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
