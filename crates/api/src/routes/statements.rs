//! Account statement routes. Statements are immutable snapshots generated by
//! the caller (via [`ledgr_core::ledger::AccountStatement::new`]) and only
//! ever created or read here.

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::{get, post};
use axum::{Json, Router};
use ledgr_core::ledger::AccountStatement;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{check_scope, AuthUser};
use crate::routes::common::parse_id;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ledgers/{ledger_id}/accounts/{account_id}/statements",
            post(create_statement).get(list_statements),
        )
        .route("/ledgers/{ledger_id}/accounts/{account_id}/statements/{id}", get(get_statement))
}

#[derive(Debug, Deserialize)]
struct CreateStatementRequest {
    start_datetime: chrono::DateTime<chrono::Utc>,
    end_datetime: chrono::DateTime<chrono::Utc>,
}

async fn create_statement(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((ledger_id, account_id)): Path<(String, String)>,
    Json(payload): Json<CreateStatementRequest>,
) -> Result<Json<AccountStatement>, ApiError> {
    check_scope(&user.0, "ledger:account:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = crate::routes::common::organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;
    let account_id = parse_id(&account_id, "account id", &uri)?;

    let ledger = state
        .ledger_service
        .get_ledger(&organization_id, &ledger_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    let account = state
        .ledger_service
        .get_account(&organization_id, &ledger_id, &account_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;

    let statement = AccountStatement::new(
        ledger_id,
        &account,
        &account,
        payload.start_datetime,
        payload.end_datetime,
        ledger.currency,
        ledger.currency_exponent,
    );

    let created = state
        .ledger_service
        .create_statement(statement)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(created))
}

async fn get_statement(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((_ledger_id, _account_id, id)): Path<(String, String, String)>,
) -> Result<Json<AccountStatement>, ApiError> {
    check_scope(&user.0, "ledger:account:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let id = parse_id(&id, "account statement id", &uri)?;

    let statement = state
        .ledger_service
        .get_statement(&id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(statement))
}

async fn list_statements(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((ledger_id, account_id)): Path<(String, String)>,
) -> Result<Json<Vec<AccountStatement>>, ApiError> {
    check_scope(&user.0, "ledger:account:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;
    let account_id = parse_id(&account_id, "account id", &uri)?;

    let statements = state
        .ledger_service
        .list_statements(&ledger_id, &account_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(statements))
}
