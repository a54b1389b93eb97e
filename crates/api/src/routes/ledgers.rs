//! Ledger CRUD routes.

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::{get, post};
use axum::{Json, Router};
use ledgr_core::ledger::Ledger;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{check_scope, AuthUser};
use crate::routes::common::{organization_id, parse_id};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledgers", post(create_ledger).get(list_ledgers))
        .route("/ledgers/{ledger_id}", get(get_ledger))
}

#[derive(Debug, Deserialize)]
struct CreateLedgerRequest {
    name: String,
    currency: String,
    currency_exponent: u8,
    description: Option<String>,
    metadata: Option<serde_json::Value>,
}

async fn create_ledger(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Json(payload): Json<CreateLedgerRequest>,
) -> Result<Json<Ledger>, ApiError> {
    check_scope(&user.0, "ledger:account:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;

    let mut ledger = Ledger::new(organization_id, payload.name, payload.currency, payload.currency_exponent)
        .map_err(|e| ApiError::new(e, uri.path()))?;
    ledger.description = payload.description;
    ledger.metadata = payload.metadata;

    let created = state
        .ledger_service
        .create_ledger(ledger)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(created))
}

async fn get_ledger(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path(ledger_id): Path<String>,
) -> Result<Json<Ledger>, ApiError> {
    check_scope(&user.0, "ledger:account:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;

    let ledger = state
        .ledger_service
        .get_ledger(&organization_id, &ledger_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(ledger))
}

async fn list_ledgers(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
) -> Result<Json<Vec<Ledger>>, ApiError> {
    check_scope(&user.0, "ledger:account:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;

    let ledgers = state
        .ledger_service
        .list_ledgers(&organization_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(ledgers))
}
