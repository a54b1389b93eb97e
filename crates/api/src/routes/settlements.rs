//! Settlement routes.

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::{get, post};
use axum::{Json, Router};
use ledgr_core::ledger::{Settlement, SettlementStatus};
use ledgr_shared::types::EntryId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{check_scope, AuthUser};
use crate::routes::common::{organization_id, parse_id};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ledgers/{ledger_id}/accounts/{account_id}/settlements",
            post(create_settlement),
        )
        .route(
            "/ledgers/{ledger_id}/settlements/{id}",
            get(get_settlement).delete(delete_settlement),
        )
        .route("/ledgers/{ledger_id}/settlements/{id}/entries", post(add_entries).delete(remove_entries))
        .route(
            "/ledgers/{ledger_id}/settlements/{id}/{status}",
            post(transition_settlement),
        )
}

#[derive(Debug, Deserialize)]
struct CreateSettlementRequest {
    contra_account_id: String,
}

async fn create_settlement(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((ledger_id, account_id)): Path<(String, String)>,
    Json(payload): Json<CreateSettlementRequest>,
) -> Result<Json<Settlement>, ApiError> {
    check_scope(&user.0, "ledger:account:settlement:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;
    let account_id = parse_id(&account_id, "account id", &uri)?;
    let contra_account_id = parse_id(&payload.contra_account_id, "contra account id", &uri)?;

    let ledger = state
        .ledger_service
        .get_ledger(&organization_id, &ledger_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    let settled_account = state
        .ledger_service
        .get_account(&organization_id, &ledger_id, &account_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;

    let settlement = Settlement::create(
        organization_id,
        &settled_account,
        contra_account_id,
        ledger.currency,
        ledger.currency_exponent,
    );

    let created = state
        .settlement_service
        .create(settlement)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(created))
}

async fn get_settlement(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((_ledger_id, id)): Path<(String, String)>,
) -> Result<Json<Settlement>, ApiError> {
    check_scope(&user.0, "ledger:account:settlement:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let id = parse_id(&id, "settlement id", &uri)?;

    let settlement = state
        .settlement_service
        .get(&organization_id, &id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(settlement))
}

#[derive(Debug, Deserialize)]
struct EntryIdsRequest {
    entry_ids: Vec<String>,
}

fn parse_entry_ids(raw: Vec<String>, uri: &Uri) -> Result<Vec<EntryId>, ApiError> {
    raw.into_iter().map(|id| parse_id(&id, "entry id", uri)).collect()
}

async fn add_entries(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((_ledger_id, id)): Path<(String, String)>,
    Json(payload): Json<EntryIdsRequest>,
) -> Result<Json<Settlement>, ApiError> {
    check_scope(&user.0, "ledger:account:settlement:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let id = parse_id(&id, "settlement id", &uri)?;
    let entry_ids = parse_entry_ids(payload.entry_ids, &uri)?;

    let settlement = state
        .settlement_service
        .add_entries(&organization_id, &id, &entry_ids)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(settlement))
}

async fn remove_entries(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((_ledger_id, id)): Path<(String, String)>,
    Json(payload): Json<EntryIdsRequest>,
) -> Result<Json<Settlement>, ApiError> {
    check_scope(&user.0, "ledger:account:settlement:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let id = parse_id(&id, "settlement id", &uri)?;
    let entry_ids = parse_entry_ids(payload.entry_ids, &uri)?;

    let settlement = state
        .settlement_service
        .remove_entries(&organization_id, &id, &entry_ids)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(settlement))
}

async fn delete_settlement(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((_ledger_id, id)): Path<(String, String)>,
) -> Result<axum::http::StatusCode, ApiError> {
    check_scope(&user.0, "ledger:account:settlement:delete").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let id = parse_id(&id, "settlement id", &uri)?;

    state
        .settlement_service
        .delete(&organization_id, &id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

fn parse_status(raw: &str, uri: &Uri) -> Result<SettlementStatus, ApiError> {
    match raw {
        "processing" => Ok(SettlementStatus::Processing),
        "pending" => Ok(SettlementStatus::Pending),
        "posted" => Ok(SettlementStatus::Posted),
        "archiving" => Ok(SettlementStatus::Archiving),
        "archived" => Ok(SettlementStatus::Archived),
        other => Err(ApiError::new(
            ledgr_shared::LedgerError::validation(format!("unknown settlement status: {other}")),
            uri.path(),
        )),
    }
}

async fn transition_settlement(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((ledger_id, id, status)): Path<(String, String, String)>,
) -> Result<Json<Settlement>, ApiError> {
    check_scope(&user.0, "ledger:account:settlement:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;
    let id = parse_id(&id, "settlement id", &uri)?;
    let target = parse_status(&status, &uri)?;

    let settlement = state
        .settlement_service
        .transition(&organization_id, &ledger_id, &id, target)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(settlement))
}
