//! Transaction engine routes.

use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use ledgr_core::ledger::{Entry, EntryDirection, Transaction, TransactionStatus};
use ledgr_shared::types::{EntryId, PageRequest, PageResponse, TransactionId};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{check_scope, AuthUser};
use crate::routes::common::{organization_id, parse_id};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ledgers/{ledger_id}/transactions",
            post(create_transaction).get(list_transactions),
        )
        .route("/ledgers/{ledger_id}/transactions/{id}", get(get_transaction).delete(archive_transaction))
        .route("/ledgers/{ledger_id}/transactions/{id}/post", post(post_transaction))
}

#[derive(Debug, Deserialize)]
struct CreateEntryRequest {
    account_id: String,
    direction: EntryDirection,
    amount: u64,
    currency: String,
    currency_exponent: u8,
}

#[derive(Debug, Deserialize)]
struct CreateTransactionRequest {
    description: Option<String>,
    status: TransactionStatus,
    effective_at: Option<DateTime<Utc>>,
    ledger_entries: Vec<CreateEntryRequest>,
    metadata: Option<serde_json::Value>,
    idempotency_key: Option<String>,
}

fn build_entries(
    organization_id: &ledgr_shared::types::OrganizationId,
    status: TransactionStatus,
    requested: Vec<CreateEntryRequest>,
    uri: &Uri,
) -> Result<Vec<Entry>, ApiError> {
    let now = Utc::now();
    let mut entries = Vec::with_capacity(requested.len());
    for raw in requested {
        let account_id = parse_id(&raw.account_id, "account id", uri)?;
        entries.push(Entry {
            id: EntryId::generate(),
            organization_id: organization_id.clone(),
            transaction_id: TransactionId::generate(),
            account_id,
            direction: raw.direction,
            amount: raw.amount,
            currency: raw.currency,
            currency_exponent: raw.currency_exponent,
            status,
            created: now,
            updated: now,
        });
    }
    Ok(entries)
}

async fn create_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path(ledger_id): Path<String>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    check_scope(&user.0, "ledger:transaction:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;

    let ledger = state
        .ledger_service
        .get_ledger(&organization_id, &ledger_id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;

    let entries = build_entries(&organization_id, payload.status, payload.ledger_entries, &uri)?;
    let effective_at = payload.effective_at.unwrap_or_else(Utc::now);

    let txn = Transaction::new(
        organization_id,
        &ledger,
        entries,
        payload.status,
        effective_at,
        payload.idempotency_key,
        payload.description,
        payload.metadata,
    )
    .map_err(|e| ApiError::new(e, uri.path()))?;

    let created = state
        .ledger_service
        .create_transaction(txn)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(created))
}

async fn post_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((ledger_id, id)): Path<(String, String)>,
) -> Result<Json<Transaction>, ApiError> {
    check_scope(&user.0, "ledger:transaction:write").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;
    let id = parse_id(&id, "transaction id", &uri)?;

    let posted = state
        .ledger_service
        .post_transaction(&organization_id, &ledger_id, &id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(posted))
}

async fn archive_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((ledger_id, id)): Path<(String, String)>,
) -> Result<Json<Transaction>, ApiError> {
    check_scope(&user.0, "ledger:transaction:delete").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;
    let id = parse_id(&id, "transaction id", &uri)?;

    let archived = state
        .ledger_service
        .archive_transaction(&organization_id, &ledger_id, &id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(archived))
}

async fn get_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path((ledger_id, id)): Path<(String, String)>,
) -> Result<Json<Transaction>, ApiError> {
    check_scope(&user.0, "ledger:transaction:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;
    let id = parse_id(&id, "transaction id", &uri)?;

    let txn = state
        .ledger_service
        .get_transaction(&organization_id, &ledger_id, &id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    Ok(Json(txn))
}

async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Path(ledger_id): Path<String>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<Transaction>>, ApiError> {
    check_scope(&user.0, "ledger:transaction:read").map_err(|e| ApiError::new(e, uri.path()))?;
    let organization_id = organization_id(&user, &uri)?;
    let ledger_id = parse_id(&ledger_id, "ledger id", &uri)?;

    let items = state
        .ledger_service
        .list_transactions(&organization_id, &ledger_id, page.offset(), page.limit())
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;
    let total = items.len() as u64 + page.offset();
    Ok(Json(PageResponse::new(items, page.offset(), page.limit(), total)))
}
