//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod common;
pub mod health;
pub mod ledgers;
pub mod monitors;
pub mod settlements;
pub mod statements;
pub mod transactions;

/// Routes that require a verified bearer token, nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(ledgers::routes())
        .merge(accounts::routes())
        .merge(transactions::routes())
        .merge(settlements::routes())
        .merge(monitors::routes())
        .merge(statements::routes())
}
