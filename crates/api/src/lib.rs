//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Bearer-token authentication middleware
//! - The RFC-7807-flavored error envelope

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;
use ledgr_service::{LedgerService, SettlementService};
use ledgr_shared::jwt::JwtVerifier;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Orchestrates ledgers, accounts, monitors, statements, and transactions.
    pub ledger_service: Arc<LedgerService>,
    /// Orchestrates the settlement lifecycle.
    pub settlement_service: Arc<SettlementService>,
    /// Verifies bearer tokens.
    pub jwt_verifier: Arc<JwtVerifier>,
}

/// Creates the main application router.
///
/// `/healthz` is mounted unauthenticated; everything under `/api` passes
/// through [`middleware::auth_middleware`] first.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    let protected = routes::api_routes().layer(from_fn_with_state(state.clone(), middleware::auth_middleware));

    Router::new()
        .merge(routes::health::routes())
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
