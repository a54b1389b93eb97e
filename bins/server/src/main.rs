//! Ledger API server.
//!
//! Main entry point for the accounting ledger service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgr_api::{create_router, AppState};
use ledgr_db::{
    connect, AccountRepository, LedgerRepository, MonitorRepository, SettlementRepository,
    StatementRepository, TransactionRepository,
};
use ledgr_service::{LedgerService, SettlementService};
use ledgr_shared::jwt::JwtVerifier;
use ledgr_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgr=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().expect("Failed to load configuration");

    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    let jwt_verifier = JwtVerifier::new(&config.jwt.secret, config.jwt.issuer.clone());

    let ledger_service = LedgerService::new(
        LedgerRepository::new(db.clone()),
        AccountRepository::new(db.clone()),
        MonitorRepository::new(db.clone()),
        StatementRepository::new(db.clone()),
        TransactionRepository::new(db.clone()),
        config.retry.clone(),
    );
    let settlement_service = SettlementService::new(SettlementRepository::new(db.clone()), config.retry.clone());

    let state = AppState {
        ledger_service: Arc::new(ledger_service),
        settlement_service: Arc::new(settlement_service),
        jwt_verifier: Arc::new(jwt_verifier),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
