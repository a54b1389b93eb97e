//! Concurrent-load harness for the transaction engine.
//!
//! Fires `LOADTEST_CONCURRENCY` parallel `POST .../transactions` calls at a
//! running server, all crediting/debiting the same pair of accounts, and
//! reports at-most-one-winner-under-contention and retry-bound statistics
//! for the benchmark harness. This is a test tool, not part of the
//! service: it mints its own bearer token via `JwtVerifier::mint`, which
//! only exists under the `test-util` feature.
//!
//! Required environment variables: `LOADTEST_BASE_URL`, `LOADTEST_JWT_SECRET`,
//! `LOADTEST_ORG_ID`, `LOADTEST_LEDGER_ID`, `LOADTEST_DEBIT_ACCOUNT_ID`,
//! `LOADTEST_CREDIT_ACCOUNT_ID`. Optional: `LOADTEST_CONCURRENCY` (default 100).

use std::env;
use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, Utc};
use ledgr_shared::auth::Claims;
use ledgr_shared::jwt::JwtVerifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = env::var("LOADTEST_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let secret = env::var("LOADTEST_JWT_SECRET").expect("LOADTEST_JWT_SECRET is required");
    let org_id = env::var("LOADTEST_ORG_ID").expect("LOADTEST_ORG_ID is required");
    let ledger_id = env::var("LOADTEST_LEDGER_ID").expect("LOADTEST_LEDGER_ID is required");
    let debit_account = env::var("LOADTEST_DEBIT_ACCOUNT_ID").expect("LOADTEST_DEBIT_ACCOUNT_ID is required");
    let credit_account = env::var("LOADTEST_CREDIT_ACCOUNT_ID").expect("LOADTEST_CREDIT_ACCOUNT_ID is required");
    let concurrency: usize = env::var("LOADTEST_CONCURRENCY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);

    let verifier = JwtVerifier::new(&secret, "ledgr");
    let claims = Claims::new(
        org_id,
        "ledgr",
        vec!["ledger:transaction:write".to_string()],
        Utc::now() + ChronoDuration::minutes(5),
    );
    let token = verifier.mint(&claims);

    let client = reqwest::Client::new();
    let url = format!("{base_url}/api/ledgers/{ledger_id}/transactions");

    let started = Instant::now();
    let mut handles = Vec::with_capacity(concurrency);
    for i in 0..concurrency {
        let client = client.clone();
        let url = url.clone();
        let token = token.clone();
        let debit_account = debit_account.clone();
        let credit_account = credit_account.clone();
        handles.push(tokio::spawn(async move {
            let body = serde_json::json!({
                "status": "posted",
                "idempotency_key": format!("loadtest-{i}"),
                "ledger_entries": [
                    {"account_id": debit_account, "direction": "debit", "amount": 100, "currency": "USD", "currency_exponent": 2},
                    {"account_id": credit_account, "direction": "credit", "amount": 100, "currency": "USD", "currency_exponent": 2},
                ],
            });
            let request_started = Instant::now();
            let response = client
                .post(&url)
                .bearer_auth(token)
                .json(&body)
                .send()
                .await;
            let latency = request_started.elapsed();
            match response {
                Ok(resp) => (resp.status().as_u16(), latency),
                Err(_) => (0, latency),
            }
        }));
    }

    let mut succeeded = 0u32;
    let mut conflicted = 0u32;
    let mut failed = 0u32;
    let mut latencies = Vec::with_capacity(concurrency);

    for handle in handles {
        let (status, latency) = handle.await?;
        latencies.push(latency);
        match status {
            200..=299 => succeeded += 1,
            409 => conflicted += 1,
            _ => failed += 1,
        }
    }

    latencies.sort();
    let p99 = latencies
        .get((latencies.len() as f64 * 0.99) as usize)
        .copied()
        .unwrap_or(Duration::ZERO);

    println!("=== loadtest: {concurrency} concurrent createTransaction calls ===");
    println!("wall clock: {:?}", started.elapsed());
    println!("succeeded (2xx): {succeeded}");
    println!("conflicted (409, exhausted retries): {conflicted}");
    println!("failed (other): {failed}");
    println!("p99 latency: {p99:?}");

    Ok(())
}
