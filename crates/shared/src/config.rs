//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT verification configuration.
    pub jwt: JwtConfig,
    /// Retry-wrapper policy overrides.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Flags that only make sense in a test environment.
    #[serde(default)]
    pub test_overrides: TestOverridesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT verification configuration.
///
/// Token issuance is out of scope; the service only
/// ever verifies bearer tokens signed elsewhere.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Shared secret used to verify token signatures.
    pub secret: String,
    /// Expected `iss` claim. Tokens from any other issuer are rejected.
    pub issuer: String,
}

/// Retry-wrapper policy overrides.
///
/// Defaults to a full-jitter exponential backoff:
/// `[0, min(cap_ms, base_ms * 2^attempt)]`, capped at `max_attempts` tries.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff in milliseconds.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Backoff ceiling in milliseconds.
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_base_ms() -> u64 {
    50
}

fn default_backoff_cap_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_cap_ms: default_backoff_cap_ms(),
        }
    }
}

/// Flags that only make sense in a test environment.
///
/// These must never default to an unsafe value in production: every field
/// defaults to `false`/off and has to be deliberately enabled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestOverridesConfig {
    /// When `true`, permits deleting a `posted` transaction.
    /// Outside of integration tests this must stay `false`.
    #[serde(default)]
    pub allow_delete_posted_transactions: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Layering, lowest to highest precedence: `config/default.toml`,
    /// `config/{RUN_MODE}.toml`, then `LEDGER__`-prefixed environment
    /// variables with `__` as the nesting separator (e.g.
    /// `LEDGER__DATABASE__URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
