//! Shared types, errors, and configuration for the ledger service.
//!
//! This crate provides common types used across all other crates:
//! - Prefixed, lexicographically sortable entity identifiers
//! - Pagination types for list endpoints
//! - The closed error taxonomy and its HTTP-status mapping
//! - Bearer-token claims and verification
//! - Layered configuration

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use config::AppConfig;
pub use error::{ConflictKind, LedgerError, LedgerResult};
