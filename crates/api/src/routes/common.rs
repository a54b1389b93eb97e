//! Shared request-parsing helpers for route handlers.

use std::str::FromStr;

use axum::http::Uri;
use ledgr_shared::LedgerError;

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Reads the calling organization's id from the token.
pub fn organization_id(user: &AuthUser, uri: &Uri) -> Result<ledgr_shared::types::OrganizationId, ApiError> {
    user.organization_id().parse().map_err(|e| {
        ApiError::new(
            LedgerError::validation(format!("invalid organization id in token: {e}")),
            uri.path(),
        )
    })
}

/// Parses a path segment into a typed prefixed identifier.
pub fn parse_id<T>(raw: &str, what: &'static str, uri: &Uri) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| ApiError::new(LedgerError::validation(format!("invalid {what}: {e}")), uri.path()))
}
