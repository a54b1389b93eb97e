//! Maps a [`LedgerError`] to an RFC-7807-flavored error envelope.
//! This is the only place a `LedgerError` becomes an HTTP response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledgr_shared::LedgerError;
use serde::Serialize;

/// Error envelope returned to clients on every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    kind: &'static str,
    status: u16,
    title: String,
    detail: String,
    instance: String,
    #[serde(rename = "traceId")]
    trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retryable: Option<bool>,
}

/// Wraps a [`LedgerError`] with the request path it occurred on, so the
/// envelope's `instance` field is meaningful.
#[derive(Debug)]
pub struct ApiError {
    error: LedgerError,
    instance: String,
}

impl ApiError {
    /// Pairs an error with the request path that produced it.
    pub fn new(error: LedgerError, instance: impl Into<String>) -> Self {
        Self {
            error,
            instance: instance.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let retryable = matches!(
            self.error,
            LedgerError::Conflict { .. } | LedgerError::ServiceUnavailable { .. }
        )
        .then(|| self.error.retryable());
        let detail = match &self.error {
            // Never leak internals of an unhandled exception to the client.
            LedgerError::Internal { .. } => "an internal error occurred".to_string(),
            other => other.to_string(),
        };
        let body = ErrorBody {
            kind: self.error.type_tag(),
            status: self.error.http_status(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            detail,
            instance: self.instance,
            trace_id: ulid::Ulid::new().to_string(),
            retryable,
        };
        (status, Json(body)).into_response()
    }
}
