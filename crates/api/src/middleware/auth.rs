//! Bearer-token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use ledgr_shared::auth::Claims;
use ledgr_shared::jwt::JwtError;
use ledgr_shared::LedgerError;
use serde_json::json;

use crate::AppState;

fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Verifies the bearer token and stores its claims in request extensions for
/// downstream extractors ([`AuthUser`]) and handlers.
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.jwt_verifier.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            let message = match err {
                JwtError::Expired => "token has expired",
                JwtError::Invalid(_) => "invalid or malformed token",
            };
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid_token", "message": message })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The calling organization's id, straight from `Claims.sub`.
    #[must_use]
    pub fn organization_id(&self) -> &str {
        self.0.organization_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "authentication required"
                    })),
                )
            })
    }
}

/// Returns [`LedgerError::Forbidden`] if `claims` lacks `permission`.
///
/// # Errors
///
/// Returns [`LedgerError::Forbidden`] when the scope is missing.
pub fn check_scope(claims: &Claims, permission: &str) -> Result<(), LedgerError> {
    if claims.has_scope(permission) {
        Ok(())
    } else {
        Err(LedgerError::Forbidden {
            message: format!("missing required scope: {permission}"),
        })
    }
}
