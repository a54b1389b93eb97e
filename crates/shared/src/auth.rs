//! Bearer-token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims carried by every bearer token the service accepts.
///
/// `sub` is the caller's organization id, not a user id: the service has
/// no user accounts of its own, only tenant-scoped API callers. `ledgerId`
/// is never a claim; it always comes from the URL path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the calling organization's id.
    pub sub: String,
    /// Token issuer, checked against [`crate::config::JwtConfig::issuer`].
    pub iss: String,
    /// Granted permission scopes, e.g. `ledger:transaction:write`.
    #[serde(default)]
    pub scope: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Creates claims for the given organization, issuer, and scopes.
    #[must_use]
    pub fn new(
        organization_id: impl Into<String>,
        issuer: impl Into<String>,
        scope: Vec<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: organization_id.into(),
            iss: issuer.into(),
            scope,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// The calling organization's id.
    #[must_use]
    pub fn organization_id(&self) -> &str {
        &self.sub
    }

    /// Whether the token carries the given permission scope.
    #[must_use]
    pub fn has_scope(&self, permission: &str) -> bool {
        self.scope.iter().any(|s| s == permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn has_scope_matches_exact_permission() {
        let claims = Claims::new(
            "org_01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "ledgr",
            vec!["ledger:transaction:write".to_string()],
            Utc::now() + Duration::minutes(5),
        );
        assert!(claims.has_scope("ledger:transaction:write"));
        assert!(!claims.has_scope("ledger:transaction:delete"));
    }

    #[test]
    fn organization_id_reads_back_subject() {
        let claims = Claims::new(
            "org_01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "ledgr",
            vec![],
            Utc::now() + Duration::minutes(5),
        );
        assert_eq!(claims.organization_id(), "org_01ARZ3NDEKTSV4RRFFQ69G5FAV");
    }
}
