//! Bearer-token verification.
//!
//! Token issuance is out of scope: tokens are minted by
//! an external identity provider and this service only ever verifies them.
//! The `test-util` feature exposes a minting helper so integration tests
//! can construct valid tokens without a real provider.

use jsonwebtoken::{DecodingKey, Validation, decode};
use thiserror::Error;

use crate::auth::Claims;

/// Errors raised while verifying a bearer token.
#[derive(Debug, Error)]
pub enum JwtError {
    /// The token's signature, issuer, or structure failed verification.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// The token's `exp` claim is in the past.
    #[error("token has expired")]
    Expired,
}

/// Verifies bearer tokens against a fixed secret and expected issuer.
#[derive(Clone)]
pub struct JwtVerifier {
    issuer: String,
    decoding_key: DecodingKey,
    #[cfg(feature = "test-util")]
    encoding_key: jsonwebtoken::EncodingKey,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("issuer", &self.issuer)
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtVerifier {
    /// Creates a verifier for the given secret and expected `iss` claim.
    #[must_use]
    pub fn new(secret: &str, issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            #[cfg(feature = "test-util")]
            encoding_key: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Verifies a bearer token's signature, issuer, and expiry, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::Expired`] if `exp` has passed, or
    /// [`JwtError::Invalid`] for any other signature, structure, or issuer
    /// mismatch.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }

    /// Mints a token for the given claims. Test-only: production tokens
    /// are issued by an external identity provider, never this service.
    #[cfg(feature = "test-util")]
    #[must_use]
    pub fn mint(&self, claims: &Claims) -> String {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding_key)
            .expect("claims always encode")
    }
}

#[cfg(all(test, feature = "test-util"))]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn verifier() -> JwtVerifier {
        JwtVerifier::new("test-secret-key-for-testing", "ledgr")
    }

    #[test]
    fn mint_then_verify_round_trips_claims() {
        let verifier = verifier();
        let claims = Claims::new(
            "org_01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "ledgr",
            vec!["ledger:transaction:write".to_string()],
            Utc::now() + Duration::minutes(5),
        );
        let token = verifier.mint(&claims);
        let verified = verifier.verify(&token).unwrap();
        assert_eq!(verified.sub, claims.sub);
        assert_eq!(verified.scope, claims.scope);
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = verifier();
        let claims = Claims::new(
            "org_01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "ledgr",
            vec![],
            Utc::now() - Duration::minutes(5),
        );
        let token = verifier.mint(&claims);
        assert!(matches!(verifier.verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let verifier = verifier();
        let claims = Claims::new(
            "org_01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "someone-else",
            vec![],
            Utc::now() + Duration::minutes(5),
        );
        let token = verifier.mint(&claims);
        assert!(matches!(verifier.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let verifier = verifier();
        assert!(matches!(
            verifier.verify("not.a.token"),
            Err(JwtError::Invalid(_))
        ));
    }
}
