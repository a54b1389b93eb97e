//! The ledger's closed error taxonomy.
//!
//! Every fallible operation in the repository, service, and HTTP layers
//! resolves to one of these variants. The HTTP adapter has exactly one
//! place that turns a `LedgerError` into a response, so a new variant
//! can never silently fall through to a bare 500.

use thiserror::Error;

/// Result type alias using [`LedgerError`].
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Subkind of a [`LedgerError::Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Another writer advanced `lock_version` between Phase 1 and Phase 3. Retryable.
    OptimisticLock,
    /// `(organization_id, ledger_id, idempotency_key)` already exists. Not retryable.
    IdempotencyCollision,
    /// The requested state transition is not in the transition table. Not retryable.
    IllegalTransition,
    /// More than one row matched a primary-key update. Not retryable.
    DataIntegrity,
}

impl ConflictKind {
    /// Whether a conflict of this subkind should be retried by the service boundary.
    #[must_use]
    pub const fn retryable(self) -> bool {
        matches!(self, Self::OptimisticLock)
    }
}

/// The ledger's closed error taxonomy.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Request or entity failed a structural invariant or schema check.
    #[error("validation failed: {message}")]
    Validation {
        /// Human-readable explanation.
        message: String,
    },

    /// Bearer token missing or failed signature/expiry verification.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Human-readable explanation.
        message: String,
    },

    /// Token verified but lacks the required scope.
    #[error("forbidden: {message}")]
    Forbidden {
        /// Human-readable explanation.
        message: String,
    },

    /// A referenced entity does not exist within the caller's tenant scope.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "account").
        resource: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// Conflict on write. See [`ConflictKind`] for the subkind and retryability.
    #[error("conflict ({kind:?}): {message}")]
    Conflict {
        /// The subkind of conflict.
        kind: ConflictKind,
        /// Human-readable explanation.
        message: String,
    },

    /// Upstream rate limiting.
    #[error("too many requests")]
    TooManyRequests {
        /// Seconds the caller should wait before retrying, if known.
        retry_after_secs: Option<u64>,
    },

    /// Unhandled exception; never a deliberate domain response.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable explanation. Never sent verbatim to clients.
        message: String,
    },

    /// Storage temporarily unable to serve the request (serialization failure, deadlock).
    #[error("service unavailable: {message}")]
    ServiceUnavailable {
        /// Whether the caller should retry.
        retryable: bool,
        /// Human-readable explanation.
        message: String,
    },
}

impl LedgerError {
    /// Convenience constructor for [`LedgerError::Validation`].
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`LedgerError::NotFound`].
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Convenience constructor for a retryable optimistic-lock conflict.
    #[must_use]
    pub fn optimistic_lock_conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            kind: ConflictKind::OptimisticLock,
            message: message.into(),
        }
    }

    /// Convenience constructor for a non-retryable idempotency-key collision.
    #[must_use]
    pub fn idempotency_collision(message: impl Into<String>) -> Self {
        Self::Conflict {
            kind: ConflictKind::IdempotencyCollision,
            message: message.into(),
        }
    }

    /// Convenience constructor for a non-retryable illegal state transition.
    #[must_use]
    pub fn illegal_transition(message: impl Into<String>) -> Self {
        Self::Conflict {
            kind: ConflictKind::IllegalTransition,
            message: message.into(),
        }
    }

    /// Convenience constructor for a non-retryable data-integrity anomaly.
    #[must_use]
    pub fn data_integrity(message: impl Into<String>) -> Self {
        Self::Conflict {
            kind: ConflictKind::DataIntegrity,
            message: message.into(),
        }
    }

    /// Machine-readable discriminator matching the HTTP `type` field in §6.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "BAD_REQUEST",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::TooManyRequests { .. } => "TOO_MANY_REQUESTS",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
            Self::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
        }
    }

    /// HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::TooManyRequests { .. } => 429,
            Self::Internal { .. } => 500,
            Self::ServiceUnavailable { .. } => 503,
        }
    }

    /// Whether the retry wrapper (§4.3) should retry this error.
    #[must_use]
    pub const fn retryable(&self) -> bool {
        match self {
            Self::Conflict { kind, .. } => kind.retryable(),
            Self::ServiceUnavailable { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimistic_lock_conflict_is_retryable() {
        let err = LedgerError::optimistic_lock_conflict("version moved");
        assert!(err.retryable());
        assert_eq!(err.http_status(), 409);
        assert_eq!(err.type_tag(), "CONFLICT");
    }

    #[test]
    fn idempotency_collision_is_not_retryable() {
        let err = LedgerError::idempotency_collision("duplicate key");
        assert!(!err.retryable());
        assert_eq!(err.http_status(), 409);
    }

    #[test]
    fn service_unavailable_respects_retryable_flag() {
        let retryable = LedgerError::ServiceUnavailable {
            retryable: true,
            message: "deadlock detected".into(),
        };
        let fatal = LedgerError::ServiceUnavailable {
            retryable: false,
            message: "pool exhausted".into(),
        };
        assert!(retryable.retryable());
        assert!(!fatal.retryable());
        assert_eq!(retryable.http_status(), 503);
    }

    #[test]
    fn not_found_is_never_retryable() {
        let err = LedgerError::not_found("account", "lac_01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert!(!err.retryable());
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.type_tag(), "NOT_FOUND");
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = LedgerError::validation("entries must balance");
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.type_tag(), "BAD_REQUEST");
        assert!(!err.retryable());
    }
}
