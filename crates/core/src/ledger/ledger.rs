//! Ledger entity: a tenant's currency-scoped container for accounts and transactions.

use chrono::{DateTime, Utc};
use ledgr_shared::types::{LedgerId, OrganizationId};
use serde::{Deserialize, Serialize};

use super::validation::validate_currency_exponent;
use ledgr_shared::LedgerError;

/// A Ledger groups Accounts and Transactions under one currency.
///
/// `currency` and `currency_exponent` are immutable once set; every Entry
/// posted within this ledger must agree with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Unique identifier for this ledger.
    pub id: LedgerId,
    /// Tenant that owns this ledger.
    pub organization_id: OrganizationId,
    /// Human-readable name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// ISO 4217 currency code. Immutable once set.
    pub currency: String,
    /// Number of minor-unit decimal places, typically 2. Immutable once set.
    pub currency_exponent: u8,
    /// Arbitrary caller-supplied metadata.
    pub metadata: Option<serde_json::Value>,
    /// Creation timestamp, server-assigned.
    pub created: DateTime<Utc>,
    /// Last-update timestamp, server-assigned.
    pub updated: DateTime<Utc>,
}

impl Ledger {
    /// Constructs a new ledger, validating `currency_exponent` is in `[0, 18]`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] if `currency_exponent` is out of range.
    pub fn new(
        organization_id: OrganizationId,
        name: impl Into<String>,
        currency: impl Into<String>,
        currency_exponent: u8,
    ) -> Result<Self, LedgerError> {
        validate_currency_exponent(currency_exponent)?;
        let now = Utc::now();
        Ok(Self {
            id: LedgerId::generate(),
            organization_id,
            name: name.into(),
            description: None,
            currency: currency.into(),
            currency_exponent,
            metadata: None,
            created: now,
            updated: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_rejects_out_of_range_exponent() {
        let org = OrganizationId::generate();
        assert!(Ledger::new(org, "Primary", "USD", 19).is_err());
    }

    #[test]
    fn construction_accepts_typical_exponent() {
        let org = OrganizationId::generate();
        let ledger = Ledger::new(org, "Primary", "USD", 2).unwrap();
        assert_eq!(ledger.currency, "USD");
        assert_eq!(ledger.currency_exponent, 2);
    }
}
