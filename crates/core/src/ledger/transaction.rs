//! Transaction entity: an ordered, balanced set of Entries.

use chrono::{DateTime, Utc};
use ledgr_shared::types::{LedgerId, OrganizationId, TransactionId};
use serde::{Deserialize, Serialize};

use super::entry::Entry;
use super::ledger::Ledger;
use super::types::TransactionStatus;
use super::validation::{validate_currency_agreement, validate_entries};
use ledgr_shared::LedgerError;

/// An immutable, balanced record of value movement between Accounts.
///
/// Constructed only through [`Transaction::new`], which enforces that the
/// entries balance, that no account repeats, and that every entry agrees
/// with the Ledger's currency, before a value can exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for this transaction.
    pub id: TransactionId,
    /// Tenant that owns this transaction.
    pub organization_id: OrganizationId,
    /// Ledger this transaction is recorded in.
    pub ledger_id: LedgerId,
    /// The entries that make up this transaction. Always at least a pair.
    pub entries: Vec<Entry>,
    /// Client-supplied idempotency key. Unique per `(organization_id, ledger_id)` when present.
    pub idempotency_key: Option<String>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Lifecycle status. Every entry's `status` mirrors this.
    pub status: TransactionStatus,
    /// The effective date/time of this transaction, independent of `created`.
    pub effective_at: DateTime<Utc>,
    /// Arbitrary caller-supplied metadata.
    pub metadata: Option<serde_json::Value>,
    /// Creation timestamp, server-assigned.
    pub created: DateTime<Utc>,
    /// Last-update timestamp, server-assigned.
    pub updated: DateTime<Utc>,
}

impl Transaction {
    /// Constructs a new transaction, validating that it balances, has no
    /// repeated accounts, and agrees with the Ledger's currency.
    ///
    /// Every entry's `status` is forced to match `status` and its
    /// `transaction_id`/`organization_id` are forced to match this
    /// transaction's, regardless of what the caller passed in the input
    /// entries - the transaction is the source of truth for both.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] if the entries are fewer than
    /// two, unbalanced, repeat an account, or disagree with the Ledger's
    /// currency.
    pub fn new(
        organization_id: OrganizationId,
        ledger: &Ledger,
        mut entries: Vec<Entry>,
        status: TransactionStatus,
        effective_at: DateTime<Utc>,
        idempotency_key: Option<String>,
        description: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, LedgerError> {
        let id = TransactionId::generate();
        let now = Utc::now();

        for entry in &mut entries {
            entry.organization_id = organization_id.clone();
            entry.transaction_id = id.clone();
            entry.status = status;
            entry.created = now;
            entry.updated = now;
        }

        validate_entries(&entries)?;
        validate_currency_agreement(&entries, &ledger.currency, ledger.currency_exponent)?;

        Ok(Self {
            id,
            organization_id,
            ledger_id: ledger.id.clone(),
            entries,
            idempotency_key,
            description,
            status,
            effective_at,
            metadata,
            created: now,
            updated: now,
        })
    }

    /// Attempts the `pending -> posted` transition.
    ///
    /// Returns a new `Transaction` with `status = Posted` and every entry's
    /// `status` updated to match. The caller is responsible for moving the
    /// affected accounts' balances via the same three-phase protocol as
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if `self.status` is not `Pending`.
    pub fn post(&self) -> Result<Self, LedgerError> {
        self.transition_to(TransactionStatus::Posted)
    }

    /// Attempts the transition to `Archived` from either `Pending` or `Posted`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if the transition is not in the table.
    pub fn archive(&self) -> Result<Self, LedgerError> {
        self.transition_to(TransactionStatus::Archived)
    }

    fn transition_to(&self, target: TransactionStatus) -> Result<Self, LedgerError> {
        if !self.status.can_transition_to(target) {
            return Err(LedgerError::illegal_transition(format!(
                "cannot transition transaction from {:?} to {:?}",
                self.status, target
            )));
        }
        let mut next = self.clone();
        next.status = target;
        next.updated = Utc::now();
        for entry in &mut next.entries {
            entry.status = target;
            entry.updated = next.updated;
        }
        Ok(next)
    }

    /// Sum of debit amounts across all entries. Always equal to [`Self::total_credits`].
    #[must_use]
    pub fn total_debits(&self) -> u128 {
        self.entries
            .iter()
            .filter(|e| matches!(e.direction, super::types::EntryDirection::Debit))
            .map(|e| u128::from(e.amount))
            .sum()
    }

    /// Sum of credit amounts across all entries. Always equal to [`Self::total_debits`].
    #[must_use]
    pub fn total_credits(&self) -> u128 {
        self.entries
            .iter()
            .filter(|e| matches!(e.direction, super::types::EntryDirection::Credit))
            .map(|e| u128::from(e.amount))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::EntryDirection;
    use ledgr_shared::types::{AccountId, EntryId};

    fn ledger() -> Ledger {
        Ledger::new(OrganizationId::generate(), "Primary", "USD", 2).unwrap()
    }

    fn raw_entry(account_id: AccountId, direction: EntryDirection, amount: u64) -> Entry {
        let now = Utc::now();
        Entry {
            id: EntryId::generate(),
            organization_id: OrganizationId::generate(),
            transaction_id: TransactionId::generate(),
            account_id,
            direction,
            amount,
            currency: "USD".to_string(),
            currency_exponent: 2,
            status: TransactionStatus::Pending,
            created: now,
            updated: now,
        }
    }

    #[test]
    fn construction_succeeds_for_balanced_entries() {
        let ledger = ledger();
        let entries = vec![
            raw_entry(AccountId::generate(), EntryDirection::Debit, 10_000),
            raw_entry(AccountId::generate(), EntryDirection::Credit, 10_000),
        ];
        let txn = Transaction::new(
            ledger.organization_id.clone(),
            &ledger,
            entries,
            TransactionStatus::Posted,
            Utc::now(),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(txn.total_debits(), 10_000);
        assert_eq!(txn.total_credits(), 10_000);
        assert!(txn.entries.iter().all(|e| e.status == TransactionStatus::Posted));
    }

    #[test]
    fn construction_rejects_unbalanced_entries() {
        let ledger = ledger();
        let entries = vec![
            raw_entry(AccountId::generate(), EntryDirection::Debit, 10_000),
            raw_entry(AccountId::generate(), EntryDirection::Credit, 9_999),
        ];
        let result = Transaction::new(
            ledger.organization_id.clone(),
            &ledger,
            entries,
            TransactionStatus::Posted,
            Utc::now(),
            None,
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn post_transitions_pending_to_posted() {
        let ledger = ledger();
        let entries = vec![
            raw_entry(AccountId::generate(), EntryDirection::Debit, 500),
            raw_entry(AccountId::generate(), EntryDirection::Credit, 500),
        ];
        let txn = Transaction::new(
            ledger.organization_id.clone(),
            &ledger,
            entries,
            TransactionStatus::Pending,
            Utc::now(),
            None,
            None,
            None,
        )
        .unwrap();
        let posted = txn.post().unwrap();
        assert_eq!(posted.status, TransactionStatus::Posted);
        assert!(posted.entries.iter().all(|e| e.status == TransactionStatus::Posted));
    }

    #[test]
    fn posting_an_already_posted_transaction_is_illegal() {
        let ledger = ledger();
        let entries = vec![
            raw_entry(AccountId::generate(), EntryDirection::Debit, 500),
            raw_entry(AccountId::generate(), EntryDirection::Credit, 500),
        ];
        let txn = Transaction::new(
            ledger.organization_id.clone(),
            &ledger,
            entries,
            TransactionStatus::Posted,
            Utc::now(),
            None,
            None,
            None,
        )
        .unwrap();
        assert!(txn.post().is_err());
    }

    #[test]
    fn archive_is_legal_from_pending_and_posted() {
        let ledger = ledger();
        let entries = |status| {
            vec![
                {
                    let mut e = raw_entry(AccountId::generate(), EntryDirection::Debit, 500);
                    e.status = status;
                    e
                },
                {
                    let mut e = raw_entry(AccountId::generate(), EntryDirection::Credit, 500);
                    e.status = status;
                    e
                },
            ]
        };
        let pending = Transaction::new(
            ledger.organization_id.clone(),
            &ledger,
            entries(TransactionStatus::Pending),
            TransactionStatus::Pending,
            Utc::now(),
            None,
            None,
            None,
        )
        .unwrap();
        let posted = Transaction::new(
            ledger.organization_id.clone(),
            &ledger,
            entries(TransactionStatus::Posted),
            TransactionStatus::Posted,
            Utc::now(),
            None,
            None,
            None,
        )
        .unwrap();
        assert!(pending.archive().is_ok());
        assert!(posted.archive().is_ok());
    }
}
