//! Settlement entity: offsets posted entries on one account against a contra account.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use ledgr_shared::types::{AccountId, EntryId, OrganizationId, SettlementId, TransactionId};
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::entry::Entry;
use super::types::{NormalBalance, SettlementStatus, TransactionStatus};
use ledgr_shared::LedgerError;

/// A Settlement nets posted Entries on `settled_account_id` against `contra_account_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier for this settlement.
    pub id: SettlementId,
    /// Tenant that owns this settlement.
    pub organization_id: OrganizationId,
    /// The balancing Transaction generated once the settlement processes, if any.
    pub transaction_id: Option<TransactionId>,
    /// The account whose posted entries are being offset.
    pub settled_account_id: AccountId,
    /// The account that receives the opposite side of the netted amount.
    pub contra_account_id: AccountId,
    /// Net amount, computed from `attached_entries` when processing begins.
    pub amount: u64,
    /// Copied from the settled account at creation. Immutable once set.
    pub normal_balance: NormalBalance,
    /// Copied from the Ledger at creation. Immutable once set.
    pub currency: String,
    /// Copied from the Ledger at creation. Immutable once set.
    pub currency_exponent: u8,
    /// Lifecycle status.
    pub status: SettlementStatus,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional caller-supplied external reference.
    pub external_reference: Option<String>,
    /// Optional upper bound on the effective date of entries eligible for attachment.
    pub effective_at_upper_bound: Option<DateTime<Utc>>,
    /// Entries currently attached to this settlement.
    pub attached_entries: HashSet<EntryId>,
    /// Arbitrary caller-supplied metadata.
    pub metadata: Option<serde_json::Value>,
    /// Creation timestamp, server-assigned.
    pub created: DateTime<Utc>,
    /// Last-update timestamp, server-assigned.
    pub updated: DateTime<Utc>,
}

impl Settlement {
    /// Creates a new settlement in `drafting` with no attached entries.
    ///
    /// Currency, exponent, and normal balance are copied from `ledger` and
    /// `settled_account` and become immutable.
    #[must_use]
    pub fn create(
        organization_id: OrganizationId,
        settled_account: &Account,
        contra_account_id: AccountId,
        ledger_currency: impl Into<String>,
        ledger_currency_exponent: u8,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SettlementId::generate(),
            organization_id,
            transaction_id: None,
            settled_account_id: settled_account.id.clone(),
            contra_account_id,
            amount: 0,
            normal_balance: settled_account.normal_balance,
            currency: ledger_currency.into(),
            currency_exponent: ledger_currency_exponent,
            status: SettlementStatus::Drafting,
            description: None,
            external_reference: None,
            effective_at_upper_bound: None,
            attached_entries: HashSet::new(),
            metadata: None,
            created: now,
            updated: now,
        }
    }

    /// Attaches entries, enforcing that each is eligible (posted and on
    /// `settled_account_id`) and that the settlement is still `drafting`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if not `drafting`, or
    /// [`LedgerError::Validation`] if an entry is ineligible.
    pub fn add_entries(&self, entries: &[Entry]) -> Result<Self, LedgerError> {
        if self.status != SettlementStatus::Drafting {
            return Err(LedgerError::illegal_transition(
                "entries may only be attached while a settlement is drafting",
            ));
        }

        for entry in entries {
            if entry.account_id != self.settled_account_id {
                return Err(LedgerError::validation(format!(
                    "entry {} does not belong to the settled account",
                    entry.id
                )));
            }
            if entry.status != TransactionStatus::Posted {
                return Err(LedgerError::validation(format!(
                    "entry {} is not posted",
                    entry.id
                )));
            }
        }

        let mut next = self.clone();
        for entry in entries {
            next.attached_entries.insert(entry.id.clone());
        }
        next.updated = Utc::now();
        Ok(next)
    }

    /// Detaches entries. Precondition: `drafting`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if not `drafting`.
    pub fn remove_entries(&self, entry_ids: &[EntryId]) -> Result<Self, LedgerError> {
        if self.status != SettlementStatus::Drafting {
            return Err(LedgerError::illegal_transition(
                "entries may only be detached while a settlement is drafting",
            ));
        }
        let mut next = self.clone();
        for id in entry_ids {
            next.attached_entries.remove(id);
        }
        next.updated = Utc::now();
        Ok(next)
    }

    /// Computes the net amount of the given posted entries, matching the
    /// settled account's `normal_balance` convention: entries in the
    /// account's normal direction add, the opposite direction subtracts.
    #[must_use]
    pub fn net_amount(&self, entries: &[Entry]) -> i64 {
        entries
            .iter()
            .filter(|e| self.attached_entries.contains(&e.id))
            .map(|e| {
                let amount = i64::try_from(e.amount).unwrap_or(i64::MAX);
                let matches_normal = matches!(
                    (self.normal_balance, e.direction),
                    (NormalBalance::Debit, super::types::EntryDirection::Debit)
                        | (NormalBalance::Credit, super::types::EntryDirection::Credit)
                );
                if matches_normal { amount } else { -amount }
            })
            .sum()
    }

    /// Attempts a status transition per the table in §4.5.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if the transition is not in the table.
    pub fn transition_to(&self, target: SettlementStatus) -> Result<Self, LedgerError> {
        if !self.status.can_transition_to(target) {
            return Err(LedgerError::illegal_transition(format!(
                "cannot transition settlement from {:?} to {:?}",
                self.status, target
            )));
        }
        let mut next = self.clone();
        next.status = target;
        next.updated = Utc::now();
        Ok(next)
    }

    /// Whether this settlement may still be mutated (add/remove entries,
    /// field updates other than metadata) - only while `drafting`.
    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.status == SettlementStatus::Drafting
    }

    /// Whether this settlement may be deleted outright (only while `drafting`;
    /// once processing starts, deletion must go through archival).
    #[must_use]
    pub fn is_deletable(&self) -> bool {
        self.status == SettlementStatus::Drafting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgr_shared::types::{LedgerId, TransactionId};

    fn settled_account() -> Account {
        Account::new(
            OrganizationId::generate(),
            LedgerId::generate(),
            "Receivable",
            NormalBalance::Debit,
        )
    }

    fn posted_entry(account_id: AccountId, direction: super::super::types::EntryDirection, amount: u64) -> Entry {
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
            status: TransactionStatus::Posted,
            created: now,
            updated: now,
        }
    }

    #[test]
    fn create_starts_in_drafting_with_no_entries() {
        let account = settled_account();
        let settlement = Settlement::create(
            account.organization_id.clone(),
            &account,
            AccountId::generate(),
            "USD",
            2,
        );
        assert_eq!(settlement.status, SettlementStatus::Drafting);
        assert!(settlement.attached_entries.is_empty());
    }

    #[test]
    fn add_entries_rejects_entry_on_wrong_account() {
        let account = settled_account();
        let settlement = Settlement::create(
            account.organization_id.clone(),
            &account,
            AccountId::generate(),
            "USD",
            2,
        );
        let foreign_entry = posted_entry(
            AccountId::generate(),
            super::super::types::EntryDirection::Debit,
            700,
        );
        assert!(settlement.add_entries(&[foreign_entry]).is_err());
    }

    #[test]
    fn add_entries_rejects_unposted_entry() {
        let account = settled_account();
        let settlement = Settlement::create(
            account.organization_id.clone(),
            &account,
            AccountId::generate(),
            "USD",
            2,
        );
        let mut pending_entry = posted_entry(
            account.id.clone(),
            super::super::types::EntryDirection::Debit,
            700,
        );
        pending_entry.status = TransactionStatus::Pending;
        assert!(settlement.add_entries(&[pending_entry]).is_err());
    }

    #[test]
    fn scenario_six_settlement_happy_path_nets_attached_entries() {
        let account = settled_account();
        let settlement = Settlement::create(
            account.organization_id.clone(),
            &account,
            AccountId::generate(),
            "USD",
            2,
        );
        let e1 = posted_entry(
            account.id.clone(),
            super::super::types::EntryDirection::Debit,
            400,
        );
        let e2 = posted_entry(
            account.id.clone(),
            super::super::types::EntryDirection::Debit,
            300,
        );
        let settlement = settlement.add_entries(&[e1.clone(), e2.clone()]).unwrap();
        assert_eq!(settlement.net_amount(&[e1, e2]), 700);

        let processing = settlement.transition_to(SettlementStatus::Processing).unwrap();
        let pending = processing.transition_to(SettlementStatus::Pending).unwrap();
        let posted = pending.transition_to(SettlementStatus::Posted).unwrap();
        assert_eq!(posted.status, SettlementStatus::Posted);
        assert!(posted.transition_to(SettlementStatus::Processing).is_err());
    }

    #[test]
    fn mutation_after_drafting_is_rejected() {
        let account = settled_account();
        let settlement = Settlement::create(
            account.organization_id.clone(),
            &account,
            AccountId::generate(),
            "USD",
            2,
        )
        .transition_to(SettlementStatus::Processing)
        .unwrap();
        assert!(!settlement.is_mutable());
        let entry = posted_entry(
            account.id.clone(),
            super::super::types::EntryDirection::Debit,
            100,
        );
        assert!(settlement.add_entries(&[entry]).is_err());
    }
}
