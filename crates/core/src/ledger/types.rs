//! Enums shared across ledger entities.

use serde::{Deserialize, Serialize};

/// The side an account's balance is expected to accumulate on.
///
/// Immutable once set on an Account. Determines the sign convention used
/// by [`crate::ledger::account::Account::apply_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Balance accumulates on the debit side (assets, expenses).
    Debit,
    /// Balance accumulates on the credit side (liabilities, equity, revenue).
    Credit,
}

/// The direction of a single Entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

/// Transaction lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Recorded but not yet posted; affects only pending balance fields.
    Pending,
    /// Posted to the ledger; affects posted balance fields. Terminal except for archival.
    Posted,
    /// Archived. Terminal.
    Archived,
}

impl TransactionStatus {
    /// Whether `self -> target` is a legal transition per the state table in §4.4.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Posted)
                | (Self::Pending, Self::Archived)
                | (Self::Posted, Self::Archived)
        )
    }
}

/// Settlement lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Entries may still be attached or removed.
    Drafting,
    /// The balancing Transaction is being generated.
    Processing,
    /// The balancing Transaction has been recorded as pending.
    Pending,
    /// The balancing Transaction has posted. Terminal in the happy path.
    Posted,
    /// Archival has been initiated.
    Archiving,
    /// Archived. Terminal.
    Archived,
}

impl SettlementStatus {
    /// Whether `self -> target` is a legal transition per the state table in §4.5.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Drafting, Self::Processing)
            | (Self::Processing, Self::Pending)
            | (Self::Pending, Self::Posted)
            | (Self::Archiving, Self::Archived) => true,
            (from, Self::Archiving) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Whether this status has no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Archived)
    }
}

/// Field a [`crate::ledger::monitor::AlertCondition`] compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertField {
    /// Compares against `Account::posted_amount`.
    Balance,
    /// Compares against `Account::created`.
    Created,
    /// Compares against `Account::updated`.
    Updated,
}

/// Comparison operator used by a [`crate::ledger::monitor::AlertCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertOperator {
    /// `=`
    #[serde(rename = "=")]
    Eq,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `<=`
    #[serde(rename = "<=")]
    Lte,
    /// `>=`
    #[serde(rename = ">=")]
    Gte,
    /// `!=`
    #[serde(rename = "!=")]
    Ne,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_pending_to_posted_is_legal() {
        assert!(TransactionStatus::Pending.can_transition_to(TransactionStatus::Posted));
    }

    #[test]
    fn transaction_posted_to_pending_is_illegal() {
        assert!(!TransactionStatus::Posted.can_transition_to(TransactionStatus::Pending));
    }

    #[test]
    fn transaction_archived_is_terminal() {
        assert!(!TransactionStatus::Archived.can_transition_to(TransactionStatus::Posted));
        assert!(!TransactionStatus::Archived.can_transition_to(TransactionStatus::Pending));
    }

    #[test]
    fn settlement_happy_path_transitions_are_legal() {
        assert!(SettlementStatus::Drafting.can_transition_to(SettlementStatus::Processing));
        assert!(SettlementStatus::Processing.can_transition_to(SettlementStatus::Pending));
        assert!(SettlementStatus::Pending.can_transition_to(SettlementStatus::Posted));
    }

    #[test]
    fn settlement_any_nonterminal_can_start_archiving() {
        assert!(SettlementStatus::Drafting.can_transition_to(SettlementStatus::Archiving));
        assert!(SettlementStatus::Processing.can_transition_to(SettlementStatus::Archiving));
        assert!(SettlementStatus::Pending.can_transition_to(SettlementStatus::Archiving));
        assert!(SettlementStatus::Posted.can_transition_to(SettlementStatus::Archiving));
        assert!(!SettlementStatus::Archived.can_transition_to(SettlementStatus::Archiving));
    }

    #[test]
    fn settlement_skipping_processing_is_illegal() {
        assert!(!SettlementStatus::Drafting.can_transition_to(SettlementStatus::Pending));
    }
}
