//! Account entity and the `applyEntry` balance-mutation function.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ledgr_shared::types::{AccountId, LedgerId, OrganizationId};
use serde::{Deserialize, Serialize};

use super::entry::Entry;
use super::types::{EntryDirection, NormalBalance, TransactionStatus};

/// An account within a Ledger, tracking pending/posted/available balances
/// in minor-unit integers under optimistic concurrency control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for this account.
    pub id: AccountId,
    /// Tenant that owns this account.
    pub organization_id: OrganizationId,
    /// Ledger this account belongs to.
    pub ledger_id: LedgerId,
    /// Human-readable name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// The side this account's balance accumulates on. Immutable after creation.
    pub normal_balance: NormalBalance,
    /// Net pending balance, signed per `normal_balance`.
    pub pending_amount: i64,
    /// Net posted balance, signed per `normal_balance`.
    pub posted_amount: i64,
    /// Posted plus outgoing-pending balance, signed per `normal_balance`.
    pub available_amount: i64,
    /// Sum of pending credit entries.
    pub pending_credits: i64,
    /// Sum of pending debit entries.
    pub pending_debits: i64,
    /// Sum of posted credit entries.
    pub posted_credits: i64,
    /// Sum of posted debit entries.
    pub posted_debits: i64,
    /// Sum of credit entries reflected in `available_amount`.
    pub available_credits: i64,
    /// Sum of debit entries reflected in `available_amount`.
    pub available_debits: i64,
    /// Optimistic-concurrency version. Starts at 0.
    pub lock_version: i64,
    /// Arbitrary caller-supplied metadata.
    pub metadata: Option<serde_json::Value>,
    /// Creation timestamp, server-assigned.
    pub created: DateTime<Utc>,
    /// Last-update timestamp, server-assigned.
    pub updated: DateTime<Utc>,
}

/// The per-field change `applyEntry` contributes to an Account, isolated so
/// the pending-to-posted transition can compose two deltas
/// (undo the pending one, apply the posted one) instead of re-deriving the
/// arithmetic.
#[derive(Debug, Clone, Copy, Default)]
struct Delta {
    pending_amount: i64,
    posted_amount: i64,
    available_amount: i64,
    pending_credits: i64,
    pending_debits: i64,
    posted_credits: i64,
    posted_debits: i64,
    available_credits: i64,
    available_debits: i64,
}

impl Delta {
    const fn negate(self) -> Self {
        Self {
            pending_amount: -self.pending_amount,
            posted_amount: -self.posted_amount,
            available_amount: -self.available_amount,
            pending_credits: -self.pending_credits,
            pending_debits: -self.pending_debits,
            posted_credits: -self.posted_credits,
            posted_debits: -self.posted_debits,
            available_credits: -self.available_credits,
            available_debits: -self.available_debits,
        }
    }
}

fn entry_delta(normal_balance: NormalBalance, entry: &Entry) -> Delta {
    let amount = i64::try_from(entry.amount).unwrap_or(i64::MAX);
    let is_posted = matches!(entry.status, TransactionStatus::Posted);
    let matches_normal = matches!(
        (normal_balance, entry.direction),
        (NormalBalance::Debit, EntryDirection::Debit)
            | (NormalBalance::Credit, EntryDirection::Credit)
    );
    let signed = if matches_normal { amount } else { -amount };

    let mut delta = Delta::default();
    if is_posted {
        match entry.direction {
            EntryDirection::Debit => delta.posted_debits = amount,
            EntryDirection::Credit => delta.posted_credits = amount,
        }
        delta.posted_amount = signed;
        delta.available_amount = signed;
        match entry.direction {
            EntryDirection::Debit => delta.available_debits = amount,
            EntryDirection::Credit => delta.available_credits = amount,
        }
    } else {
        match entry.direction {
            EntryDirection::Debit => delta.pending_debits = amount,
            EntryDirection::Credit => delta.pending_credits = amount,
        }
        delta.pending_amount = signed;
        // Available reflects posted entries plus pending entries going the
        // opposite way from the account's normal balance; a pending entry in
        // the normal direction doesn't touch it yet.
        if !matches_normal {
            delta.available_amount = -amount;
            match entry.direction {
                EntryDirection::Debit => delta.available_debits = amount,
                EntryDirection::Credit => delta.available_credits = amount,
            }
        }
    }
    delta
}

impl Account {
    /// Creates a fresh account with all balances and `lock_version` at zero.
    #[must_use]
    pub fn new(
        organization_id: OrganizationId,
        ledger_id: LedgerId,
        name: impl Into<String>,
        normal_balance: NormalBalance,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::generate(),
            organization_id,
            ledger_id,
            name: name.into(),
            description: None,
            normal_balance,
            pending_amount: 0,
            posted_amount: 0,
            available_amount: 0,
            pending_credits: 0,
            pending_debits: 0,
            posted_credits: 0,
            posted_debits: 0,
            available_credits: 0,
            available_debits: 0,
            lock_version: 0,
            metadata: None,
            created: now,
            updated: now,
        }
    }

    /// Applies a single entry to this account, returning a new `Account`
    /// value with updated balances.
    ///
    /// `lock_version` is carried through unchanged; the increment happens
    /// at write time, not here. The entry's own `status` determines whether
    /// the pending or posted fields move.
    #[must_use]
    pub fn apply_entry(&self, entry: &Entry) -> Self {
        let mut next = self.clone();
        let delta = entry_delta(self.normal_balance, entry);
        next.apply_delta(delta);
        next.updated = Utc::now();
        next
    }

    /// Moves a previously-applied `pending` entry's contribution into the
    /// posted fields, as the `pending -> posted` transaction transition
    /// requires: undoes the pending delta this entry
    /// contributed, then applies the delta it would contribute as `posted`.
    ///
    /// `entry` must carry `status = Pending`; the caller is responsible for
    /// having applied it as pending in the first place.
    #[must_use]
    pub fn move_pending_to_posted(&self, entry: &Entry) -> Self {
        let mut next = self.clone();
        let pending_delta = entry_delta(self.normal_balance, entry);
        let mut posted_entry = entry.clone();
        posted_entry.status = TransactionStatus::Posted;
        let posted_delta = entry_delta(self.normal_balance, &posted_entry);

        next.apply_delta(pending_delta.negate());
        next.apply_delta(posted_delta);
        next.updated = Utc::now();
        next
    }

    fn apply_delta(&mut self, delta: Delta) {
        self.pending_amount += delta.pending_amount;
        self.posted_amount += delta.posted_amount;
        self.available_amount += delta.available_amount;
        self.pending_credits += delta.pending_credits;
        self.pending_debits += delta.pending_debits;
        self.posted_credits += delta.posted_credits;
        self.posted_debits += delta.posted_debits;
        self.available_credits += delta.available_credits;
        self.available_debits += delta.available_debits;
    }

    /// Applies every entry destined for this account, in order. Used when
    /// folding multiple entries against one account.
    #[must_use]
    pub fn apply_entries<'a>(&self, entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        entries
            .into_iter()
            .fold(self.clone(), |account, entry| account.apply_entry(entry))
    }
}

/// Builds the validate-and-build update set: for each entry, the new
/// `Account` value after `applyEntry`, keyed by account id. Since each
/// account appears in at most one entry per transaction, this never folds
/// more than once per account.
#[must_use]
pub fn apply_entries_to_accounts(
    accounts: &HashMap<AccountId, Account>,
    entries: &[Entry],
) -> HashMap<AccountId, Account> {
    let mut updated = HashMap::with_capacity(entries.len());
    for entry in entries {
        let current = updated
            .get(&entry.account_id)
            .or_else(|| accounts.get(&entry.account_id))
            .expect("account must be present in Phase 1 read set");
        updated.insert(entry.account_id.clone(), current.apply_entry(entry));
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgr_shared::types::{EntryId, TransactionId};

    fn make_entry(
        account_id: AccountId,
        direction: EntryDirection,
        amount: u64,
        status: TransactionStatus,
    ) -> Entry {
        Entry {
            id: EntryId::generate(),
            organization_id: OrganizationId::generate(),
            transaction_id: TransactionId::generate(),
            account_id,
            direction,
            amount,
            currency: "USD".to_string(),
            currency_exponent: 2,
            status,
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn debit_normal_account_posted_debit_increases_balance() {
        let org = OrganizationId::generate();
        let ledger = LedgerId::generate();
        let account = Account::new(org, ledger, "Cash", NormalBalance::Debit);
        let entry = make_entry(
            account.id.clone(),
            EntryDirection::Debit,
            10_000,
            TransactionStatus::Posted,
        );

        let next = account.apply_entry(&entry);
        assert_eq!(next.posted_amount, 10_000);
        assert_eq!(next.posted_debits, 10_000);
        assert_eq!(next.available_amount, 10_000);
        assert_eq!(next.lock_version, 0);
    }

    #[test]
    fn debit_normal_account_posted_credit_decreases_balance() {
        let org = OrganizationId::generate();
        let ledger = LedgerId::generate();
        let account = Account::new(org, ledger, "Cash", NormalBalance::Debit);
        let entry = make_entry(
            account.id.clone(),
            EntryDirection::Credit,
            4_000,
            TransactionStatus::Posted,
        );

        let next = account.apply_entry(&entry);
        assert_eq!(next.posted_amount, -4_000);
        assert_eq!(next.posted_credits, 4_000);
    }

    #[test]
    fn credit_normal_account_is_symmetric() {
        let org = OrganizationId::generate();
        let ledger = LedgerId::generate();
        let account = Account::new(org, ledger, "Revenue", NormalBalance::Credit);
        let entry = make_entry(
            account.id.clone(),
            EntryDirection::Credit,
            7_500,
            TransactionStatus::Posted,
        );

        let next = account.apply_entry(&entry);
        assert_eq!(next.posted_amount, 7_500);
        assert_eq!(next.posted_credits, 7_500);
    }

    #[test]
    fn pending_entry_in_normal_direction_leaves_available_untouched() {
        let org = OrganizationId::generate();
        let ledger = LedgerId::generate();
        let account = Account::new(org, ledger, "Cash", NormalBalance::Debit);
        let entry = make_entry(
            account.id.clone(),
            EntryDirection::Debit,
            500,
            TransactionStatus::Pending,
        );

        let next = account.apply_entry(&entry);
        assert_eq!(next.pending_amount, 500);
        assert_eq!(next.pending_debits, 500);
        assert_eq!(next.posted_amount, 0);
        assert_eq!(next.available_amount, 0);
        assert_eq!(next.available_debits, 0);
        assert_eq!(next.available_credits, 0);
    }

    #[test]
    fn pending_entry_against_normal_direction_reduces_available() {
        let org = OrganizationId::generate();
        let ledger = LedgerId::generate();
        let account = Account::new(org, ledger, "Cash", NormalBalance::Debit);
        let entry = make_entry(
            account.id.clone(),
            EntryDirection::Credit,
            500,
            TransactionStatus::Pending,
        );

        let next = account.apply_entry(&entry);
        assert_eq!(next.pending_amount, -500);
        assert_eq!(next.pending_credits, 500);
        assert_eq!(next.posted_amount, 0);
        assert_eq!(next.available_amount, -500);
        assert_eq!(next.available_credits, 500);
    }

    #[test]
    fn lock_version_is_unchanged_by_apply_entry() {
        let org = OrganizationId::generate();
        let ledger = LedgerId::generate();
        let mut account = Account::new(org, ledger, "Cash", NormalBalance::Debit);
        account.lock_version = 3;
        let entry = make_entry(
            account.id.clone(),
            EntryDirection::Debit,
            1,
            TransactionStatus::Posted,
        );
        assert_eq!(account.apply_entry(&entry).lock_version, 3);
    }

    #[test]
    fn move_pending_to_posted_clears_pending_and_fills_posted() {
        let org = OrganizationId::generate();
        let ledger = LedgerId::generate();
        let account = Account::new(org, ledger, "Cash", NormalBalance::Debit);
        let entry = make_entry(
            account.id.clone(),
            EntryDirection::Debit,
            500,
            TransactionStatus::Pending,
        );

        let pending = account.apply_entry(&entry);
        assert_eq!(pending.pending_amount, 500);
        assert_eq!(pending.posted_amount, 0);

        let posted = pending.move_pending_to_posted(&entry);
        assert_eq!(posted.pending_amount, 0);
        assert_eq!(posted.pending_debits, 0);
        assert_eq!(posted.posted_amount, 500);
        assert_eq!(posted.posted_debits, 500);
    }

    #[test]
    fn scenario_one_simple_balanced_transaction() {
        let org = OrganizationId::generate();
        let ledger = LedgerId::generate();
        let a = Account::new(org.clone(), ledger.clone(), "A", NormalBalance::Debit);
        let b = Account::new(org, ledger, "B", NormalBalance::Credit);

        let debit = make_entry(
            a.id.clone(),
            EntryDirection::Debit,
            10_000,
            TransactionStatus::Posted,
        );
        let credit = make_entry(
            b.id.clone(),
            EntryDirection::Credit,
            10_000,
            TransactionStatus::Posted,
        );

        let a_next = a.apply_entry(&debit);
        let b_next = b.apply_entry(&credit);

        assert_eq!(a_next.posted_amount, 10_000);
        assert_eq!(a_next.posted_debits, 10_000);
        assert_eq!(b_next.posted_amount, 10_000);
        assert_eq!(b_next.posted_credits, 10_000);
    }
}
