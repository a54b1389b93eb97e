//! Property-based tests for the balance-conservation invariants.

use proptest::prelude::*;

use super::account::Account;
use super::entry::Entry;
use super::ledger::Ledger;
use super::transaction::Transaction;
use super::types::{EntryDirection, NormalBalance, TransactionStatus};
use chrono::Utc;
use ledgr_shared::types::{AccountId, EntryId, OrganizationId, TransactionId};

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
        status: TransactionStatus::Posted,
        created: now,
        updated: now,
    }
}

proptest! {
    /// A constructed Transaction's debit and credit totals always agree,
    /// since `Transaction::new` rejects anything that doesn't balance.
    #[test]
    fn transaction_debit_and_credit_totals_always_balance(amount in 1u64..=1_000_000_000) {
        let org = OrganizationId::generate();
        let ledger = Ledger::new(org.clone(), "Primary", "USD", 2).unwrap();
        let entries = vec![
            raw_entry(AccountId::generate(), EntryDirection::Debit, amount),
            raw_entry(AccountId::generate(), EntryDirection::Credit, amount),
        ];
        let txn = Transaction::new(
            org, &ledger, entries, TransactionStatus::Posted, Utc::now(), None, None, None,
        ).unwrap();
        prop_assert_eq!(txn.total_debits(), txn.total_credits());
    }

    /// For a closed set of balanced transactions posted against a pair of
    /// accounts, the ledger's signed posted-amount total nets to zero.
    #[test]
    fn ledger_level_posted_amounts_net_to_zero(amounts in prop::collection::vec(1u64..=10_000, 1..20)) {
        let org = OrganizationId::generate();
        let ledger_id = ledgr_shared::types::LedgerId::generate();
        let mut a = Account::new(org.clone(), ledger_id.clone(), "A", NormalBalance::Debit);
        let mut b = Account::new(org, ledger_id, "B", NormalBalance::Credit);

        for amount in amounts {
            let debit = raw_entry(a.id.clone(), EntryDirection::Debit, amount);
            let credit = raw_entry(b.id.clone(), EntryDirection::Credit, amount);
            a = a.apply_entry(&debit);
            b = b.apply_entry(&credit);
        }

        // A is debit-normal (contributes +posted_amount), B is credit-normal
        // (contributes -posted_amount in this signed-sum convention).
        prop_assert_eq!(a.posted_amount - b.posted_amount, 0);
    }

    /// `lock_version` never decreases across successive applications on
    /// the same account (applyEntry itself never touches lock_version; the
    /// repository layer is solely responsible for incrementing it, so this
    /// checks the domain layer never regresses it by accident).
    #[test]
    fn apply_entry_never_decreases_lock_version(amount in 1u64..=1_000_000) {
        let org = OrganizationId::generate();
        let ledger_id = ledgr_shared::types::LedgerId::generate();
        let mut account = Account::new(org, ledger_id, "A", NormalBalance::Debit);
        account.lock_version = 5;
        let entry = raw_entry(account.id.clone(), EntryDirection::Debit, amount);
        let next = account.apply_entry(&entry);
        prop_assert!(next.lock_version >= account.lock_version);
    }
}
