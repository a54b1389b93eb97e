//! Benchmarks the pure domain logic that Phase 2/3 of the transaction
//! engine run on every request: balance validation, entry construction,
//! and account delta application.

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ledgr_core::ledger::{Account, Entry, EntryDirection, Ledger, NormalBalance, Transaction, TransactionStatus};
use ledgr_shared::types::{EntryId, OrganizationId, TransactionId};

fn test_ledger() -> (Ledger, OrganizationId) {
    let org = OrganizationId::generate();
    let ledger = Ledger::new(org.clone(), "bench ledger", "USD", 2).unwrap();
    (ledger, org)
}

fn entries_for(org: &OrganizationId, accounts: &[Account], amount: u64) -> Vec<Entry> {
    let now = Utc::now();
    accounts
        .iter()
        .enumerate()
        .map(|(i, account)| Entry {
            id: EntryId::generate(),
            organization_id: org.clone(),
            transaction_id: TransactionId::generate(),
            account_id: account.id.clone(),
            direction: if i % 2 == 0 { EntryDirection::Debit } else { EntryDirection::Credit },
            amount,
            currency: "USD".to_string(),
            currency_exponent: 2,
            status: TransactionStatus::Posted,
            created: now,
            updated: now,
        })
        .collect()
}

fn benchmark_transaction_construction(c: &mut Criterion) {
    let (ledger, org) = test_ledger();
    let mut group = c.benchmark_group("transaction_construction");

    for fanout in [2_usize, 10, 50] {
        let accounts: Vec<Account> = (0..fanout)
            .map(|_| Account::new(org.clone(), ledger.id.clone(), "bench account", NormalBalance::Debit))
            .collect();

        group.bench_with_input(BenchmarkId::new("entries", fanout), &fanout, |b, _| {
            b.iter(|| {
                let entries = entries_for(&org, &accounts, 1000);
                let txn = Transaction::new(
                    black_box(org.clone()),
                    black_box(&ledger),
                    black_box(entries),
                    TransactionStatus::Posted,
                    Utc::now(),
                    None,
                    None,
                    None,
                );
                black_box(txn)
            });
        });
    }

    group.finish();
}

fn benchmark_account_apply_entry(c: &mut Criterion) {
    let (ledger, org) = test_ledger();
    let account = Account::new(org.clone(), ledger.id.clone(), "bench account", NormalBalance::Debit);
    let entry = entries_for(&org, std::slice::from_ref(&account), 1000).remove(0);

    let mut group = c.benchmark_group("account");
    group.bench_function("apply_entry", |b| {
        b.iter(|| black_box(account.apply_entry(black_box(&entry))));
    });
    group.finish();
}

criterion_group!(benches, benchmark_transaction_construction, benchmark_account_apply_entry);
criterion_main!(benches);
