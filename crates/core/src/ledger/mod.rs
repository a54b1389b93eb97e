//! Double-entry bookkeeping domain: entities, invariants, and `applyEntry`.
//!
//! - [`ledger::Ledger`], [`account::Account`], [`transaction::Transaction`],
//!   [`entry::Entry`], [`settlement::Settlement`], [`monitor::BalanceMonitor`],
//!   and [`statement::AccountStatement`] are immutable value types;
//!   every mutation returns a new value.
//! - [`validation`] enforces the structural invariants at construction.
//! - [`account::Account::apply_entry`] is the balance-mutation function
//!   used by the repository layer's validate-and-build phase.

pub mod account;
pub mod entry;
pub mod ledger;
pub mod monitor;
pub mod settlement;
pub mod statement;
pub mod transaction;
pub mod types;
pub mod validation;

#[cfg(test)]
mod property_tests;

pub use account::{Account, apply_entries_to_accounts};
pub use entry::Entry;
pub use ledger::Ledger;
pub use monitor::{AlertCondition, BalanceMonitor};
pub use settlement::Settlement;
pub use statement::{AccountStatement, AccountStatementBalances};
pub use transaction::Transaction;
pub use types::{
    AlertField, AlertOperator, EntryDirection, NormalBalance, SettlementStatus, TransactionStatus,
};
