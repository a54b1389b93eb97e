//! AccountStatement entity: a point-in-time snapshot of an account's balances over a window.

use chrono::{DateTime, Utc};
use ledgr_shared::types::{AccountId, AccountStatementId, LedgerId};
use serde::{Deserialize, Serialize};

use super::account::Account;

/// A snapshot of an Account's balances over `[start_datetime, end_datetime)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatement {
    /// Unique identifier for this statement.
    pub id: AccountStatementId,
    /// The ledger this statement's account belongs to.
    pub ledger_id: LedgerId,
    /// The account this statement summarizes.
    pub account_id: AccountId,
    /// Inclusive start of the statement window.
    pub start_datetime: DateTime<Utc>,
    /// Exclusive end of the statement window.
    pub end_datetime: DateTime<Utc>,
    /// The account's `lock_version` at `end_datetime`, for auditability.
    pub ledger_account_version: i64,
    /// Balances as of `start_datetime`.
    pub starting_balances: AccountStatementBalances,
    /// Balances as of `end_datetime`.
    pub ending_balances: AccountStatementBalances,
    /// ISO 4217 currency code, copied from the account's ledger.
    pub currency: String,
    /// Minor-unit decimal places, copied from the account's ledger.
    pub currency_exponent: u8,
    /// Creation timestamp, server-assigned.
    pub created: DateTime<Utc>,
    /// Last-update timestamp, server-assigned.
    pub updated: DateTime<Utc>,
}

/// The posted/pending/available balance triple captured at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatementBalances {
    /// Posted balance at the snapshot instant.
    pub posted_amount: i64,
    /// Pending balance at the snapshot instant.
    pub pending_amount: i64,
    /// Available balance at the snapshot instant.
    pub available_amount: i64,
}

impl AccountStatementBalances {
    /// Captures the balance triple from a live `Account` snapshot.
    #[must_use]
    pub const fn from_account(account: &Account) -> Self {
        Self {
            posted_amount: account.posted_amount,
            pending_amount: account.pending_amount,
            available_amount: account.available_amount,
        }
    }
}

impl AccountStatement {
    /// Builds a statement from two account snapshots bounding the window.
    #[must_use]
    pub fn new(
        ledger_id: LedgerId,
        starting: &Account,
        ending: &Account,
        start_datetime: DateTime<Utc>,
        end_datetime: DateTime<Utc>,
        currency: impl Into<String>,
        currency_exponent: u8,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountStatementId::generate(),
            ledger_id,
            account_id: ending.id.clone(),
            start_datetime,
            end_datetime,
            ledger_account_version: ending.lock_version,
            starting_balances: AccountStatementBalances::from_account(starting),
            ending_balances: AccountStatementBalances::from_account(ending),
            currency: currency.into(),
            currency_exponent,
            created: now,
            updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::NormalBalance;
    use chrono::Duration;
    use ledgr_shared::types::OrganizationId;

    #[test]
    fn statement_captures_both_snapshots() {
        let org = OrganizationId::generate();
        let ledger_id = LedgerId::generate();
        let starting = Account::new(org.clone(), ledger_id.clone(), "Cash", NormalBalance::Debit);
        let mut ending = starting.clone();
        ending.posted_amount = 10_000;
        ending.lock_version = 1;

        let start = Utc::now() - Duration::days(30);
        let end = Utc::now();
        let statement = AccountStatement::new(ledger_id, &starting, &ending, start, end, "USD", 2);

        assert_eq!(statement.starting_balances.posted_amount, 0);
        assert_eq!(statement.ending_balances.posted_amount, 10_000);
        assert_eq!(statement.ledger_account_version, 1);
    }
}
