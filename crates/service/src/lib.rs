//! Service layer: orchestrates the `ledgr-db` repositories behind a single
//! call surface per aggregate, wrapping the operations that can hit
//! optimistic-lock conflicts in the full-jitter exponential backoff policy.
//!
//! This crate is the only place [`retry::with_retry`] is called. Repositories
//! in `ledgr-db` surface conflicts once and stop; the decision to retry
//! belongs here, at the service boundary.

pub mod retry;

use ledgr_core::ledger::{
    Account, AccountStatement, BalanceMonitor, Ledger, Settlement, SettlementStatus, Transaction,
};
use ledgr_db::{
    AccountRepository, LedgerRepository, MonitorRepository, SettlementRepository,
    StatementRepository, TransactionRepository,
};
use ledgr_shared::config::RetryConfig;
use ledgr_shared::types::{
    AccountId, AccountStatementId, BalanceMonitorId, EntryId, LedgerId, OrganizationId,
    SettlementId, TransactionId,
};
use ledgr_shared::LedgerError;

pub use retry::with_retry;

/// Orchestrates ledgers, accounts, balance monitors, account statements, and
/// the transaction engine.
#[derive(Debug, Clone)]
pub struct LedgerService {
    ledgers: LedgerRepository,
    accounts: AccountRepository,
    monitors: MonitorRepository,
    statements: StatementRepository,
    transactions: TransactionRepository,
    retry: RetryConfig,
}

impl LedgerService {
    /// Builds a service over the given repositories and retry policy.
    #[must_use]
    pub const fn new(
        ledgers: LedgerRepository,
        accounts: AccountRepository,
        monitors: MonitorRepository,
        statements: StatementRepository,
        transactions: TransactionRepository,
        retry: RetryConfig,
    ) -> Self {
        Self {
            ledgers,
            accounts,
            monitors,
            statements,
            transactions,
            retry,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the ledger cannot be persisted.
    pub async fn create_ledger(&self, ledger: Ledger) -> Result<Ledger, LedgerError> {
        self.ledgers.create(ledger).await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no such ledger exists.
    pub async fn get_ledger(
        &self,
        organization_id: &OrganizationId,
        id: &LedgerId,
    ) -> Result<Ledger, LedgerError> {
        self.ledgers.find(organization_id, id).await
    }

    /// # Errors
    ///
    /// Returns an error on a database failure.
    pub async fn list_ledgers(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Ledger>, LedgerError> {
        self.ledgers.list(organization_id).await
    }

    /// # Errors
    ///
    /// Returns an error if the account cannot be persisted.
    pub async fn create_account(&self, account: Account) -> Result<Account, LedgerError> {
        self.accounts.create(account).await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no such account exists.
    pub async fn get_account(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &AccountId,
    ) -> Result<Account, LedgerError> {
        self.accounts.find(organization_id, ledger_id, id).await
    }

    /// # Errors
    ///
    /// Returns an error on a database failure.
    pub async fn list_accounts(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
    ) -> Result<Vec<Account>, LedgerError> {
        self.accounts.list(organization_id, ledger_id).await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] if the account still has entries.
    pub async fn delete_account(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &AccountId,
    ) -> Result<(), LedgerError> {
        self.accounts.delete(organization_id, ledger_id, id).await
    }

    /// # Errors
    ///
    /// Returns an error if the monitor cannot be persisted.
    pub async fn create_monitor(
        &self,
        monitor: BalanceMonitor,
    ) -> Result<BalanceMonitor, LedgerError> {
        self.monitors.create(monitor).await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no such monitor exists.
    pub async fn get_monitor(
        &self,
        id: &BalanceMonitorId,
    ) -> Result<BalanceMonitor, LedgerError> {
        self.monitors.find(id).await
    }

    /// # Errors
    ///
    /// Returns an error on a database failure.
    pub async fn list_monitors(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<BalanceMonitor>, LedgerError> {
        self.monitors.list_for_account(account_id).await
    }

    /// # Errors
    ///
    /// Returns an error on a database failure.
    pub async fn delete_monitor(&self, id: &BalanceMonitorId) -> Result<(), LedgerError> {
        self.monitors.delete(id).await
    }

    /// Evaluates every monitor watching `account` against its current posted
    /// balance and returns the ones whose alert condition now holds.
    ///
    /// # Errors
    ///
    /// Returns an error on a database failure.
    pub async fn triggered_monitors(
        &self,
        account: &Account,
    ) -> Result<Vec<BalanceMonitor>, LedgerError> {
        let monitors = self.monitors.list_for_account(&account.id).await?;
        Ok(monitors
            .into_iter()
            .filter(|monitor| monitor.balance_conditions_met(account.posted_amount))
            .collect())
    }

    /// # Errors
    ///
    /// Returns an error if the statement cannot be persisted.
    pub async fn create_statement(
        &self,
        statement: AccountStatement,
    ) -> Result<AccountStatement, LedgerError> {
        self.statements.create(statement).await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no such statement exists.
    pub async fn get_statement(
        &self,
        id: &AccountStatementId,
    ) -> Result<AccountStatement, LedgerError> {
        self.statements.find(id).await
    }

    /// # Errors
    ///
    /// Returns an error on a database failure.
    pub async fn list_statements(
        &self,
        ledger_id: &LedgerId,
        account_id: &AccountId,
    ) -> Result<Vec<AccountStatement>, LedgerError> {
        self.statements.list_for_account(ledger_id, account_id).await
    }

    /// Runs the three-phase transaction engine, retrying on an optimistic
    /// lock conflict.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Conflict`] if every retry is exhausted, or any
    /// other [`LedgerError`] the engine raises while validating or writing.
    pub async fn create_transaction(&self, txn: Transaction) -> Result<Transaction, LedgerError> {
        with_retry(&self.retry, || {
            let txn = txn.clone();
            async { self.transactions.create_transaction(txn).await }
        })
        .await
    }

    /// # Errors
    ///
    /// See [`Self::create_transaction`].
    pub async fn post_transaction(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &TransactionId,
    ) -> Result<Transaction, LedgerError> {
        with_retry(&self.retry, || async {
            self.transactions
                .post_transaction(organization_id, ledger_id, id)
                .await
        })
        .await
    }

    /// Archival only flips status; it never touches account balances, so
    /// there is no optimistic-lock conflict to retry on.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] if the transaction is already
    /// archived, or [`LedgerError::NotFound`] if it doesn't exist.
    pub async fn archive_transaction(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &TransactionId,
    ) -> Result<Transaction, LedgerError> {
        self.transactions
            .archive_transaction(organization_id, ledger_id, id)
            .await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no such transaction exists.
    pub async fn get_transaction(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &TransactionId,
    ) -> Result<Transaction, LedgerError> {
        self.transactions.find(organization_id, ledger_id, id).await
    }

    /// # Errors
    ///
    /// Returns an error on a database failure.
    pub async fn list_transactions(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.transactions
            .list(organization_id, ledger_id, offset, limit)
            .await
    }
}

/// Orchestrates the settlement lifecycle, retrying the
/// transitions that route through the transaction engine.
#[derive(Debug, Clone)]
pub struct SettlementService {
    settlements: SettlementRepository,
    retry: RetryConfig,
}

impl SettlementService {
    /// Builds a service over the settlement repository and retry policy.
    #[must_use]
    pub const fn new(settlements: SettlementRepository, retry: RetryConfig) -> Self {
        Self { settlements, retry }
    }

    /// # Errors
    ///
    /// Returns an error if the settlement cannot be persisted.
    pub async fn create(&self, settlement: Settlement) -> Result<Settlement, LedgerError> {
        self.settlements.create(settlement).await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no such settlement exists.
    pub async fn get(
        &self,
        organization_id: &OrganizationId,
        id: &SettlementId,
    ) -> Result<Settlement, LedgerError> {
        self.settlements.find(organization_id, id).await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if the settlement is not
    /// `drafting`, or [`LedgerError::Validation`] if an entry is ineligible.
    pub async fn add_entries(
        &self,
        organization_id: &OrganizationId,
        id: &SettlementId,
        entry_ids: &[EntryId],
    ) -> Result<Settlement, LedgerError> {
        self.settlements.add_entries(organization_id, id, entry_ids).await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if the settlement is not
    /// `drafting`.
    pub async fn remove_entries(
        &self,
        organization_id: &OrganizationId,
        id: &SettlementId,
        entry_ids: &[EntryId],
    ) -> Result<Settlement, LedgerError> {
        self.settlements
            .remove_entries(organization_id, id, entry_ids)
            .await
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if the settlement is not
    /// `drafting`.
    pub async fn delete(
        &self,
        organization_id: &OrganizationId,
        id: &SettlementId,
    ) -> Result<(), LedgerError> {
        self.settlements.delete(organization_id, id).await
    }

    /// Advances a settlement's status. `processing` generates the balancing
    /// transaction and `posted` posts it, both through the same
    /// optimistic-concurrency engine as an ordinary transaction, so both are
    /// retried under the same policy as [`LedgerService::create_transaction`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if the transition is not
    /// legal, or [`LedgerError::Conflict`] if every retry is exhausted.
    pub async fn transition(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &SettlementId,
        target: SettlementStatus,
    ) -> Result<Settlement, LedgerError> {
        with_retry(&self.retry, || async {
            self.settlements
                .transition(organization_id, ledger_id, id, target)
                .await
        })
        .await
    }
}
