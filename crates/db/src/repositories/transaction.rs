//! The transaction engine: three-phase read-validate-write
//! pipeline under optimistic concurrency control, plus the `pending ->
//! posted`/`archived` transitions of §4.4.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use ledgr_core::ledger::{self as domain, apply_entries_to_accounts};
use ledgr_shared::types::{AccountId, LedgerId, OrganizationId, TransactionId};
use ledgr_shared::LedgerError;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities;
use crate::repositories::convert;

/// Repository owning the transaction engine's reads and writes.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

fn db_err(err: DbErr) -> LedgerError {
    if is_serialization_failure(&err) {
        return LedgerError::ServiceUnavailable {
            retryable: true,
            message: err.to_string(),
        };
    }
    LedgerError::Internal {
        message: err.to_string(),
    }
}

/// Postgres doesn't give sqlx/`SeaORM` a typed variant for SQLSTATE
/// 40001/40P01, so serialization failures and deadlocks are detected by
/// message text.
fn is_serialization_failure(err: &DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("deadlock") || message.contains("could not serialize")
}

/// Maps an error from the transaction upsert: a unique-constraint hit on
/// `(organization_id, ledger_id, idempotency_key)` is an idempotency-key
/// collision, surfaced as a non-retryable conflict.
fn transaction_insert_err(err: DbErr) -> LedgerError {
    if matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    ) {
        return LedgerError::idempotency_collision(
            "idempotency_key already used for this organization and ledger",
        );
    }
    db_err(err)
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches a single transaction with its entries, scoped by tenant and ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no matching row exists, or
    /// [`LedgerError::Internal`] on a database failure.
    pub async fn find(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &TransactionId,
    ) -> Result<domain::Transaction, LedgerError> {
        let model = entities::transaction::Entity::find_by_id(id.to_string())
            .filter(entities::transaction::Column::OrganizationId.eq(organization_id.to_string()))
            .filter(entities::transaction::Column::LedgerId.eq(ledger_id.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::not_found("transaction", id.to_string()))?;

        let entry_models = entities::entry::Entity::find()
            .filter(entities::entry::Column::TransactionId.eq(id.to_string()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        convert::transaction_from_model(model, entry_models)
    }

    /// Lists transactions for a ledger, newest-first, with offset/limit pagination.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn list(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<domain::Transaction>, LedgerError> {
        let models = entities::transaction::Entity::find()
            .filter(entities::transaction::Column::OrganizationId.eq(organization_id.to_string()))
            .filter(entities::transaction::Column::LedgerId.eq(ledger_id.to_string()))
            .order_by_desc(entities::transaction::Column::Created)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut result = Vec::with_capacity(models.len());
        for model in models {
            let entry_models = entities::entry::Entity::find()
                .filter(entities::entry::Column::TransactionId.eq(model.id.clone()))
                .all(&self.db)
                .await
                .map_err(db_err)?;
            result.push(convert::transaction_from_model(model, entry_models)?);
        }
        Ok(result)
    }

    /// Phase 1: non-locking batch read of every account referenced by `entries`.
    async fn read_accounts(
        &self,
        conn: &impl ConnectionTrait,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        account_ids: &HashSet<AccountId>,
    ) -> Result<HashMap<AccountId, domain::Account>, LedgerError> {
        let id_strings: Vec<String> = account_ids.iter().map(AccountId::to_string).collect();

        let rows = entities::account::Entity::find()
            .filter(entities::account::Column::Id.is_in(id_strings))
            .filter(entities::account::Column::OrganizationId.eq(organization_id.to_string()))
            .filter(entities::account::Column::LedgerId.eq(ledger_id.to_string()))
            .all(conn)
            .await
            .map_err(db_err)?;

        if rows.len() != account_ids.len() {
            return Err(LedgerError::not_found(
                "account",
                "one or more accounts referenced by this transaction",
            ));
        }

        let mut accounts = HashMap::with_capacity(rows.len());
        for row in rows {
            let account = convert::account_from_model(row)?;
            accounts.insert(account.id.clone(), account);
        }
        Ok(accounts)
    }

    /// Phase 3 per-account write: `UPDATE ... SET ..., lock_version = old + 1
    /// WHERE id = ... AND lock_version = old`. Row-count interpretation:
    /// 0 rows is a retryable optimistic-lock conflict, 1 row is success,
    /// 2+ rows is a non-retryable data-integrity anomaly.
    async fn write_account(
        db_txn: &DatabaseTransaction,
        old_version: i64,
        account: &domain::Account,
    ) -> Result<(), LedgerError> {
        let mut active = convert::account_to_active_model(account);
        active.lock_version = Set(old_version + 1);
        active.updated = Set(Utc::now());

        let result = entities::account::Entity::update_many()
            .filter(entities::account::Column::Id.eq(account.id.to_string()))
            .filter(entities::account::Column::LockVersion.eq(old_version))
            .set(active)
            .exec(db_txn)
            .await
            .map_err(db_err)?;

        match result.rows_affected {
            0 => Err(LedgerError::optimistic_lock_conflict(format!(
                "account {} was modified concurrently",
                account.id
            ))),
            1 => Ok(()),
            _ => Err(LedgerError::data_integrity(format!(
                "more than one row matched account {} on a primary-key update",
                account.id
            ))),
        }
    }

    /// Phase 3: upserts the transaction row and its entries, then writes
    /// every affected account's new balances under the version check. Rolls
    /// back on the first failure.
    async fn commit_write(
        &self,
        txn: &domain::Transaction,
        read_versions: &HashMap<AccountId, i64>,
        updated_accounts: &HashMap<AccountId, domain::Account>,
    ) -> Result<(), LedgerError> {
        let db_txn = self.db.begin().await.map_err(db_err)?;

        let txn_model = convert::transaction_to_active_model(txn);
        let insert_result = entities::transaction::Entity::insert(txn_model)
            .on_conflict(
                OnConflict::column(entities::transaction::Column::Id)
                    .update_columns([
                        entities::transaction::Column::Description,
                        entities::transaction::Column::Status,
                        entities::transaction::Column::EffectiveAt,
                        entities::transaction::Column::Metadata,
                        entities::transaction::Column::Updated,
                    ])
                    .to_owned(),
            )
            .exec(&db_txn)
            .await;
        if let Err(err) = insert_result {
            let _ = db_txn.rollback().await;
            return Err(transaction_insert_err(err));
        }

        // Statements within this DB transaction share one connection, so
        // genuine concurrent issue isn't available here; issue sequentially.
        for entry in &txn.entries {
            let entry_model = convert::entry_to_active_model(entry);
            let result = entities::entry::Entity::insert(entry_model)
                .on_conflict(
                    OnConflict::column(entities::entry::Column::Id)
                        .update_columns([
                            entities::entry::Column::Status,
                            entities::entry::Column::Updated,
                        ])
                        .to_owned(),
                )
                .exec(&db_txn)
                .await;
            if let Err(err) = result {
                let _ = db_txn.rollback().await;
                return Err(db_err(err));
            }
        }

        for account in updated_accounts.values() {
            let old_version = read_versions.get(&account.id).copied().unwrap_or(0);
            if let Err(err) = Self::write_account(&db_txn, old_version, account).await {
                let _ = db_txn.rollback().await;
                return Err(err);
            }
        }

        db_txn.commit().await.map_err(db_err)
    }

    /// Creates (or idempotently re-applies) a transaction: the three-phase
    /// read-validate-write pipeline.
    ///
    /// # Errors
    ///
    /// `NotFound` if an entry references a missing account; `Conflict` on
    /// optimistic-lock failure (retryable) or idempotency-key collision /
    /// data-integrity anomaly (not retryable); `ServiceUnavailable` on a
    /// storage serialization failure or deadlock (retryable).
    pub async fn create_transaction(
        &self,
        txn: domain::Transaction,
    ) -> Result<domain::Transaction, LedgerError> {
        let account_ids: HashSet<AccountId> =
            txn.entries.iter().map(|e| e.account_id.clone()).collect();

        let accounts = self
            .read_accounts(&self.db, &txn.organization_id, &txn.ledger_id, &account_ids)
            .await?;
        let read_versions: HashMap<AccountId, i64> = accounts
            .values()
            .map(|a| (a.id.clone(), a.lock_version))
            .collect();

        let updated = apply_entries_to_accounts(&accounts, &txn.entries);

        self.commit_write(&txn, &read_versions, &updated).await?;
        Ok(txn)
    }

    /// `pending -> posted` transition: re-reads the transaction's
    /// accounts, moves each affected entry's contribution from pending to
    /// posted fields, and writes under the same version-checked protocol.
    ///
    /// # Errors
    ///
    /// `NotFound` if the transaction is absent; `Conflict(retryable=false)`
    /// if it is not currently `pending`; the engine errors of
    /// [`Self::create_transaction`] otherwise.
    pub async fn post_transaction(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &TransactionId,
    ) -> Result<domain::Transaction, LedgerError> {
        let current = self.find(organization_id, ledger_id, id).await?;
        let posted = current.post()?;

        let account_ids: HashSet<AccountId> = current
            .entries
            .iter()
            .map(|e| e.account_id.clone())
            .collect();
        let accounts = self
            .read_accounts(&self.db, organization_id, ledger_id, &account_ids)
            .await?;
        let read_versions: HashMap<AccountId, i64> = accounts
            .values()
            .map(|a| (a.id.clone(), a.lock_version))
            .collect();

        let mut updated: HashMap<AccountId, domain::Account> =
            HashMap::with_capacity(accounts.len());
        for entry in &current.entries {
            let base = updated
                .get(&entry.account_id)
                .or_else(|| accounts.get(&entry.account_id))
                .ok_or_else(|| LedgerError::not_found("account", entry.account_id.to_string()))?;
            updated.insert(entry.account_id.clone(), base.move_pending_to_posted(entry));
        }

        self.commit_write(&posted, &read_versions, &updated).await?;
        Ok(posted)
    }

    /// `pending -> archived` or `posted -> archived` transition.
    /// Archival does not itself move balances; it only flips status on the
    /// transaction and its entries.
    ///
    /// # Errors
    ///
    /// `NotFound` if the transaction is absent; `Conflict(retryable=false)`
    /// if the transition is illegal (e.g. already archived).
    pub async fn archive_transaction(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &TransactionId,
    ) -> Result<domain::Transaction, LedgerError> {
        let current = self.find(organization_id, ledger_id, id).await?;
        let archived = current.archive()?;

        let txn_model = convert::transaction_to_active_model(&archived);
        entities::transaction::Entity::update(txn_model)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        for entry in &archived.entries {
            let entry_model = convert::entry_to_active_model(entry);
            entities::entry::Entity::update(entry_model)
                .exec(&self.db)
                .await
                .map_err(db_err)?;
        }

        Ok(archived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgr_core::ledger::{Entry, TransactionStatus};
    use ledgr_shared::types::EntryId;

    fn raw_entry(
        organization_id: OrganizationId,
        transaction_id: TransactionId,
        account_id: AccountId,
        direction: ledgr_core::ledger::EntryDirection,
        amount: u64,
    ) -> Entry {
        let now = Utc::now();
        Entry {
            id: EntryId::generate(),
            organization_id,
            transaction_id,
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
    fn is_serialization_failure_matches_known_postgres_messages() {
        let deadlock = DbErr::Custom("deadlock detected".into());
        let serialize = DbErr::Custom("could not serialize access due to concurrent update".into());
        let generic = DbErr::Custom("connection refused".into());
        assert!(is_serialization_failure(&deadlock));
        assert!(is_serialization_failure(&serialize));
        assert!(!is_serialization_failure(&generic));
    }

    #[test]
    fn db_err_maps_serialization_failures_as_retryable_service_unavailable() {
        let err = db_err(DbErr::Custom("deadlock detected".into()));
        assert!(err.retryable());
        assert_eq!(err.http_status(), 503);
    }

    #[test]
    fn db_err_maps_other_failures_as_internal() {
        let err = db_err(DbErr::Custom("connection refused".into()));
        assert!(!err.retryable());
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn account_ids_referenced_by_a_transaction_are_deduplicated_for_phase_one() {
        let organization_id = OrganizationId::generate();
        let transaction_id = TransactionId::generate();
        let account_id = AccountId::generate();
        let other_account_id = AccountId::generate();

        let entries = vec![
            raw_entry(
                organization_id.clone(),
                transaction_id.clone(),
                account_id.clone(),
                ledgr_core::ledger::EntryDirection::Debit,
                100,
            ),
            raw_entry(
                organization_id.clone(),
                transaction_id,
                other_account_id.clone(),
                ledgr_core::ledger::EntryDirection::Credit,
                100,
            ),
        ];
        let account_ids: HashSet<AccountId> =
            entries.iter().map(|e| e.account_id.clone()).collect();
        assert_eq!(account_ids.len(), 2);
        assert!(account_ids.contains(&account_id));
        assert!(account_ids.contains(&other_account_id));
    }
}
