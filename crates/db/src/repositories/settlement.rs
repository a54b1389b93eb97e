//! Settlement repository: create, attach/detach entries, and
//! drive the `drafting -> ... -> posted`/`archived` transitions, generating
//! the balancing Transaction through the same three-phase engine used for
//! ordinary transactions.

use std::collections::HashSet;

use ledgr_core::ledger::{Entry, EntryDirection, Settlement, SettlementStatus, Transaction};
use ledgr_shared::types::{EntryId, LedgerId, OrganizationId, SettlementId};
use ledgr_shared::LedgerError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::entities;
use crate::repositories::convert;
use crate::repositories::ledger::LedgerRepository;
use crate::repositories::transaction::TransactionRepository;

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Internal {
        message: err.to_string(),
    }
}

fn settlement_to_active_model(settlement: &Settlement) -> entities::settlement::ActiveModel {
    entities::settlement::ActiveModel {
        id: Set(settlement.id.to_string()),
        organization_id: Set(settlement.organization_id.to_string()),
        transaction_id: Set(settlement.transaction_id.as_ref().map(ToString::to_string)),
        settled_account_id: Set(settlement.settled_account_id.to_string()),
        contra_account_id: Set(settlement.contra_account_id.to_string()),
        amount: Set(i64::try_from(settlement.amount).unwrap_or(i64::MAX)),
        normal_balance: Set(settlement.normal_balance.into()),
        currency: Set(settlement.currency.clone()),
        currency_exponent: Set(i16::from(settlement.currency_exponent)),
        status: Set(settlement.status.into()),
        description: Set(settlement.description.clone()),
        external_reference: Set(settlement.external_reference.clone()),
        effective_at_upper_bound: Set(settlement.effective_at_upper_bound),
        metadata: Set(settlement.metadata.clone()),
        created: Set(settlement.created),
        updated: Set(settlement.updated),
    }
}

fn bad_id(what: &str, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Internal {
        message: format!("stored {what} failed to parse: {err}"),
    }
}

fn settlement_from_model(
    model: entities::settlement::Model,
    attached_entries: HashSet<EntryId>,
) -> Result<Settlement, LedgerError> {
    use ledgr_shared::types::{AccountId, TransactionId};
    Ok(Settlement {
        id: SettlementId::parse(&model.id).map_err(|e| bad_id("settlement id", e))?,
        organization_id: OrganizationId::parse(&model.organization_id)
            .map_err(|e| bad_id("organization id", e))?,
        transaction_id: model
            .transaction_id
            .map(|id| TransactionId::parse(&id))
            .transpose()
            .map_err(|e| bad_id("transaction id", e))?,
        settled_account_id: AccountId::parse(&model.settled_account_id)
            .map_err(|e| bad_id("settled account id", e))?,
        contra_account_id: AccountId::parse(&model.contra_account_id)
            .map_err(|e| bad_id("contra account id", e))?,
        amount: u64::try_from(model.amount).map_err(|e| bad_id("settlement amount", e))?,
        normal_balance: model.normal_balance.into(),
        currency: model.currency,
        currency_exponent: u8::try_from(model.currency_exponent)
            .map_err(|e| bad_id("currency exponent", e))?,
        status: model.status.into(),
        description: model.description,
        external_reference: model.external_reference,
        effective_at_upper_bound: model.effective_at_upper_bound,
        attached_entries,
        metadata: model.metadata,
        created: model.created,
        updated: model.updated,
    })
}

/// Repository owning settlement CRUD and the §4.2/§4.5 lifecycle.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
    transactions: TransactionRepository,
    ledgers: LedgerRepository,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            transactions: TransactionRepository::new(db.clone()),
            ledgers: LedgerRepository::new(db.clone()),
            db,
        }
    }

    async fn attached_entry_ids(
        &self,
        settlement_id: &SettlementId,
    ) -> Result<HashSet<EntryId>, LedgerError> {
        let rows = entities::settlement_entry::Entity::find()
            .filter(entities::settlement_entry::Column::SettlementId.eq(settlement_id.to_string()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        rows.into_iter()
            .map(|row| EntryId::parse(&row.entry_id).map_err(|e| bad_id("entry id", e)))
            .collect()
    }

    async fn fetch_entries(&self, ids: &HashSet<EntryId>) -> Result<Vec<Entry>, LedgerError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_strings: Vec<String> = ids.iter().map(EntryId::to_string).collect();
        let models = entities::entry::Entity::find()
            .filter(entities::entry::Column::Id.is_in(id_strings))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(convert::entry_from_model).collect()
    }

    /// Persists a new settlement in `drafting`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn create(&self, settlement: Settlement) -> Result<Settlement, LedgerError> {
        let active = settlement_to_active_model(&settlement);
        active.insert(&self.db).await.map_err(db_err)?;
        Ok(settlement)
    }

    /// Fetches a settlement with its currently attached entry ids.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if absent, or [`LedgerError::Internal`]
    /// on a database failure.
    pub async fn find(
        &self,
        organization_id: &OrganizationId,
        id: &SettlementId,
    ) -> Result<Settlement, LedgerError> {
        let model = entities::settlement::Entity::find_by_id(id.to_string())
            .filter(entities::settlement::Column::OrganizationId.eq(organization_id.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::not_found("settlement", id.to_string()))?;
        let attached = self.attached_entry_ids(id).await?;
        settlement_from_model(model, attached)
    }

    /// Attaches entries to a drafting settlement.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if not `drafting`, or
    /// [`LedgerError::Validation`] if an entry is ineligible (not posted, or
    /// not on the settled account).
    pub async fn add_entries(
        &self,
        organization_id: &OrganizationId,
        id: &SettlementId,
        entry_ids: &[EntryId],
    ) -> Result<Settlement, LedgerError> {
        let settlement = self.find(organization_id, id).await?;
        let id_strings: Vec<String> = entry_ids.iter().map(EntryId::to_string).collect();
        let entry_models = entities::entry::Entity::find()
            .filter(entities::entry::Column::Id.is_in(id_strings))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        if entry_models.len() != entry_ids.len() {
            return Err(LedgerError::not_found("entry", "one or more entries"));
        }

        let already_attached = entities::settlement_entry::Entity::find()
            .filter(entities::settlement_entry::Column::EntryId.is_in(entry_ids.iter().map(EntryId::to_string)))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        if !already_attached.is_empty() {
            return Err(LedgerError::validation(
                "one or more entries are already attached to a settlement",
            ));
        }

        let entries: Vec<Entry> = entry_models
            .into_iter()
            .map(convert::entry_from_model)
            .collect::<Result<_, _>>()?;
        let next = settlement.add_entries(&entries)?;

        let active = settlement_to_active_model(&next);
        entities::settlement::Entity::update(active)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        for entry_id in entry_ids {
            let join = entities::settlement_entry::ActiveModel {
                settlement_id: Set(id.to_string()),
                entry_id: Set(entry_id.to_string()),
            };
            join.insert(&self.db).await.map_err(db_err)?;
        }

        Ok(next)
    }

    /// Detaches entries from a drafting settlement.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if not `drafting`.
    pub async fn remove_entries(
        &self,
        organization_id: &OrganizationId,
        id: &SettlementId,
        entry_ids: &[EntryId],
    ) -> Result<Settlement, LedgerError> {
        let settlement = self.find(organization_id, id).await?;
        let next = settlement.remove_entries(entry_ids)?;

        let active = settlement_to_active_model(&next);
        entities::settlement::Entity::update(active)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        entities::settlement_entry::Entity::delete_many()
            .filter(entities::settlement_entry::Column::SettlementId.eq(id.to_string()))
            .filter(
                entities::settlement_entry::Column::EntryId
                    .is_in(entry_ids.iter().map(EntryId::to_string)),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(next)
    }

    /// Deletes a settlement outright. Precondition: `drafting`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if not `drafting`.
    pub async fn delete(
        &self,
        organization_id: &OrganizationId,
        id: &SettlementId,
    ) -> Result<(), LedgerError> {
        let settlement = self.find(organization_id, id).await?;
        if !settlement.is_deletable() {
            return Err(LedgerError::illegal_transition(
                "settlement may only be deleted while drafting",
            ));
        }
        entities::settlement_entry::Entity::delete_many()
            .filter(entities::settlement_entry::Column::SettlementId.eq(id.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        entities::settlement::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// Advances a settlement's status. `Processing` generates the
    /// balancing Transaction; `Posted` posts it; `Archiving`/`Archived` flip
    /// status only.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::illegal_transition`] if the transition is not
    /// in the table, plus any error the underlying transaction engine raises
    /// while generating or posting the balancing Transaction.
    pub async fn transition(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &SettlementId,
        target: SettlementStatus,
    ) -> Result<Settlement, LedgerError> {
        let settlement = self.find(organization_id, id).await?;

        match target {
            SettlementStatus::Processing => self.begin_processing(organization_id, ledger_id, &settlement).await,
            SettlementStatus::Pending => self.confirm_pending(&settlement).await,
            SettlementStatus::Posted => self.confirm_posted(organization_id, ledger_id, &settlement).await,
            _ => self.flip_status(&settlement, target).await,
        }
    }

    async fn begin_processing(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        settlement: &Settlement,
    ) -> Result<Settlement, LedgerError> {
        let processing = settlement.transition_to(SettlementStatus::Processing)?;

        let attached = self.attached_entry_ids(&settlement.id).await?;
        let entries = self.fetch_entries(&attached).await?;
        let net_amount = settlement.net_amount(&entries);
        let amount = net_amount.unsigned_abs();

        let ledger = self.ledgers.find(organization_id, ledger_id).await?;
        let settled_direction = if net_amount >= 0 {
            matching_direction(settlement.normal_balance)
        } else {
            opposite_direction(settlement.normal_balance)
        };
        let contra_direction = match settled_direction {
            EntryDirection::Debit => EntryDirection::Credit,
            EntryDirection::Credit => EntryDirection::Debit,
        };

        let draft_entry = |account_id: ledgr_shared::types::AccountId, direction: EntryDirection| {
            let now = chrono::Utc::now();
            Entry {
                id: ledgr_shared::types::EntryId::generate(),
                organization_id: organization_id.clone(),
                transaction_id: ledgr_shared::types::TransactionId::generate(),
                account_id,
                direction,
                amount,
                currency: settlement.currency.clone(),
                currency_exponent: settlement.currency_exponent,
                status: ledgr_core::ledger::TransactionStatus::Pending,
                created: now,
                updated: now,
            }
        };
        let raw_entries = vec![
            draft_entry(settlement.settled_account_id.clone(), settled_direction),
            draft_entry(settlement.contra_account_id.clone(), contra_direction),
        ];

        let txn = Transaction::new(
            organization_id.clone(),
            &ledger,
            raw_entries,
            ledgr_core::ledger::TransactionStatus::Pending,
            chrono::Utc::now(),
            None,
            Some(format!("settlement {} net amount", settlement.id)),
            None,
        )?;
        let txn = self.transactions.create_transaction(txn).await?;

        let mut next = processing;
        next.transaction_id = Some(txn.id);
        next.amount = amount;

        let active = settlement_to_active_model(&next);
        entities::settlement::Entity::update(active)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(next)
    }

    async fn confirm_pending(&self, settlement: &Settlement) -> Result<Settlement, LedgerError> {
        let next = settlement.transition_to(SettlementStatus::Pending)?;
        let active = settlement_to_active_model(&next);
        entities::settlement::Entity::update(active)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(next)
    }

    async fn confirm_posted(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        settlement: &Settlement,
    ) -> Result<Settlement, LedgerError> {
        let transaction_id = settlement.transaction_id.clone().ok_or_else(|| {
            LedgerError::data_integrity("settlement has no generated transaction to post")
        })?;
        self.transactions
            .post_transaction(organization_id, ledger_id, &transaction_id)
            .await?;

        let next = settlement.transition_to(SettlementStatus::Posted)?;
        let active = settlement_to_active_model(&next);
        entities::settlement::Entity::update(active)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(next)
    }

    async fn flip_status(
        &self,
        settlement: &Settlement,
        target: SettlementStatus,
    ) -> Result<Settlement, LedgerError> {
        let next = settlement.transition_to(target)?;
        let active = settlement_to_active_model(&next);
        entities::settlement::Entity::update(active)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(next)
    }
}

fn matching_direction(normal_balance: ledgr_core::ledger::NormalBalance) -> EntryDirection {
    match normal_balance {
        ledgr_core::ledger::NormalBalance::Debit => EntryDirection::Debit,
        ledgr_core::ledger::NormalBalance::Credit => EntryDirection::Credit,
    }
}

fn opposite_direction(normal_balance: ledgr_core::ledger::NormalBalance) -> EntryDirection {
    match normal_balance {
        ledgr_core::ledger::NormalBalance::Debit => EntryDirection::Credit,
        ledgr_core::ledger::NormalBalance::Credit => EntryDirection::Debit,
    }
}
