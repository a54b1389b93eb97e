//! CRUD for the Account entity. Balance mutation lives in
//! [`crate::repositories::transaction`]; this repository only manages an
//! account's identity fields.

use ledgr_core::ledger::Account;
use ledgr_shared::types::{AccountId, LedgerId, OrganizationId};
use ledgr_shared::LedgerError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter,
};

use crate::entities;
use crate::repositories::convert;

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Internal {
        message: err.to_string(),
    }
}

/// Repository for Account CRUD.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a new account, starting at `lock_version = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn create(&self, account: Account) -> Result<Account, LedgerError> {
        let active = convert::account_to_active_model(&account);
        active.insert(&self.db).await.map_err(db_err)?;
        Ok(account)
    }

    /// Fetches an account by id, scoped to its owning organization and ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if absent, or [`LedgerError::Internal`]
    /// on a database failure.
    pub async fn find(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &AccountId,
    ) -> Result<Account, LedgerError> {
        let model = entities::account::Entity::find_by_id(id.to_string())
            .filter(entities::account::Column::OrganizationId.eq(organization_id.to_string()))
            .filter(entities::account::Column::LedgerId.eq(ledger_id.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::not_found("account", id.to_string()))?;
        convert::account_from_model(model)
    }

    /// Lists every account within a ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn list(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
    ) -> Result<Vec<Account>, LedgerError> {
        let models = entities::account::Entity::find()
            .filter(entities::account::Column::OrganizationId.eq(organization_id.to_string()))
            .filter(entities::account::Column::LedgerId.eq(ledger_id.to_string()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(convert::account_from_model).collect()
    }

    /// Deletes an account, refusing if any Entry still references it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if absent, or
    /// [`LedgerError::validation`] if dependent entries exist.
    pub async fn delete(
        &self,
        organization_id: &OrganizationId,
        ledger_id: &LedgerId,
        id: &AccountId,
    ) -> Result<(), LedgerError> {
        self.find(organization_id, ledger_id, id).await?;

        let entry_count = entities::entry::Entity::find()
            .filter(entities::entry::Column::AccountId.eq(id.to_string()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        if entry_count > 0 {
            return Err(LedgerError::validation(format!(
                "account {id} has entries and cannot be deleted"
            )));
        }

        entities::account::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
