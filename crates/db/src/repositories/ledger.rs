//! CRUD for the Ledger entity.

use ledgr_core::ledger::Ledger;
use ledgr_shared::types::{LedgerId, OrganizationId};
use ledgr_shared::LedgerError;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::entities;
use crate::repositories::convert;

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Internal {
        message: err.to_string(),
    }
}

/// Repository for Ledger CRUD.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a new ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn create(&self, ledger: Ledger) -> Result<Ledger, LedgerError> {
        let active = convert::ledger_to_active_model(&ledger);
        active.insert(&self.db).await.map_err(db_err)?;
        Ok(ledger)
    }

    /// Fetches a ledger by id, scoped to its owning organization.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if absent, or [`LedgerError::Internal`]
    /// on a database failure.
    pub async fn find(
        &self,
        organization_id: &OrganizationId,
        id: &LedgerId,
    ) -> Result<Ledger, LedgerError> {
        let model = entities::ledger::Entity::find_by_id(id.to_string())
            .filter(entities::ledger::Column::OrganizationId.eq(organization_id.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::not_found("ledger", id.to_string()))?;
        convert::ledger_from_model(model)
    }

    /// Lists every ledger owned by an organization.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn list(&self, organization_id: &OrganizationId) -> Result<Vec<Ledger>, LedgerError> {
        let models = entities::ledger::Entity::find()
            .filter(entities::ledger::Column::OrganizationId.eq(organization_id.to_string()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(convert::ledger_from_model).collect()
    }
}
