//! CRUD for the BalanceMonitor entity.

use ledgr_core::ledger::{AlertCondition, BalanceMonitor};
use ledgr_shared::types::{AccountId, BalanceMonitorId};
use ledgr_shared::LedgerError;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

use crate::entities;

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Internal {
        message: err.to_string(),
    }
}

fn bad_id(what: &str, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Internal {
        message: format!("stored {what} failed to parse: {err}"),
    }
}

fn monitor_from_model(model: entities::monitor::Model) -> Result<BalanceMonitor, LedgerError> {
    let alert_conditions: Vec<AlertCondition> = serde_json::from_value(model.alert_conditions)
        .map_err(|e| bad_id("monitor alert_conditions", e))?;
    Ok(BalanceMonitor {
        id: BalanceMonitorId::parse(&model.id).map_err(|e| bad_id("monitor id", e))?,
        account_id: AccountId::parse(&model.account_id).map_err(|e| bad_id("account id", e))?,
        alert_conditions,
        description: model.description,
        metadata: model.metadata,
        lock_version: model.lock_version,
        created: model.created,
        updated: model.updated,
    })
}

fn monitor_to_active_model(
    monitor: &BalanceMonitor,
) -> Result<entities::monitor::ActiveModel, LedgerError> {
    Ok(entities::monitor::ActiveModel {
        id: Set(monitor.id.to_string()),
        account_id: Set(monitor.account_id.to_string()),
        alert_conditions: Set(serde_json::to_value(&monitor.alert_conditions)
            .map_err(|e| bad_id("monitor alert_conditions", e))?),
        description: Set(monitor.description.clone()),
        metadata: Set(monitor.metadata.clone()),
        lock_version: Set(monitor.lock_version),
        created: Set(monitor.created),
        updated: Set(monitor.updated),
    })
}

/// Repository for BalanceMonitor CRUD.
#[derive(Debug, Clone)]
pub struct MonitorRepository {
    db: DatabaseConnection,
}

impl MonitorRepository {
    /// Creates a new monitor repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a new monitor.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn create(&self, monitor: BalanceMonitor) -> Result<BalanceMonitor, LedgerError> {
        let active = monitor_to_active_model(&monitor)?;
        active.insert(&self.db).await.map_err(db_err)?;
        Ok(monitor)
    }

    /// Fetches a monitor by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if absent, or [`LedgerError::Internal`]
    /// on a database failure.
    pub async fn find(&self, id: &BalanceMonitorId) -> Result<BalanceMonitor, LedgerError> {
        let model = entities::monitor::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::not_found("balance monitor", id.to_string()))?;
        monitor_from_model(model)
    }

    /// Lists every monitor watching a given account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<BalanceMonitor>, LedgerError> {
        let models = entities::monitor::Entity::find()
            .filter(entities::monitor::Column::AccountId.eq(account_id.to_string()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(monitor_from_model).collect()
    }

    /// Deletes a monitor.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn delete(&self, id: &BalanceMonitorId) -> Result<(), LedgerError> {
        entities::monitor::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
