//! Create/get for the AccountStatement entity. Statements are immutable
//! snapshots: there is no update, only create and read.

use ledgr_core::ledger::AccountStatement;
use ledgr_shared::types::{AccountId, AccountStatementId, LedgerId};
use ledgr_shared::LedgerError;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::entities;
use crate::repositories::convert;

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Internal {
        message: err.to_string(),
    }
}

/// Repository for AccountStatement create/read.
#[derive(Debug, Clone)]
pub struct StatementRepository {
    db: DatabaseConnection,
}

impl StatementRepository {
    /// Creates a new statement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a new statement snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn create(&self, statement: AccountStatement) -> Result<AccountStatement, LedgerError> {
        let active = convert::statement_to_active_model(&statement)?;
        active.insert(&self.db).await.map_err(db_err)?;
        Ok(statement)
    }

    /// Fetches a statement by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if absent, or [`LedgerError::Internal`]
    /// on a database failure.
    pub async fn find(&self, id: &AccountStatementId) -> Result<AccountStatement, LedgerError> {
        let model = entities::statement::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::not_found("account statement", id.to_string()))?;
        convert::statement_from_model(model)
    }

    /// Lists every statement generated for an account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Internal`] on a database failure.
    pub async fn list_for_account(
        &self,
        ledger_id: &LedgerId,
        account_id: &AccountId,
    ) -> Result<Vec<AccountStatement>, LedgerError> {
        let models = entities::statement::Entity::find()
            .filter(entities::statement::Column::LedgerId.eq(ledger_id.to_string()))
            .filter(entities::statement::Column::AccountId.eq(account_id.to_string()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(convert::statement_from_model).collect()
    }
}
