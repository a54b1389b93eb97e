//! Conversions between `SeaORM` row models and `ledgr-core` domain values.
//!
//! Every stored identifier is opaque text from the database's point of
//! view; these functions are the one place that text is parsed back
//! into the typed wrappers the rest of the tree relies on.

use ledgr_core::ledger::{
    Account, AccountStatement, AccountStatementBalances, Entry, Ledger, Transaction,
};
use ledgr_shared::types::{
    AccountId, AccountStatementId, EntryId, LedgerId, OrganizationId, TransactionId,
};
use ledgr_shared::LedgerError;

use crate::entities;

fn bad_id(what: &str, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Internal {
        message: format!("stored {what} failed to parse: {err}"),
    }
}

pub fn ledger_from_model(model: entities::ledger::Model) -> Result<Ledger, LedgerError> {
    Ok(Ledger {
        id: LedgerId::parse(&model.id).map_err(|e| bad_id("ledger id", e))?,
        organization_id: OrganizationId::parse(&model.organization_id)
            .map_err(|e| bad_id("organization id", e))?,
        name: model.name,
        description: model.description,
        currency: model.currency,
        currency_exponent: u8::try_from(model.currency_exponent)
            .map_err(|e| bad_id("currency exponent", e))?,
        metadata: model.metadata,
        created: model.created,
        updated: model.updated,
    })
}

pub fn ledger_to_active_model(ledger: &Ledger) -> entities::ledger::ActiveModel {
    use sea_orm::ActiveValue::Set;
    entities::ledger::ActiveModel {
        id: Set(ledger.id.to_string()),
        organization_id: Set(ledger.organization_id.to_string()),
        name: Set(ledger.name.clone()),
        description: Set(ledger.description.clone()),
        currency: Set(ledger.currency.clone()),
        currency_exponent: Set(i16::from(ledger.currency_exponent)),
        metadata: Set(ledger.metadata.clone()),
        created: Set(ledger.created),
        updated: Set(ledger.updated),
    }
}

pub fn account_from_model(model: entities::account::Model) -> Result<Account, LedgerError> {
    Ok(Account {
        id: AccountId::parse(&model.id).map_err(|e| bad_id("account id", e))?,
        organization_id: OrganizationId::parse(&model.organization_id)
            .map_err(|e| bad_id("organization id", e))?,
        ledger_id: LedgerId::parse(&model.ledger_id).map_err(|e| bad_id("ledger id", e))?,
        name: model.name,
        description: model.description,
        normal_balance: model.normal_balance.into(),
        pending_amount: model.pending_amount,
        posted_amount: model.posted_amount,
        available_amount: model.available_amount,
        pending_credits: model.pending_credits,
        pending_debits: model.pending_debits,
        posted_credits: model.posted_credits,
        posted_debits: model.posted_debits,
        available_credits: model.available_credits,
        available_debits: model.available_debits,
        lock_version: model.lock_version,
        metadata: model.metadata,
        created: model.created,
        updated: model.updated,
    })
}

pub fn account_to_active_model(account: &Account) -> entities::account::ActiveModel {
    use sea_orm::ActiveValue::Set;
    entities::account::ActiveModel {
        id: Set(account.id.to_string()),
        organization_id: Set(account.organization_id.to_string()),
        ledger_id: Set(account.ledger_id.to_string()),
        name: Set(account.name.clone()),
        description: Set(account.description.clone()),
        normal_balance: Set(account.normal_balance.into()),
        pending_amount: Set(account.pending_amount),
        posted_amount: Set(account.posted_amount),
        available_amount: Set(account.available_amount),
        pending_credits: Set(account.pending_credits),
        pending_debits: Set(account.pending_debits),
        posted_credits: Set(account.posted_credits),
        posted_debits: Set(account.posted_debits),
        available_credits: Set(account.available_credits),
        available_debits: Set(account.available_debits),
        lock_version: Set(account.lock_version),
        metadata: Set(account.metadata.clone()),
        created: Set(account.created),
        updated: Set(account.updated),
    }
}

pub fn entry_from_model(model: entities::entry::Model) -> Result<Entry, LedgerError> {
    Ok(Entry {
        id: EntryId::parse(&model.id).map_err(|e| bad_id("entry id", e))?,
        organization_id: OrganizationId::parse(&model.organization_id)
            .map_err(|e| bad_id("organization id", e))?,
        transaction_id: TransactionId::parse(&model.transaction_id)
            .map_err(|e| bad_id("transaction id", e))?,
        account_id: AccountId::parse(&model.account_id).map_err(|e| bad_id("account id", e))?,
        direction: model.direction.into(),
        amount: u64::try_from(model.amount).map_err(|e| bad_id("entry amount", e))?,
        currency: model.currency,
        currency_exponent: u8::try_from(model.currency_exponent)
            .map_err(|e| bad_id("currency exponent", e))?,
        status: model.status.into(),
        created: model.created,
        updated: model.updated,
    })
}

pub fn entry_to_active_model(entry: &Entry) -> entities::entry::ActiveModel {
    use sea_orm::ActiveValue::Set;
    entities::entry::ActiveModel {
        id: Set(entry.id.to_string()),
        organization_id: Set(entry.organization_id.to_string()),
        transaction_id: Set(entry.transaction_id.to_string()),
        account_id: Set(entry.account_id.to_string()),
        direction: Set(entry.direction.into()),
        amount: Set(i64::try_from(entry.amount).unwrap_or(i64::MAX)),
        currency: Set(entry.currency.clone()),
        currency_exponent: Set(i16::from(entry.currency_exponent)),
        status: Set(entry.status.into()),
        created: Set(entry.created),
        updated: Set(entry.updated),
    }
}

/// Composes a [`Transaction`] from its row and the already-fetched entries
/// that belong to it. Callers own the entry query since it differs between a
/// single-transaction read and a batch list.
pub fn transaction_from_model(
    model: entities::transaction::Model,
    entry_models: Vec<entities::entry::Model>,
) -> Result<Transaction, LedgerError> {
    let mut entries = Vec::with_capacity(entry_models.len());
    for entry_model in entry_models {
        entries.push(entry_from_model(entry_model)?);
    }
    Ok(Transaction {
        id: TransactionId::parse(&model.id).map_err(|e| bad_id("transaction id", e))?,
        organization_id: OrganizationId::parse(&model.organization_id)
            .map_err(|e| bad_id("organization id", e))?,
        ledger_id: LedgerId::parse(&model.ledger_id).map_err(|e| bad_id("ledger id", e))?,
        entries,
        idempotency_key: model.idempotency_key,
        description: model.description,
        status: model.status.into(),
        effective_at: model.effective_at,
        metadata: model.metadata,
        created: model.created,
        updated: model.updated,
    })
}

pub fn transaction_to_active_model(txn: &Transaction) -> entities::transaction::ActiveModel {
    use sea_orm::ActiveValue::Set;
    entities::transaction::ActiveModel {
        id: Set(txn.id.to_string()),
        organization_id: Set(txn.organization_id.to_string()),
        ledger_id: Set(txn.ledger_id.to_string()),
        idempotency_key: Set(txn.idempotency_key.clone()),
        description: Set(txn.description.clone()),
        status: Set(txn.status.into()),
        effective_at: Set(txn.effective_at),
        metadata: Set(txn.metadata.clone()),
        created: Set(txn.created),
        updated: Set(txn.updated),
    }
}

pub fn statement_from_model(
    model: entities::statement::Model,
) -> Result<AccountStatement, LedgerError> {
    let starting_balances: AccountStatementBalances = serde_json::from_value(model.starting_balances)
        .map_err(|e| bad_id("statement starting_balances", e))?;
    let ending_balances: AccountStatementBalances = serde_json::from_value(model.ending_balances)
        .map_err(|e| bad_id("statement ending_balances", e))?;
    Ok(AccountStatement {
        id: AccountStatementId::parse(&model.id).map_err(|e| bad_id("statement id", e))?,
        ledger_id: LedgerId::parse(&model.ledger_id).map_err(|e| bad_id("ledger id", e))?,
        account_id: AccountId::parse(&model.account_id).map_err(|e| bad_id("account id", e))?,
        start_datetime: model.start_datetime,
        end_datetime: model.end_datetime,
        ledger_account_version: model.ledger_account_version,
        starting_balances,
        ending_balances,
        currency: model.currency,
        currency_exponent: u8::try_from(model.currency_exponent)
            .map_err(|e| bad_id("currency exponent", e))?,
        created: model.created,
        updated: model.updated,
    })
}

pub fn statement_to_active_model(
    statement: &AccountStatement,
) -> Result<entities::statement::ActiveModel, LedgerError> {
    use sea_orm::ActiveValue::Set;
    Ok(entities::statement::ActiveModel {
        id: Set(statement.id.to_string()),
        ledger_id: Set(statement.ledger_id.to_string()),
        account_id: Set(statement.account_id.to_string()),
        start_datetime: Set(statement.start_datetime),
        end_datetime: Set(statement.end_datetime),
        ledger_account_version: Set(statement.ledger_account_version),
        starting_balances: Set(serde_json::to_value(statement.starting_balances)
            .map_err(|e| bad_id("statement starting_balances", e))?),
        ending_balances: Set(serde_json::to_value(statement.ending_balances)
            .map_err(|e| bad_id("statement ending_balances", e))?),
        currency: Set(statement.currency.clone()),
        currency_exponent: Set(i16::from(statement.currency_exponent)),
        created: Set(statement.created),
        updated: Set(statement.updated),
    })
}
