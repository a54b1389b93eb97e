//! Initial schema: ledgers, accounts, transactions, entries, settlements,
//! settlement_entries, monitors, statements.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r"
            CREATE TYPE normal_balance AS ENUM ('debit', 'credit');
            CREATE TYPE entry_direction AS ENUM ('debit', 'credit');
            CREATE TYPE transaction_status AS ENUM ('pending', 'posted', 'archived');
            CREATE TYPE settlement_status AS ENUM (
                'drafting', 'processing', 'pending', 'posted', 'archiving', 'archived'
            );

            CREATE TABLE ledgers (
                id TEXT PRIMARY KEY,
                organization_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                currency TEXT NOT NULL,
                currency_exponent SMALLINT NOT NULL,
                metadata JSONB,
                created TIMESTAMPTZ NOT NULL,
                updated TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX idx_ledgers_organization_id ON ledgers (organization_id);

            CREATE TABLE accounts (
                id TEXT PRIMARY KEY,
                organization_id TEXT NOT NULL,
                ledger_id TEXT NOT NULL REFERENCES ledgers (id),
                name TEXT NOT NULL,
                description TEXT,
                normal_balance normal_balance NOT NULL,
                pending_amount BIGINT NOT NULL DEFAULT 0,
                posted_amount BIGINT NOT NULL DEFAULT 0,
                available_amount BIGINT NOT NULL DEFAULT 0,
                pending_credits BIGINT NOT NULL DEFAULT 0,
                pending_debits BIGINT NOT NULL DEFAULT 0,
                posted_credits BIGINT NOT NULL DEFAULT 0,
                posted_debits BIGINT NOT NULL DEFAULT 0,
                available_credits BIGINT NOT NULL DEFAULT 0,
                available_debits BIGINT NOT NULL DEFAULT 0,
                lock_version BIGINT NOT NULL DEFAULT 0,
                metadata JSONB,
                created TIMESTAMPTZ NOT NULL,
                updated TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX idx_accounts_organization_ledger ON accounts (organization_id, ledger_id);

            CREATE TABLE transactions (
                id TEXT PRIMARY KEY,
                organization_id TEXT NOT NULL,
                ledger_id TEXT NOT NULL REFERENCES ledgers (id),
                idempotency_key TEXT,
                description TEXT,
                status transaction_status NOT NULL,
                effective_at TIMESTAMPTZ NOT NULL,
                metadata JSONB,
                created TIMESTAMPTZ NOT NULL,
                updated TIMESTAMPTZ NOT NULL
            );
            CREATE UNIQUE INDEX idx_transactions_idempotency_key
                ON transactions (organization_id, ledger_id, idempotency_key)
                WHERE idempotency_key IS NOT NULL;
            CREATE INDEX idx_transactions_ledger_id ON transactions (ledger_id);

            CREATE TABLE entries (
                id TEXT PRIMARY KEY,
                organization_id TEXT NOT NULL,
                transaction_id TEXT NOT NULL REFERENCES transactions (id),
                account_id TEXT NOT NULL REFERENCES accounts (id),
                direction entry_direction NOT NULL,
                amount BIGINT NOT NULL CHECK (amount > 0),
                currency TEXT NOT NULL,
                currency_exponent SMALLINT NOT NULL,
                status transaction_status NOT NULL,
                created TIMESTAMPTZ NOT NULL,
                updated TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX idx_entries_transaction_id ON entries (transaction_id);
            CREATE INDEX idx_entries_account_id ON entries (account_id);

            CREATE TABLE settlements (
                id TEXT PRIMARY KEY,
                organization_id TEXT NOT NULL,
                transaction_id TEXT REFERENCES transactions (id),
                settled_account_id TEXT NOT NULL REFERENCES accounts (id),
                contra_account_id TEXT NOT NULL REFERENCES accounts (id),
                amount BIGINT NOT NULL DEFAULT 0,
                normal_balance normal_balance NOT NULL,
                currency TEXT NOT NULL,
                currency_exponent SMALLINT NOT NULL,
                status settlement_status NOT NULL,
                description TEXT,
                external_reference TEXT,
                effective_at_upper_bound TIMESTAMPTZ,
                metadata JSONB,
                created TIMESTAMPTZ NOT NULL,
                updated TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX idx_settlements_settled_account ON settlements (settled_account_id);

            CREATE TABLE settlement_entries (
                settlement_id TEXT NOT NULL REFERENCES settlements (id),
                entry_id TEXT NOT NULL REFERENCES entries (id),
                PRIMARY KEY (settlement_id, entry_id)
            );
            CREATE UNIQUE INDEX idx_settlement_entries_entry_id ON settlement_entries (entry_id);

            CREATE TABLE monitors (
                id TEXT PRIMARY KEY,
                account_id TEXT NOT NULL REFERENCES accounts (id),
                alert_conditions JSONB NOT NULL,
                description TEXT,
                metadata JSONB,
                lock_version BIGINT NOT NULL DEFAULT 0,
                created TIMESTAMPTZ NOT NULL,
                updated TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX idx_monitors_account_id ON monitors (account_id);

            CREATE TABLE statements (
                id TEXT PRIMARY KEY,
                ledger_id TEXT NOT NULL REFERENCES ledgers (id),
                account_id TEXT NOT NULL REFERENCES accounts (id),
                start_datetime TIMESTAMPTZ NOT NULL,
                end_datetime TIMESTAMPTZ NOT NULL,
                ledger_account_version BIGINT NOT NULL,
                starting_balances JSONB NOT NULL,
                ending_balances JSONB NOT NULL,
                currency TEXT NOT NULL,
                currency_exponent SMALLINT NOT NULL,
                created TIMESTAMPTZ NOT NULL,
                updated TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX idx_statements_account_id ON statements (account_id);
            ",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS statements;
            DROP TABLE IF EXISTS monitors;
            DROP TABLE IF EXISTS settlement_entries;
            DROP TABLE IF EXISTS settlements;
            DROP TABLE IF EXISTS entries;
            DROP TABLE IF EXISTS transactions;
            DROP TABLE IF EXISTS accounts;
            DROP TABLE IF EXISTS ledgers;
            DROP TYPE IF EXISTS settlement_status;
            DROP TYPE IF EXISTS transaction_status;
            DROP TYPE IF EXISTS entry_direction;
            DROP TYPE IF EXISTS normal_balance;
            ",
        )
        .await?;
        Ok(())
    }
}
