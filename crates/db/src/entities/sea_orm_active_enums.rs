//! Postgres-native enum types shared by several entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which side of the ledger an Account's balance grows on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "normal_balance")]
pub enum NormalBalance {
    #[sea_orm(string_value = "debit")]
    Debit,
    #[sea_orm(string_value = "credit")]
    Credit,
}

impl From<ledgr_core::ledger::NormalBalance> for NormalBalance {
    fn from(value: ledgr_core::ledger::NormalBalance) -> Self {
        match value {
            ledgr_core::ledger::NormalBalance::Debit => Self::Debit,
            ledgr_core::ledger::NormalBalance::Credit => Self::Credit,
        }
    }
}

impl From<NormalBalance> for ledgr_core::ledger::NormalBalance {
    fn from(value: NormalBalance) -> Self {
        match value {
            NormalBalance::Debit => Self::Debit,
            NormalBalance::Credit => Self::Credit,
        }
    }
}

/// Which side of an Entry it posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_direction")]
pub enum EntryDirection {
    #[sea_orm(string_value = "debit")]
    Debit,
    #[sea_orm(string_value = "credit")]
    Credit,
}

impl From<ledgr_core::ledger::EntryDirection> for EntryDirection {
    fn from(value: ledgr_core::ledger::EntryDirection) -> Self {
        match value {
            ledgr_core::ledger::EntryDirection::Debit => Self::Debit,
            ledgr_core::ledger::EntryDirection::Credit => Self::Credit,
        }
    }
}

impl From<EntryDirection> for ledgr_core::ledger::EntryDirection {
    fn from(value: EntryDirection) -> Self {
        match value {
            EntryDirection::Debit => Self::Debit,
            EntryDirection::Credit => Self::Credit,
        }
    }
}

/// Transaction/Entry lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl From<ledgr_core::ledger::TransactionStatus> for TransactionStatus {
    fn from(value: ledgr_core::ledger::TransactionStatus) -> Self {
        match value {
            ledgr_core::ledger::TransactionStatus::Pending => Self::Pending,
            ledgr_core::ledger::TransactionStatus::Posted => Self::Posted,
            ledgr_core::ledger::TransactionStatus::Archived => Self::Archived,
        }
    }
}

impl From<TransactionStatus> for ledgr_core::ledger::TransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Posted => Self::Posted,
            TransactionStatus::Archived => Self::Archived,
        }
    }
}

/// Settlement lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settlement_status")]
pub enum SettlementStatus {
    #[sea_orm(string_value = "drafting")]
    Drafting,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "archiving")]
    Archiving,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl From<ledgr_core::ledger::SettlementStatus> for SettlementStatus {
    fn from(value: ledgr_core::ledger::SettlementStatus) -> Self {
        match value {
            ledgr_core::ledger::SettlementStatus::Drafting => Self::Drafting,
            ledgr_core::ledger::SettlementStatus::Processing => Self::Processing,
            ledgr_core::ledger::SettlementStatus::Pending => Self::Pending,
            ledgr_core::ledger::SettlementStatus::Posted => Self::Posted,
            ledgr_core::ledger::SettlementStatus::Archiving => Self::Archiving,
            ledgr_core::ledger::SettlementStatus::Archived => Self::Archived,
        }
    }
}

impl From<SettlementStatus> for ledgr_core::ledger::SettlementStatus {
    fn from(value: SettlementStatus) -> Self {
        match value {
            SettlementStatus::Drafting => Self::Drafting,
            SettlementStatus::Processing => Self::Processing,
            SettlementStatus::Pending => Self::Pending,
            SettlementStatus::Posted => Self::Posted,
            SettlementStatus::Archiving => Self::Archiving,
            SettlementStatus::Archived => Self::Archived,
        }
    }
}
