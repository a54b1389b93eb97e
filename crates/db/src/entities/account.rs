//! `accounts` table. `lock_version` is the sole contention point.

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::NormalBalance;

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub organization_id: String,
    pub ledger_id: String,
    pub name: String,
    pub description: Option<String>,
    pub normal_balance: NormalBalance,
    pub pending_amount: i64,
    pub posted_amount: i64,
    pub available_amount: i64,
    pub pending_credits: i64,
    pub pending_debits: i64,
    pub posted_credits: i64,
    pub posted_debits: i64,
    pub available_credits: i64,
    pub available_debits: i64,
    pub lock_version: i64,
    pub metadata: Option<Json>,
    pub created: DateTimeUtc,
    pub updated: DateTimeUtc,
}

#[derive(Debug, Copy, Clone, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledger::Entity",
        from = "Column::LedgerId",
        to = "super::ledger::Column::Id"
    )]
    Ledger,
    #[sea_orm(has_many = "super::entry::Entity")]
    Entry,
    #[sea_orm(has_many = "super::monitor::Entity")]
    Monitor,
}

impl Related<super::ledger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ledger.def()
    }
}

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl Related<super::monitor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Monitor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
