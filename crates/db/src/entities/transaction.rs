//! `transactions` table. See migration for the partial unique index on
//! `(organization_id, ledger_id, idempotency_key)` that enforces
//! idempotency-key uniqueness.

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::TransactionStatus;

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub organization_id: String,
    pub ledger_id: String,
    pub idempotency_key: Option<String>,
    pub description: Option<String>,
    pub status: TransactionStatus,
    pub effective_at: DateTimeUtc,
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

impl ActiveModelBehavior for ActiveModel {}
