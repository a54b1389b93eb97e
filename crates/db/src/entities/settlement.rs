//! `settlements` table. Attached entries live in the `settlement_entries` join table.

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{NormalBalance, SettlementStatus};

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub organization_id: String,
    pub transaction_id: Option<String>,
    pub settled_account_id: String,
    pub contra_account_id: String,
    pub amount: i64,
    pub normal_balance: NormalBalance,
    pub currency: String,
    pub currency_exponent: i16,
    pub status: SettlementStatus,
    pub description: Option<String>,
    pub external_reference: Option<String>,
    pub effective_at_upper_bound: Option<DateTimeUtc>,
    pub metadata: Option<Json>,
    pub created: DateTimeUtc,
    pub updated: DateTimeUtc,
}

#[derive(Debug, Copy, Clone, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::settlement_entry::Entity")]
    SettlementEntry,
}

impl Related<super::settlement_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SettlementEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
