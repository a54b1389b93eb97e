//! `SeaORM` entity models, one module per table.

pub mod account;
pub mod entry;
pub mod ledger;
pub mod monitor;
pub mod sea_orm_active_enums;
pub mod settlement;
pub mod settlement_entry;
pub mod statement;
pub mod transaction;

pub use account::Entity as Account;
pub use entry::Entity as Entry;
pub use ledger::Entity as Ledger;
pub use monitor::Entity as Monitor;
pub use settlement::Entity as Settlement;
pub use settlement_entry::Entity as SettlementEntry;
pub use statement::Entity as Statement;
pub use transaction::Entity as Transaction;
