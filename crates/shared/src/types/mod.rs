//! Common types used across the application.

pub mod id;
pub mod pagination;

pub use id::{
    AccountId, AccountStatementId, BalanceMonitorId, EntityKind, EntryId, IdParseError, LedgerId,
    OrganizationId, SettlementId, TransactionId,
};
pub use pagination::{PageRequest, PageResponse};
