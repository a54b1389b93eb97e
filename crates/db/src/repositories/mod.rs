//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod convert;
pub mod ledger;
pub mod monitor;
pub mod settlement;
pub mod statement;
pub mod transaction;

pub use account::AccountRepository;
pub use ledger::LedgerRepository;
pub use monitor::MonitorRepository;
pub use settlement::SettlementRepository;
pub use statement::StatementRepository;
pub use transaction::TransactionRepository;
