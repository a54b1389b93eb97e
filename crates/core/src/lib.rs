//! Pure domain logic for the double-entry ledger.
//!
//! This crate has ZERO web or database dependencies. It defines the
//! entities, their structural invariants, and the balance-mutation
//! function (`applyEntry`) that the repository and service layers build
//! on. Every mutating operation here returns a new value; nothing here
//! holds a database connection or a lock.

pub mod ledger;
