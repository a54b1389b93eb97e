//! A single ledger entry.

use chrono::{DateTime, Utc};
use ledgr_shared::types::{AccountId, EntryId, OrganizationId, TransactionId};
use serde::{Deserialize, Serialize};

use super::types::{EntryDirection, TransactionStatus};

/// One line of a Transaction: a directed movement of `amount` against `account_id`.
///
/// `amount` is always a strictly positive integer in minor units; the sign
/// is carried entirely by `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier for this entry.
    pub id: EntryId,
    /// Tenant that owns this entry.
    pub organization_id: OrganizationId,
    /// The transaction this entry belongs to.
    pub transaction_id: TransactionId,
    /// The account this entry moves value against.
    pub account_id: AccountId,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// Amount in minor units. Strictly positive.
    pub amount: u64,
    /// ISO 4217 currency code. Must match the containing Ledger's.
    pub currency: String,
    /// Number of minor-unit decimal places for `currency`. Must match the Ledger's.
    pub currency_exponent: u8,
    /// Mirrors the parent Transaction's status.
    pub status: TransactionStatus,
    /// Creation timestamp, server-assigned.
    pub created: DateTime<Utc>,
    /// Last-update timestamp, server-assigned.
    pub updated: DateTime<Utc>,
}
