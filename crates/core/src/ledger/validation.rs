//! Structural invariant checks applied at entity construction.

use ledgr_shared::LedgerError;

use super::entry::Entry;

/// Checks that a transaction balances and that no account repeats.
///
/// Currency agreement with the Ledger is checked separately in
/// [`validate_currency_agreement`], since it needs the Ledger in scope.
///
/// # Errors
///
/// Returns [`LedgerError::Validation`] if the entries are empty, fewer
/// than two, unbalanced, or repeat an account.
pub fn validate_entries(entries: &[Entry]) -> Result<(), LedgerError> {
    if entries.len() < 2 {
        return Err(LedgerError::validation(
            "a transaction must have at least two entries",
        ));
    }

    let mut seen_accounts = std::collections::HashSet::new();
    let mut total_debits: u128 = 0;
    let mut total_credits: u128 = 0;

    for entry in entries {
        if !seen_accounts.insert(&entry.account_id) {
            return Err(LedgerError::validation(format!(
                "account {} referenced by more than one entry in the same transaction",
                entry.account_id
            )));
        }

        if entry.amount == 0 {
            return Err(LedgerError::validation("entry amount must be positive"));
        }

        match entry.direction {
            super::types::EntryDirection::Debit => total_debits += u128::from(entry.amount),
            super::types::EntryDirection::Credit => total_credits += u128::from(entry.amount),
        }
    }

    if total_debits != total_credits {
        return Err(LedgerError::validation(format!(
            "transaction is unbalanced: debits ({total_debits}) != credits ({total_credits})"
        )));
    }

    Ok(())
}

/// Checks that every entry's `(currency, currencyExponent)` matches the Ledger's.
///
/// # Errors
///
/// Returns [`LedgerError::Validation`] on the first mismatching entry.
pub fn validate_currency_agreement(
    entries: &[Entry],
    ledger_currency: &str,
    ledger_currency_exponent: u8,
) -> Result<(), LedgerError> {
    for entry in entries {
        if entry.currency != ledger_currency || entry.currency_exponent != ledger_currency_exponent
        {
            return Err(LedgerError::validation(format!(
                "entry currency {}/{} does not match ledger currency {}/{}",
                entry.currency, entry.currency_exponent, ledger_currency, ledger_currency_exponent
            )));
        }
    }
    Ok(())
}

/// Checks that `currency_exponent` is within the accepted range `[0, 18]`.
///
/// # Errors
///
/// Returns [`LedgerError::Validation`] if out of range.
pub fn validate_currency_exponent(exponent: u8) -> Result<(), LedgerError> {
    if exponent > 18 {
        return Err(LedgerError::validation(
            "currencyExponent must be between 0 and 18",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{EntryDirection, TransactionStatus};
    use chrono::Utc;
    use ledgr_shared::types::{AccountId, EntryId, OrganizationId, TransactionId};

    fn make_entry(direction: EntryDirection, amount: u64, account: AccountId) -> Entry {
        Entry {
            id: EntryId::generate(),
            organization_id: OrganizationId::generate(),
            transaction_id: TransactionId::generate(),
            account_id: account,
            direction,
            amount,
            currency: "USD".to_string(),
            currency_exponent: 2,
            status: TransactionStatus::Posted,
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn balanced_two_entry_transaction_is_valid() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        let entries = vec![
            make_entry(EntryDirection::Debit, 10_000, a),
            make_entry(EntryDirection::Credit, 10_000, b),
        ];
        assert!(validate_entries(&entries).is_ok());
    }

    #[test]
    fn unbalanced_transaction_is_rejected() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        let entries = vec![
            make_entry(EntryDirection::Debit, 10_000, a),
            make_entry(EntryDirection::Credit, 9_999, b),
        ];
        assert!(validate_entries(&entries).is_err());
    }

    #[test]
    fn single_entry_transaction_is_rejected() {
        let a = AccountId::generate();
        let entries = vec![make_entry(EntryDirection::Debit, 10_000, a)];
        assert!(validate_entries(&entries).is_err());
    }

    #[test]
    fn duplicate_account_in_one_transaction_is_rejected() {
        let a = AccountId::generate();
        let entries = vec![
            make_entry(EntryDirection::Debit, 5_000, a.clone()),
            make_entry(EntryDirection::Credit, 5_000, a),
        ];
        assert!(validate_entries(&entries).is_err());
    }

    #[test]
    fn zero_amount_entry_is_rejected() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        let entries = vec![
            make_entry(EntryDirection::Debit, 0, a),
            make_entry(EntryDirection::Credit, 0, b),
        ];
        assert!(validate_entries(&entries).is_err());
    }

    #[test]
    fn mismatched_currency_is_rejected() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        let mut entries = vec![
            make_entry(EntryDirection::Debit, 10_000, a),
            make_entry(EntryDirection::Credit, 10_000, b),
        ];
        entries[1].currency = "EUR".to_string();
        assert!(validate_currency_agreement(&entries, "USD", 2).is_err());
    }

    #[test]
    fn currency_exponent_above_eighteen_is_rejected() {
        assert!(validate_currency_exponent(19).is_err());
        assert!(validate_currency_exponent(18).is_ok());
    }
}
