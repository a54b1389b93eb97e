//! BalanceMonitor entity: alerts on an account crossing a threshold.

use chrono::{DateTime, Utc};
use ledgr_shared::types::{AccountId, BalanceMonitorId};
use serde::{Deserialize, Serialize};

use super::types::{AlertField, AlertOperator};

/// One condition within a [`BalanceMonitor`]'s alert set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCondition {
    /// The account field being compared.
    pub field: AlertField,
    /// The comparison operator.
    pub operator: AlertOperator,
    /// The threshold value, as a decimal string to avoid float precision loss
    /// for `balance` comparisons and an RFC 3339 timestamp for time fields.
    pub value: String,
}

/// Watches an Account for balance or timestamp conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceMonitor {
    /// Unique identifier for this monitor.
    pub id: BalanceMonitorId,
    /// The account being watched.
    pub account_id: AccountId,
    /// The conditions that, together, define an alert.
    pub alert_conditions: Vec<AlertCondition>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Arbitrary caller-supplied metadata.
    pub metadata: Option<serde_json::Value>,
    /// Optimistic-concurrency version.
    pub lock_version: i64,
    /// Creation timestamp, server-assigned.
    pub created: DateTime<Utc>,
    /// Last-update timestamp, server-assigned.
    pub updated: DateTime<Utc>,
}

impl BalanceMonitor {
    /// Creates a new monitor with `lock_version = 0`.
    #[must_use]
    pub fn new(account_id: AccountId, alert_conditions: Vec<AlertCondition>) -> Self {
        let now = Utc::now();
        Self {
            id: BalanceMonitorId::generate(),
            account_id,
            alert_conditions,
            description: None,
            metadata: None,
            lock_version: 0,
            created: now,
            updated: now,
        }
    }

    /// Evaluates this monitor's `Balance` conditions against a posted amount.
    /// Conditions on `Created`/`Updated` are evaluated by the caller, which
    /// has the account's timestamps in scope.
    #[must_use]
    pub fn balance_conditions_met(&self, posted_amount: i64) -> bool {
        self.alert_conditions
            .iter()
            .filter(|c| c.field == AlertField::Balance)
            .all(|c| {
                let Ok(threshold) = c.value.parse::<i64>() else {
                    return false;
                };
                match c.operator {
                    AlertOperator::Eq => posted_amount == threshold,
                    AlertOperator::Lt => posted_amount < threshold,
                    AlertOperator::Gt => posted_amount > threshold,
                    AlertOperator::Lte => posted_amount <= threshold,
                    AlertOperator::Gte => posted_amount >= threshold,
                    AlertOperator::Ne => posted_amount != threshold,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_condition_greater_than_is_evaluated() {
        let monitor = BalanceMonitor::new(
            AccountId::generate(),
            vec![AlertCondition {
                field: AlertField::Balance,
                operator: AlertOperator::Gt,
                value: "1000".to_string(),
            }],
        );
        assert!(monitor.balance_conditions_met(1_001));
        assert!(!monitor.balance_conditions_met(999));
    }

    #[test]
    fn monitor_with_no_balance_conditions_is_vacuously_met() {
        let monitor = BalanceMonitor::new(
            AccountId::generate(),
            vec![AlertCondition {
                field: AlertField::Updated,
                operator: AlertOperator::Gt,
                value: "2026-01-01T00:00:00Z".to_string(),
            }],
        );
        assert!(monitor.balance_conditions_met(0));
    }
}
