//! Billing line items and the monthly summary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::program::Program;

/// One billable (or audited non-billable) entry per program and period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingLineItem {
    pub program_type: Program,
    pub cpt_code: String,
    /// Amount in cents; zero unless `threshold_met`. Serialized as `amount`.
    #[serde(rename = "amount")]
    pub amount_cents: u64,
    pub threshold_met: bool,
    /// Measured units (minutes or device days) the item was priced on
    pub units: u32,
    /// Label of the applied rate tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

impl BillingLineItem {
    /// Amount in currency units, for display only
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }
}

/// Line items for one billing period with their total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSummary {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub line_items: Vec<BillingLineItem>,
    /// Aggregate monthly billing potential in cents, serialized as `totalAmount`
    #[serde(rename = "totalAmount")]
    pub total_amount_cents: u64,
}

impl BillingSummary {
    /// Line item for `program`, if it was present in the input metrics
    #[must_use]
    pub fn line_item(&self, program: Program) -> Option<&BillingLineItem> {
        self.line_items.iter().find(|item| item.program_type == program)
    }

    /// Programs whose threshold was met
    pub fn billable_programs(&self) -> impl Iterator<Item = Program> + '_ {
        self.line_items
            .iter()
            .filter(|item| item.threshold_met)
            .map(|item| item.program_type)
    }

    /// Sum of line-item amounts, `None` on overflow
    #[must_use]
    pub fn line_item_sum(&self) -> Option<u64> {
        self.line_items
            .iter()
            .try_fold(0u64, |acc, item| acc.checked_add(item.amount_cents))
    }

    /// Total in currency units, for display only
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.total_amount_cents as f64 / 100.0
    }
}
