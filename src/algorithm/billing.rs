//! Billing calculator
//!
//! Prices compliance metrics against the configured rate tables. Every
//! program present in the input gets a line item, billable or not, so
//! statements can show why a program was not billed.

use std::collections::BTreeMap;

use crate::config::RulesConfig;
use crate::error::{CareError, Result, ValidationError};
use crate::models::billing::{BillingLineItem, BillingSummary};
use crate::models::compliance::ComplianceMetrics;
use crate::models::period::BillingPeriod;
use crate::models::program::Program;

/// One line item per program in `metrics`, in input order.
///
/// All metrics must cover the same period and name distinct programs.
pub fn calculate_billing(metrics: &[ComplianceMetrics], config: &RulesConfig) -> Result<Vec<BillingLineItem>> {
    check_metrics(metrics)?;
    metrics.iter().map(|m| price(m, config)).collect()
}

/// Price `metrics` for `period` and cross-check the total.
///
/// The reported total is the sum of the line items; it must equal a per-program
/// sum computed independently from the rate tables.
pub fn summarize(
    period: &BillingPeriod,
    metrics: &[ComplianceMetrics],
    config: &RulesConfig,
) -> Result<BillingSummary> {
    if let Some(m) = metrics
        .iter()
        .find(|m| m.period_start != period.start() || m.period_end != period.end())
    {
        return Err(mismatch(m, period.start(), period.end()));
    }

    let line_items = calculate_billing(metrics, config)?;
    let summary = BillingSummary {
        period_start: period.start(),
        period_end: period.end(),
        total_amount_cents: line_items
            .iter()
            .try_fold(0u64, |acc, item| acc.checked_add(item.amount_cents))
            .ok_or(CareError::AmountOverflow)?,
        line_items,
    };

    let expected = per_program_amounts(metrics, config)?
        .values()
        .try_fold(0u64, |acc, amount| acc.checked_add(*amount))
        .ok_or(CareError::AmountOverflow)?;
    if summary.total_amount_cents != expected {
        return Err(CareError::BillingMismatch {
            reported: summary.total_amount_cents,
            expected,
        });
    }

    log::info!(
        "Billing for {period}: {} line item(s), {} billable, total {} cents",
        summary.line_items.len(),
        summary.billable_programs().count(),
        summary.total_amount_cents
    );
    Ok(summary)
}

fn price(metrics: &ComplianceMetrics, config: &RulesConfig) -> Result<BillingLineItem> {
    let program = metrics.program_type();
    let rules = config.rules_for(program)?;
    let base = rules
        .base_tier()
        .ok_or_else(|| CareError::configuration(program, "rate table is empty"))?;
    let units = metrics.units(rules.measure);

    let item = match rules.tier_for(units) {
        Some(tier) => BillingLineItem {
            program_type: program,
            cpt_code: tier.cpt_code.clone(),
            amount_cents: tier.amount_cents,
            threshold_met: true,
            units,
            tier: Some(tier.label.clone()),
        },
        None => BillingLineItem {
            program_type: program,
            cpt_code: base.cpt_code.clone(),
            amount_cents: 0,
            threshold_met: false,
            units,
            tier: None,
        },
    };
    log::debug!(
        "{program}: {units} {} against minimum {} -> {} cents",
        rules.measure,
        rules.minimum,
        item.amount_cents
    );
    Ok(item)
}

fn per_program_amounts(metrics: &[ComplianceMetrics], config: &RulesConfig) -> Result<BTreeMap<Program, u64>> {
    let mut amounts = BTreeMap::new();
    for m in metrics {
        let rules = config.rules_for(m.program_type())?;
        let amount = rules
            .tier_for(m.units(rules.measure))
            .map_or(0, |tier| tier.amount_cents);
        amounts.insert(m.program_type(), amount);
    }
    Ok(amounts)
}

fn check_metrics(metrics: &[ComplianceMetrics]) -> Result<()> {
    let Some(first) = metrics.first() else {
        return Ok(());
    };
    let mut seen = Vec::with_capacity(metrics.len());
    for m in metrics {
        if m.period_start != first.period_start || m.period_end != first.period_end {
            return Err(mismatch(m, first.period_start, first.period_end));
        }
        if seen.contains(&m.program_type()) {
            return Err(ValidationError::DuplicateProgramMetrics {
                program: m.program_type(),
            }
            .into());
        }
        seen.push(m.program_type());
    }
    Ok(())
}

fn mismatch(m: &ComplianceMetrics, expected_start: chrono::NaiveDate, expected_end: chrono::NaiveDate) -> CareError {
    ValidationError::MismatchedPeriods {
        program: m.program_type(),
        start: m.period_start,
        end: m.period_end,
        expected_start,
        expected_end,
    }
    .into()
}
