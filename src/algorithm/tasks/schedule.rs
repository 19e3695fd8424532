//! Occurrence layout and stable task identifiers

use chrono::{Days, NaiveDate};

use crate::config::TaskTemplate;
use crate::models::period::BillingPeriod;
use crate::models::program::Program;
use crate::models::task::Cadence;

/// Due dates of `template` inside `period`.
///
/// The first occurrence is `day_offset` days after the period start, clamped
/// to the last day of the period. Weekly and bi-weekly templates repeat from
/// there while strictly inside the period. Event cadences never occur.
#[must_use]
pub fn occurrences(template: &TaskTemplate, period: &BillingPeriod) -> Vec<NaiveDate> {
    if template.cadence == Cadence::Event {
        return Vec::new();
    }

    let last_day = period.end().pred_opt().unwrap_or(period.start());
    let first = period
        .start()
        .checked_add_days(Days::new(u64::from(template.day_offset)))
        .filter(|d| period.contains(*d))
        .unwrap_or(last_day);

    let Some(interval) = template.cadence.interval_days() else {
        return vec![first];
    };

    let mut dates = Vec::new();
    let mut due = Some(first);
    while let Some(date) = due.filter(|d| period.contains(*d)) {
        dates.push(date);
        due = date.checked_add_days(Days::new(u64::from(interval)));
    }
    dates
}

/// Stable id for one occurrence of a template task.
///
/// One-time tasks omit the date so they are recognised across periods.
#[must_use]
pub fn task_id(patient_id: &str, program: Program, template: &TaskTemplate, due: NaiveDate) -> String {
    match template.cadence {
        Cadence::OneTime => format!("{patient_id}-{program}-{}", template.key),
        _ => format!(
            "{patient_id}-{program}-{}-{}",
            template.key,
            due.format("%Y%m%d")
        ),
    }
}

/// Stable id for a task merged in from a device alert
#[must_use]
pub fn device_task_id(patient_id: &str, alert_id: &str) -> String {
    format!("{patient_id}-{}-device-{alert_id}", Program::Rpm)
}
