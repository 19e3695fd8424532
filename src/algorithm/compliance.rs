//! Compliance aggregator
//!
//! Folds a task list into per-program metrics for a single billing period.
//! The only time input is the explicit period, so identical inputs always
//! produce identical metrics.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;

use crate::config::RulesConfig;
use crate::error::{Result, ValidationError};
use crate::models::compliance::{ComplianceMetrics, ProgramMeasures};
use crate::models::period::BillingPeriod;
use crate::models::program::Program;
use crate::models::task::Task;

/// Aggregate `tasks` for `program` over `[period_start, period_end)`.
///
/// Tasks for other programs or due outside the window are ignored. A task id
/// appearing twice among the in-scope tasks is rejected rather than counted
/// twice.
pub fn aggregate(
    tasks: &[Task],
    program: Program,
    period_start: NaiveDate,
    period_end: NaiveDate,
    config: &RulesConfig,
) -> Result<ComplianceMetrics> {
    let period = BillingPeriod::new(period_start, period_end)?;
    aggregate_period(tasks, program, &period, config)
}

/// [`aggregate`] over an already validated period
pub fn aggregate_period(
    tasks: &[Task],
    program: Program,
    period: &BillingPeriod,
    config: &RulesConfig,
) -> Result<ComplianceMetrics> {
    let rules = config.rules_for(program)?;

    let mut ids = FxHashSet::default();
    let mut device_days = FxHashSet::default();
    let mut total_tasks = 0u32;
    let mut completed_tasks = 0u32;
    let mut total_minutes = 0u32;

    for task in tasks
        .iter()
        .filter(|t| t.program_type() == program && period.contains(t.due_date))
    {
        if !ids.insert(task.id.as_str()) {
            return Err(ValidationError::DuplicateTaskId {
                id: task.id.clone(),
            }
            .into());
        }
        total_tasks += 1;
        if task.is_completed() {
            completed_tasks += 1;
            total_minutes = total_minutes.saturating_add(task.duration_minutes);
            if task.is_device_triggered() {
                device_days.insert(task.due_date);
            }
        }
    }

    let measures = match program {
        Program::Rpm => ProgramMeasures::Rpm {
            device_reading_days: u32::try_from(device_days.len()).unwrap_or(u32::MAX),
        },
        Program::Ccm => ProgramMeasures::Ccm,
        Program::Pcm => ProgramMeasures::Pcm,
    };
    let completion_rate = if total_tasks == 0 {
        0.0
    } else {
        f64::from(completed_tasks) / f64::from(total_tasks)
    };

    let mut metrics = ComplianceMetrics {
        measures,
        period_start: period.start(),
        period_end: period.end(),
        total_minutes,
        completed_tasks,
        total_tasks,
        completion_rate,
        compliance_status: rules.status_for(0),
    };
    metrics.compliance_status = rules.status_for(metrics.units(rules.measure));

    log::debug!(
        "{program} {period}: {completed_tasks}/{total_tasks} tasks, {total_minutes} min, status {}",
        metrics.compliance_status
    );
    Ok(metrics)
}

/// Aggregate every program in `programs` over the same period
pub fn aggregate_programs(
    tasks: &[Task],
    programs: &[Program],
    period: &BillingPeriod,
    config: &RulesConfig,
) -> Result<Vec<ComplianceMetrics>> {
    programs
        .iter()
        .map(|program| aggregate_period(tasks, *program, period, config))
        .collect()
}
