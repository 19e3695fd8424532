//! Task generator
//!
//! Instantiates each enrolled program's task templates for a billing period.
//! Ids are stable per patient, program, template and occurrence date, so
//! running the generator again over the same period adds nothing; only newly
//! enrolled programs or newly opened periods produce tasks. Device-triggered
//! tasks are never invented here, they are merged in from device alerts.

pub mod schedule;

use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::RulesConfig;
use crate::error::{CareError, Result, ValidationError};
use crate::models::period::BillingPeriod;
use crate::models::program::{Enrollment, Program};
use crate::models::task::{Cadence, DeviceAlert, Priority, ProgramTask, Task, TaskStatus};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Outcome of a generation run.
///
/// Generation is partial: unknown program ids are reported in `skipped`
/// while the remaining programs still produce tasks.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Newly created tasks, ordered by due date then id
    pub tasks: Vec<Task>,
    /// One [`CareError::InvalidProgram`] per rejected program entry
    pub skipped: Vec<CareError>,
    /// Template variant used per program
    pub variants: BTreeMap<Program, String>,
}

impl GenerationReport {
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Generate the recurring task set for `period`.
///
/// `existing` holds tasks already populated for the patient (any period);
/// tasks whose id is already present are not generated again.
pub fn generate<P, K>(
    patient_id: &str,
    enrolled_programs: &[P],
    diagnosis_keywords: &[K],
    period: &BillingPeriod,
    existing: &[Task],
    config: &RulesConfig,
) -> Result<GenerationReport>
where
    P: AsRef<str>,
    K: AsRef<str>,
{
    let seen = existing.iter().map(|t| t.id.clone()).collect();
    generate_unseen(
        patient_id,
        enrolled_programs,
        diagnosis_keywords,
        period,
        seen,
        config,
    )
}

// Generation proper; `seen` holds every task id that must not be issued again.
fn generate_unseen<P, K>(
    patient_id: &str,
    enrolled_programs: &[P],
    diagnosis_keywords: &[K],
    period: &BillingPeriod,
    mut seen: FxHashSet<String>,
    config: &RulesConfig,
) -> Result<GenerationReport>
where
    P: AsRef<str>,
    K: AsRef<str>,
{
    let patient_id = patient_id.trim();
    if patient_id.is_empty() {
        return Err(ValidationError::EmptyPatientId.into());
    }
    log_operation_start("Generating tasks", patient_id);

    let mut report = GenerationReport::default();
    let mut programs = Vec::with_capacity(enrolled_programs.len());
    for raw in enrolled_programs {
        match raw.as_ref().parse::<Program>() {
            Ok(program) => programs.push(program),
            Err(err) => {
                log_warning("Skipping unknown program", Some(raw.as_ref()));
                report.skipped.push(err);
            }
        }
    }
    let enrollment = Enrollment::from_programs(&programs)?;

    for program in enrollment.programs() {
        let (variant, templates) = config.templates_for(program)?.select(diagnosis_keywords);
        report.variants.insert(program, variant.to_string());

        for template in templates {
            for due in schedule::occurrences(template, period) {
                let id = schedule::task_id(patient_id, program, template, due);
                if !seen.insert(id.clone()) {
                    continue;
                }
                report.tasks.push(Task {
                    id,
                    patient_id: patient_id.to_string(),
                    program: ProgramTask::scheduled(program),
                    title: template.title.clone(),
                    description: template.description.clone(),
                    cadence: template.cadence,
                    priority: template.priority,
                    duration_minutes: template.duration_minutes,
                    due_date: due,
                    status: TaskStatus::Pending,
                    billing_code: template.billing_code.clone(),
                });
            }
        }
    }

    report
        .tasks
        .sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
    log_operation_complete("generated", patient_id, report.tasks.len(), None);
    Ok(report)
}

/// Merge `patient_id`'s device alerts into `tasks` as urgent, device-triggered
/// RPM tasks.
///
/// Reviewed alerts become completed tasks. Alerts whose task id is already
/// present are ignored, so merging the same feed twice is a no-op. An alert
/// for any other patient fails the whole merge.
pub fn merge_device_alerts(
    patient_id: &str,
    mut tasks: Vec<Task>,
    alerts: &[DeviceAlert],
    config: &RulesConfig,
) -> Result<Vec<Task>> {
    let patient_id = patient_id.trim();
    if patient_id.is_empty() {
        return Err(ValidationError::EmptyPatientId.into());
    }
    let billing_code = config
        .rules_for(Program::Rpm)?
        .base_tier()
        .map(|tier| tier.cpt_code.clone())
        .ok_or_else(|| CareError::configuration(Program::Rpm, "rate table is empty"))?;

    let mut seen: FxHashSet<String> = tasks.iter().map(|t| t.id.clone()).collect();
    let before = tasks.len();
    for (index, alert) in alerts.iter().enumerate() {
        if alert.id.trim().is_empty() {
            return Err(ValidationError::EmptyAlertId { index }.into());
        }
        if alert.patient_id.trim() != patient_id {
            return Err(ValidationError::ForeignPatientEntry {
                id: alert.id.trim().to_string(),
                found: alert.patient_id.trim().to_string(),
                expected: patient_id.to_string(),
            }
            .into());
        }
        let id = schedule::device_task_id(patient_id, alert.id.trim());
        if !seen.insert(id.clone()) {
            continue;
        }
        tasks.push(Task {
            id,
            patient_id: patient_id.to_string(),
            program: ProgramTask::Rpm {
                device_triggered: true,
            },
            title: alert.title.clone(),
            description: alert.description.clone(),
            cadence: Cadence::Event,
            priority: Priority::Urgent,
            duration_minutes: alert.duration_minutes,
            due_date: alert.reading_date,
            status: if alert.reviewed {
                TaskStatus::Completed
            } else {
                TaskStatus::Pending
            },
            billing_code: billing_code.clone(),
        });
    }

    log::debug!("Merged {} of {} device alerts", tasks.len() - before, alerts.len());
    Ok(tasks)
}

/// Result of closing a billing period
#[derive(Debug)]
pub struct Rollover {
    /// The newly opened period
    pub period: BillingPeriod,
    /// Tasks due before the new period, removed from the working set
    pub archived: Vec<Task>,
    /// Working set for the new period: carried tasks plus generated ones
    pub tasks: Vec<Task>,
    /// Ids of every one-time task issued so far, archived ones included.
    /// Pass this to the next rollover.
    pub issued_once: BTreeSet<String>,
    /// Program entries skipped during generation
    pub skipped: Vec<CareError>,
}

/// Close `closing`: archive tasks due before its end and generate the next
/// period's recurring tasks.
///
/// `issued_once` is the ledger returned by the previous rollover (empty for
/// the first one). One-time tasks listed there or present in `tasks` are not
/// generated again, even after they have been archived.
pub fn rollover<P, K>(
    patient_id: &str,
    enrolled_programs: &[P],
    diagnosis_keywords: &[K],
    closing: &BillingPeriod,
    tasks: Vec<Task>,
    issued_once: &BTreeSet<String>,
    config: &RulesConfig,
) -> Result<Rollover>
where
    P: AsRef<str>,
    K: AsRef<str>,
{
    let period = closing.next()?;
    let mut issued = issued_once.clone();
    issued.extend(one_time_ids(&tasks));

    let seen = tasks
        .iter()
        .map(|t| t.id.clone())
        .chain(issued.iter().cloned())
        .collect();
    let report = generate_unseen(
        patient_id,
        enrolled_programs,
        diagnosis_keywords,
        &period,
        seen,
        config,
    )?;
    issued.extend(one_time_ids(&report.tasks));

    let (archived, mut carried): (Vec<Task>, Vec<Task>) =
        tasks.into_iter().partition(|t| t.due_date < closing.end());
    carried.extend(report.tasks);

    log::info!(
        "Closed period {closing} for {}: {} archived, {} open in {period}",
        patient_id.trim(),
        archived.len(),
        carried.len()
    );
    Ok(Rollover {
        period,
        archived,
        tasks: carried,
        issued_once: issued,
        skipped: report.skipped,
    })
}

fn one_time_ids(tasks: &[Task]) -> impl Iterator<Item = String> + '_ {
    tasks
        .iter()
        .filter(|t| t.cadence == Cadence::OneTime)
        .map(|t| t.id.clone())
}
