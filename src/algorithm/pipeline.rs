//! Patient evaluation pipeline
//!
//! Runs the full data flow for one patient: classify the diagnoses, aggregate
//! each enrolled program over the period, then price the metrics. Patients
//! are independent, so a population is evaluated in parallel with rayon over a
//! shared, read-only configuration.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::algorithm::billing::summarize;
use crate::algorithm::compliance::aggregate_programs;
use crate::algorithm::eligibility::{EligibilityResult, classify};
use crate::config::RulesConfig;
use crate::error::{CareError, Result, ValidationError};
use crate::models::billing::BillingSummary;
use crate::models::compliance::ComplianceMetrics;
use crate::models::diagnosis::Diagnosis;
use crate::models::period::BillingPeriod;
use crate::models::program::{ProgramList, validate_enrollment};
use crate::models::task::Task;
use crate::utils::logging::{log_operation_complete, log_warning};

/// Everything the engine needs to know about one patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub patient_id: String,
    pub diagnoses: Vec<Diagnosis>,
    /// Raw program ids as stored by the enrollment collaborator
    pub enrolled_programs: Vec<String>,
    pub tasks: Vec<Task>,
}

/// Derived snapshot for one patient and period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientOutcome {
    pub patient_id: String,
    pub eligibility: EligibilityResult,
    pub metrics: Vec<ComplianceMetrics>,
    pub billing: BillingSummary,
    /// Enrolled programs the diagnoses no longer qualify for
    pub ineligible_enrollments: ProgramList,
}

/// Evaluate one patient for `period`.
///
/// Enrollment is validated strictly here: an unknown program id or a CCM+PCM
/// enrollment fails the patient, as does a task recorded for another patient.
pub fn evaluate_patient(
    record: &PatientRecord,
    period: &BillingPeriod,
    config: &RulesConfig,
) -> Result<PatientOutcome> {
    let patient_id = record.patient_id.trim();
    if patient_id.is_empty() {
        return Err(ValidationError::EmptyPatientId.into());
    }
    if let Some(task) = record.tasks.iter().find(|t| t.patient_id.trim() != patient_id) {
        return Err(ValidationError::ForeignPatientEntry {
            id: task.id.clone(),
            found: task.patient_id.clone(),
            expected: patient_id.to_string(),
        }
        .into());
    }
    let enrollment = validate_enrollment(record.enrolled_programs.as_slice())?;
    let programs = enrollment.programs();

    let eligibility = classify(&record.diagnoses, &programs, config)?;
    let metrics = aggregate_programs(&record.tasks, &programs, period, config)?;
    let billing = summarize(period, &metrics, config)?;

    let ineligible_enrollments: ProgramList = programs
        .iter()
        .copied()
        .filter(|p| !eligibility.is_eligible(*p))
        .collect();
    if !ineligible_enrollments.is_empty() {
        log_warning(
            "Enrolled in programs without qualifying diagnoses",
            Some(record.patient_id.as_str()),
        );
    }

    Ok(PatientOutcome {
        patient_id: record.patient_id.clone(),
        eligibility,
        metrics,
        billing,
        ineligible_enrollments,
    })
}

/// Evaluate many patients in parallel.
///
/// Results are returned in input order; one patient's failure does not
/// affect the others.
pub fn evaluate_patients(
    records: &[PatientRecord],
    period: &BillingPeriod,
    config: &RulesConfig,
) -> Vec<Result<PatientOutcome>> {
    let start = Instant::now();
    let outcomes: Vec<Result<PatientOutcome>> = records
        .par_iter()
        .map(|record| evaluate_patient(record, period, config))
        .collect();

    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    if failed > 0 {
        log::warn!("{failed} of {} patients could not be evaluated", records.len());
    }
    log_operation_complete(
        "evaluated",
        &format!("period {period}"),
        outcomes.len() - failed,
        Some(start.elapsed()),
    );
    outcomes
}

/// Total billing potential across successfully evaluated patients
pub fn total_billing_potential(outcomes: &[Result<PatientOutcome>]) -> Result<u64> {
    outcomes
        .iter()
        .filter_map(|o| o.as_ref().ok())
        .try_fold(0u64, |acc, o| acc.checked_add(o.billing.total_amount_cents))
        .ok_or(CareError::AmountOverflow)
}
