//! Tests for the task generator

use chronic_care_engine::models::task::Cadence;
use chronic_care_engine::{
    BillingPeriod, CareError, Priority, Program, RulesConfig, TaskStatus, ValidationError, generate,
    merge_device_alerts, rollover,
};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;

use crate::utils::{date, init_logging, march_2024, reviewed_alert};

const NO_KEYWORDS: &[&str] = &[];

#[test]
fn test_task_ids_are_unique_and_stable() {
    init_logging();
    let config = RulesConfig::default();
    let first = generate("patient-1", &["RPM", "CCM"], NO_KEYWORDS, &march_2024(), &[], &config).unwrap();
    let again = generate("patient-1", &["RPM", "CCM"], NO_KEYWORDS, &march_2024(), &[], &config).unwrap();

    let ids: FxHashSet<&str> = first.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), first.tasks.len());
    assert_eq!(first.tasks, again.tasks);
}

#[test]
fn test_newly_enrolled_program_only_adds_its_tasks() {
    let config = RulesConfig::default();
    let rpm_only = generate("patient-1", &["RPM"], NO_KEYWORDS, &march_2024(), &[], &config).unwrap();
    let with_ccm = generate(
        "patient-1",
        &["RPM", "CCM"],
        NO_KEYWORDS,
        &march_2024(),
        &rpm_only.tasks,
        &config,
    )
    .unwrap();

    assert!(!with_ccm.tasks.is_empty());
    assert!(with_ccm.tasks.iter().all(|t| t.program_type() == Program::Ccm));
}

#[test]
fn test_heart_failure_selects_pcm_variant() {
    let config = RulesConfig::default();
    let report = generate(
        "patient-1",
        &["PCM"],
        &["heart failure"],
        &march_2024(),
        &[],
        &config,
    )
    .unwrap();

    assert_eq!(report.variants.get(&Program::Pcm).map(String::as_str), Some("heart-failure"));
    assert!(report.tasks.iter().any(|t| t.title == "Weight log review"));

    let generic = generate("patient-1", &["PCM"], &["diabetes"], &march_2024(), &[], &config).unwrap();
    assert_eq!(generic.variants.get(&Program::Pcm).map(String::as_str), Some("generic"));
}

#[test]
fn test_generated_tasks_follow_templates() {
    let config = RulesConfig::default();
    let report = generate("patient-1", &["CCM"], NO_KEYWORDS, &march_2024(), &[], &config).unwrap();

    let outreach: Vec<_> = report
        .tasks
        .iter()
        .filter(|t| t.cadence == Cadence::BiWeekly)
        .collect();
    assert_eq!(outreach.len(), 3); // 2nd, 16th and 30th of March
    assert!(report.tasks.iter().all(|t| t.status == TaskStatus::Pending));
    assert!(report.tasks.iter().all(|t| t.priority != Priority::Urgent));
    assert!(report.tasks.windows(2).all(|w| w[0].due_date <= w[1].due_date));
}

#[test]
fn test_conflicting_enrollment_fails_generation() {
    let config = RulesConfig::default();
    let err = generate("patient-1", &["CCM", "PCM"], NO_KEYWORDS, &march_2024(), &[], &config).unwrap_err();
    assert!(matches!(
        err,
        CareError::Validation(ValidationError::ConflictingPrograms)
    ));
}

#[test]
fn test_empty_patient_id_is_rejected() {
    let config = RulesConfig::default();
    assert!(generate("  ", &["CCM"], NO_KEYWORDS, &march_2024(), &[], &config).is_err());
}

#[test]
fn test_all_unknown_programs_yield_no_tasks() {
    let config = RulesConfig::default();
    let report = generate("patient-1", &["TCM", "BHI"], NO_KEYWORDS, &march_2024(), &[], &config).unwrap();
    assert!(report.tasks.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert!(report.skipped.iter().all(CareError::is_partial));
}

#[test]
fn test_device_alerts_are_merged_not_generated() {
    let config = RulesConfig::default();
    let report = generate("patient-1", &["RPM"], NO_KEYWORDS, &march_2024(), &[], &config).unwrap();
    assert!(report.tasks.iter().all(|t| !t.is_device_triggered()));

    let generated = report.tasks.len();
    let alerts = vec![reviewed_alert("r1", 3), reviewed_alert("r2", 4)];
    let merged = merge_device_alerts("patient-1", report.tasks, &alerts, &config).unwrap();
    assert_eq!(merged.len(), generated + 2);

    let device: Vec<_> = merged.iter().filter(|t| t.is_device_triggered()).collect();
    assert_eq!(device.len(), 2);
    assert!(device.iter().all(|t| t.priority == Priority::Urgent));
    assert!(device.iter().all(|t| t.program_type() == Program::Rpm));
}

#[test]
fn test_alert_without_id_is_rejected() {
    let config = RulesConfig::default();
    let err = merge_device_alerts("patient-1", Vec::new(), &[reviewed_alert(" ", 3)], &config).unwrap_err();
    assert!(matches!(
        err,
        CareError::Validation(ValidationError::EmptyAlertId { index: 0 })
    ));
}

#[test]
fn test_rollover_opens_next_period() {
    let config = RulesConfig::default();
    let march = march_2024();
    let initial = generate("patient-1", &["CCM"], NO_KEYWORDS, &march, &[], &config).unwrap();
    let one_time = initial
        .tasks
        .iter()
        .filter(|t| t.cadence == Cadence::OneTime)
        .count();
    assert_eq!(one_time, 1);

    let next = rollover(
        "patient-1",
        &["CCM"],
        NO_KEYWORDS,
        &march,
        initial.tasks,
        &BTreeSet::new(),
        &config,
    )
    .unwrap();

    assert_eq!(next.period, BillingPeriod::month(2024, 4).unwrap());
    assert!(next.archived.iter().all(|t| march.contains(t.due_date)));
    assert!(next.tasks.iter().all(|t| next.period.contains(t.due_date)));
    assert!(!next.tasks.is_empty());
    // The care plan is created once, at enrollment
    assert!(next.tasks.iter().all(|t| t.cadence != Cadence::OneTime));
    assert!(next.tasks.iter().any(|t| t.due_date == date(2024, 4, 5)));
}

#[test]
fn test_care_plan_survives_consecutive_rollovers() {
    let config = RulesConfig::default();
    let march = march_2024();
    let initial = generate("patient-1", &["CCM"], NO_KEYWORDS, &march, &[], &config).unwrap();
    let care_plan = initial
        .tasks
        .iter()
        .find(|t| t.cadence == Cadence::OneTime)
        .map(|t| t.id.clone())
        .unwrap();

    let april = rollover(
        "patient-1",
        &["CCM"],
        NO_KEYWORDS,
        &march,
        initial.tasks,
        &BTreeSet::new(),
        &config,
    )
    .unwrap();
    assert!(april.issued_once.contains(&care_plan));

    let may = rollover(
        "patient-1",
        &["CCM"],
        NO_KEYWORDS,
        &april.period,
        april.tasks,
        &april.issued_once,
        &config,
    )
    .unwrap();

    assert_eq!(may.period, BillingPeriod::month(2024, 5).unwrap());
    assert!(!may.tasks.is_empty());
    assert!(may.tasks.iter().all(|t| t.id != care_plan));
    assert!(may.tasks.iter().all(|t| t.cadence != Cadence::OneTime));
    assert!(may.issued_once.contains(&care_plan));
}

#[test]
fn test_newly_enrolled_program_gets_its_one_time_task_at_rollover() {
    let config = RulesConfig::default();
    let march = march_2024();
    let initial = generate("patient-1", &["CCM"], NO_KEYWORDS, &march, &[], &config).unwrap();

    let april = rollover(
        "patient-1",
        &["RPM", "CCM"],
        NO_KEYWORDS,
        &march,
        initial.tasks,
        &BTreeSet::new(),
        &config,
    )
    .unwrap();

    let one_time: Vec<_> = april
        .tasks
        .iter()
        .filter(|t| t.cadence == Cadence::OneTime)
        .collect();
    assert_eq!(one_time.len(), 1);
    assert_eq!(one_time[0].program_type(), Program::Rpm);
    assert_eq!(april.issued_once.len(), 2);
}

#[test]
fn test_alert_for_another_patient_is_rejected() {
    let config = RulesConfig::default();
    let mut foreign = reviewed_alert("r9", 9);
    foreign.patient_id = "someone-else".to_string();

    let err = merge_device_alerts("patient-1", Vec::new(), &[reviewed_alert("r1", 1), foreign], &config)
        .unwrap_err();
    assert!(matches!(
        err,
        CareError::Validation(ValidationError::ForeignPatientEntry { id, found, expected })
            if id == "r9" && found == "someone-else" && expected == "patient-1"
    ));
}
