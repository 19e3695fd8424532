//! Tests for the billing calculator

use chronic_care_engine::models::compliance::ProgramMeasures;
use chronic_care_engine::models::task::ProgramTask;
use chronic_care_engine::{
    BillingPeriod, CareError, ComplianceMetrics, Program, RulesConfig, ValidationError, aggregate_period,
    calculate_billing, merge_device_alerts, summarize,
};

use crate::utils::{completed_task, date, init_logging, march_2024, reviewed_alert};

fn ccm_metrics(minutes: &[u32]) -> ComplianceMetrics {
    let tasks: Vec<_> = minutes
        .iter()
        .enumerate()
        .map(|(i, m)| completed_task(&format!("c{i}"), ProgramTask::Ccm, date(2024, 3, 2 + i as u32), *m))
        .collect();
    aggregate_period(&tasks, Program::Ccm, &march_2024(), &RulesConfig::default()).unwrap()
}

fn rpm_metrics(days: u32) -> ComplianceMetrics {
    let alerts: Vec<_> = (1..=days).map(|d| reviewed_alert(&format!("r{d}"), d)).collect();
    let config = RulesConfig::default();
    let tasks = merge_device_alerts("patient-1", Vec::new(), &alerts, &config).unwrap();
    aggregate_period(&tasks, Program::Rpm, &march_2024(), &config).unwrap()
}

#[test]
fn test_ccm_scenario_bills_mid_tier() {
    init_logging();
    let config = RulesConfig::default();
    let items = calculate_billing(&[ccm_metrics(&[12, 10])], &config).unwrap();

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.program_type, Program::Ccm);
    assert!(item.threshold_met);
    assert_eq!(item.units, 22);
    assert_eq!(item.tier.as_deref(), Some("mid"));
    let mid = &config.rules_for(Program::Ccm).unwrap().tiers[0];
    assert_eq!(item.amount_cents, mid.amount_cents);
    assert_eq!(item.cpt_code, mid.cpt_code);
}

#[test]
fn test_rpm_scenario_below_threshold() {
    let items = calculate_billing(&[rpm_metrics(10)], &RulesConfig::default()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].amount_cents, 0);
    assert!(!items[0].threshold_met);
}

#[test]
fn test_rpm_at_sixteen_days_is_billable() {
    let items = calculate_billing(&[rpm_metrics(16)], &RulesConfig::default()).unwrap();
    assert!(items[0].threshold_met);
    assert!(items[0].amount_cents > 0);
}

#[test]
fn test_pcm_threshold_is_thirty_minutes() {
    let config = RulesConfig::default();
    let period = march_2024();
    let pcm = |minutes: u32| {
        let task = completed_task("p", ProgramTask::Pcm, date(2024, 3, 12), minutes);
        aggregate_period(&[task], Program::Pcm, &period, &config).unwrap()
    };

    assert!(!calculate_billing(&[pcm(29)], &config).unwrap()[0].threshold_met);
    assert!(calculate_billing(&[pcm(30)], &config).unwrap()[0].threshold_met);
    let high = calculate_billing(&[pcm(75)], &config).unwrap();
    assert_eq!(high[0].tier.as_deref(), Some("high"));
}

#[test]
fn test_summary_total_matches_line_items() {
    let config = RulesConfig::default();
    let metrics = vec![rpm_metrics(20), ccm_metrics(&[25, 20])];
    let summary = summarize(&march_2024(), &metrics, &config).unwrap();

    assert_eq!(summary.line_items.len(), 2);
    assert_eq!(summary.line_item_sum(), Some(summary.total_amount_cents));
    assert_eq!(summary.total_amount_cents, 5_000 + 10_900);
    assert_eq!(summary.billable_programs().collect::<Vec<_>>(), vec![Program::Rpm, Program::Ccm]);
}

#[test]
fn test_zero_amount_items_are_kept() {
    let metrics = vec![rpm_metrics(3), ccm_metrics(&[5])];
    let summary = summarize(&march_2024(), &metrics, &RulesConfig::default()).unwrap();
    assert_eq!(summary.line_items.len(), 2);
    assert_eq!(summary.total_amount_cents, 0);
    assert!(summary.line_item(Program::Rpm).is_some());
    assert!(summary.line_item(Program::Ccm).is_some());
}

#[test]
fn test_metrics_from_other_period_are_rejected() {
    let config = RulesConfig::default();
    let april = BillingPeriod::month(2024, 4).unwrap();
    let err = summarize(&april, &[ccm_metrics(&[30])], &config).unwrap_err();
    assert!(matches!(
        err,
        CareError::Validation(ValidationError::MismatchedPeriods { program: Program::Ccm, .. })
    ));

    let mut stale = ccm_metrics(&[30]);
    stale.measures = ProgramMeasures::Pcm;
    stale.period_start = date(2024, 2, 1);
    stale.period_end = date(2024, 3, 1);
    assert!(calculate_billing(&[rpm_metrics(16), stale], &config).is_err());
}

#[test]
fn test_empty_metrics_bill_nothing() {
    let summary = summarize(&march_2024(), &[], &RulesConfig::default()).unwrap();
    assert!(summary.line_items.is_empty());
    assert_eq!(summary.total_amount_cents, 0);
}
