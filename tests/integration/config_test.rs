//! Tests for loading and validating rule configurations

use chronic_care_engine::models::compliance::Measure;
use chronic_care_engine::{CareError, Program, ProgramRules, RateTier, RulesConfig, calculate_billing};

use crate::utils::march_2024;

#[test]
fn test_versioned_threshold_change_needs_no_code_change() -> anyhow::Result<()> {
    let stricter = RulesConfig::default()
        .with_version("2026")
        .with_program_rules(
            Program::Ccm,
            ProgramRules {
                measure: Measure::Minutes,
                minimum: 30,
                at_risk_floor: 15,
                tiers: vec![RateTier::new(30, "99490", 6_600, "mid")],
            },
        );
    let json = stricter.to_json_pretty()?;
    let loaded = RulesConfig::from_json_str(&json)?;
    assert_eq!(loaded.version, "2026");

    let task = crate::utils::completed_task(
        "c1",
        chronic_care_engine::models::task::ProgramTask::Ccm,
        crate::utils::date(2024, 3, 4),
        22,
    );
    let metrics = chronic_care_engine::aggregate_period(&[task], Program::Ccm, &march_2024(), &loaded)?;
    let items = calculate_billing(&[metrics], &loaded)?;
    assert!(!items[0].threshold_met);
    Ok(())
}

#[test]
fn test_json_without_a_program_fails_validation() {
    let mut config = RulesConfig::default();
    config.programs.remove(&Program::Rpm);
    let json = serde_json::to_string(&config).unwrap();

    let err = RulesConfig::from_json_str(&json).unwrap_err();
    assert!(matches!(err, CareError::Configuration { program: Program::Rpm, .. }));
}

#[test]
fn test_minimal_json_uses_default_keywords_and_templates() -> anyhow::Result<()> {
    let json = r#"{
        "version": "minimal",
        "programs": {
            "RPM": { "measure": "device_days", "minimum": 16, "atRiskFloor": 8,
                     "tiers": [{ "minUnits": 16, "cptCode": "99454", "amountCents": 4800, "label": "flat" }] },
            "CCM": { "measure": "minutes", "minimum": 20, "atRiskFloor": 10,
                     "tiers": [{ "minUnits": 20, "cptCode": "99490", "amountCents": 6000, "label": "mid" }] },
            "PCM": { "measure": "minutes", "minimum": 30, "atRiskFloor": 15,
                     "tiers": [{ "minUnits": 30, "cptCode": "99426", "amountCents": 6300, "label": "mid" }] }
        }
    }"#;
    let config = RulesConfig::from_json_str(json)?;
    assert_eq!(config.eligibility.ccm_min_conditions, 2);
    assert!(config.templates.get(Program::Pcm).is_some());
    assert_eq!(config.rules_for(Program::Rpm)?.tiers[0].amount_cents, 4_800);
    Ok(())
}

#[test]
fn test_wrong_measure_is_rejected() {
    let mut config = RulesConfig::default();
    if let Some(rules) = config.programs.get_mut(&Program::Rpm) {
        rules.measure = Measure::Minutes;
    }
    assert!(config.validate().is_err());
}

#[test]
fn test_unreadable_file_is_io_error() {
    let missing = std::env::temp_dir().join("chronic-care-engine-missing-rules.json");
    let err = RulesConfig::from_json_file(&missing).unwrap_err();
    assert!(matches!(err, CareError::Io(_)));
}

#[test]
fn test_display_lists_programs() {
    let text = RulesConfig::default().to_string();
    assert!(text.contains("RPM: 16 device days"));
    assert!(text.contains("CCM: 20 minutes"));
    assert!(text.contains("PCM: 30 minutes"));
}
