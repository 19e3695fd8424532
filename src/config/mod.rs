//! Rules configuration for the engine.
//!
//! Every keyword set, compliance threshold, rate table and task template lives
//! in [`RulesConfig`]. Components only read it, so a new fee schedule is a new
//! configuration value (or JSON file) rather than a code change.

pub mod templates;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{CareError, Result};
use crate::models::compliance::{ComplianceStatus, Measure};
use crate::models::diagnosis::DiagnosisStatus;
use crate::models::program::Program;

pub use templates::{TaskTemplate, TemplateCatalog, TemplateSet, TemplateVariant};

/// Keyword sets and counts used by the eligibility classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRules {
    /// Conditions that qualify for remote monitoring
    pub rpm_keywords: Vec<String>,
    /// Chronic, high-risk conditions counted for CCM and PCM
    pub chronic_keywords: Vec<String>,
    /// Distinct chronic diagnoses required for CCM
    pub ccm_min_conditions: usize,
    /// Distinct high-risk diagnoses required for PCM
    pub pcm_min_conditions: usize,
    /// Diagnosis statuses that count toward eligibility; every status by default
    pub counted_statuses: Vec<DiagnosisStatus>,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        let rpm_keywords = [
            "hypertension",
            "high blood pressure",
            "diabetes",
            "heart failure",
            "copd",
            "chronic obstructive",
            "asthma",
            "obesity",
            "atrial fibrillation",
            "chronic kidney disease",
        ];
        let chronic_keywords = [
            "hypertension",
            "high blood pressure",
            "diabetes",
            "heart failure",
            "copd",
            "chronic obstructive",
            "asthma",
            "chronic kidney disease",
            "coronary artery disease",
            "atrial fibrillation",
            "hyperlipidemia",
            "depression",
            "dementia",
            "alzheimer",
            "arthritis",
            "osteoporosis",
            "cancer",
            "parkinson",
            "multiple sclerosis",
        ];

        Self {
            rpm_keywords: rpm_keywords.iter().map(ToString::to_string).collect(),
            chronic_keywords: chronic_keywords.iter().map(ToString::to_string).collect(),
            ccm_min_conditions: 2,
            pcm_min_conditions: 1,
            counted_statuses: vec![
                DiagnosisStatus::Active,
                DiagnosisStatus::Resolved,
                DiagnosisStatus::Chronic,
                DiagnosisStatus::Inactive,
            ],
        }
    }
}

/// One step of a program's rate table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTier {
    /// Units (minutes or device days) at which this tier starts
    pub min_units: u32,
    pub cpt_code: String,
    pub amount_cents: u64,
    pub label: String,
}

impl RateTier {
    #[must_use]
    pub fn new(min_units: u32, cpt_code: &str, amount_cents: u64, label: &str) -> Self {
        Self {
            min_units,
            cpt_code: cpt_code.to_string(),
            amount_cents,
            label: label.to_string(),
        }
    }
}

/// Thresholds and rates for one program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRules {
    pub measure: Measure,
    /// Billing threshold; also the lower bound of the compliant tier
    pub minimum: u32,
    /// Lower bound of the at-risk tier
    pub at_risk_floor: u32,
    /// Rate tiers in ascending `min_units`, the first starting at `minimum`
    pub tiers: Vec<RateTier>,
}

impl ProgramRules {
    /// Classify `units` into the three compliance tiers
    #[must_use]
    pub fn status_for(&self, units: u32) -> ComplianceStatus {
        if units >= self.minimum {
            ComplianceStatus::Compliant
        } else if units >= self.at_risk_floor {
            ComplianceStatus::AtRisk
        } else {
            ComplianceStatus::NonCompliant
        }
    }

    /// Highest tier reached by `units`, `None` below the threshold
    #[must_use]
    pub fn tier_for(&self, units: u32) -> Option<&RateTier> {
        if units < self.minimum {
            return None;
        }
        self.tiers.iter().rev().find(|tier| units >= tier.min_units)
    }

    /// The entry-level tier, reported on non-billable items
    #[must_use]
    pub fn base_tier(&self) -> Option<&RateTier> {
        self.tiers.first()
    }

    fn validate(&self, program: Program) -> Result<()> {
        let expected = if program == Program::Rpm {
            Measure::DeviceDays
        } else {
            Measure::Minutes
        };
        if self.measure != expected {
            return Err(CareError::configuration(
                program,
                format!("measure must be {expected}, found {}", self.measure),
            ));
        }
        if self.at_risk_floor > self.minimum {
            return Err(CareError::configuration(
                program,
                "at-risk floor exceeds the billing minimum",
            ));
        }
        let Some(base) = self.tiers.first() else {
            return Err(CareError::configuration(program, "rate table is empty"));
        };
        if base.min_units != self.minimum {
            return Err(CareError::configuration(
                program,
                format!(
                    "first rate tier starts at {} but the minimum is {}",
                    base.min_units, self.minimum
                ),
            ));
        }
        if self.tiers.windows(2).any(|w| w[0].min_units >= w[1].min_units) {
            return Err(CareError::configuration(
                program,
                "rate tiers must be strictly ascending",
            ));
        }
        Ok(())
    }
}

/// Central rules configuration consumed by all components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    /// Identifier of this rule set, e.g. the fee-schedule year
    pub version: String,
    #[serde(default)]
    pub eligibility: EligibilityRules,
    pub programs: BTreeMap<Program, ProgramRules>,
    #[serde(default)]
    pub templates: TemplateCatalog,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let mut programs = BTreeMap::new();
        programs.insert(
            Program::Rpm,
            ProgramRules {
                measure: Measure::DeviceDays,
                minimum: 16,
                at_risk_floor: 8,
                tiers: vec![RateTier::new(16, "99454", 5_000, "flat")],
            },
        );
        programs.insert(
            Program::Ccm,
            ProgramRules {
                measure: Measure::Minutes,
                minimum: 20,
                at_risk_floor: 10,
                tiers: vec![
                    RateTier::new(20, "99490", 6_200, "mid"),
                    RateTier::new(40, "99490+99439", 10_900, "high"),
                    RateTier::new(60, "99490+99439x2", 15_600, "max"),
                ],
            },
        );
        programs.insert(
            Program::Pcm,
            ProgramRules {
                measure: Measure::Minutes,
                minimum: 30,
                at_risk_floor: 15,
                tiers: vec![
                    RateTier::new(30, "99426", 6_500, "mid"),
                    RateTier::new(60, "99426+99427", 11_400, "high"),
                ],
            },
        );

        Self {
            version: "default".to_string(),
            eligibility: EligibilityRules::default(),
            programs,
            templates: TemplateCatalog::default(),
        }
    }
}

impl RulesConfig {
    /// Create a configuration with the built-in rule set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!("Loaded rules configuration version {}", config.version);
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        log::debug!("Reading rules configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the version label
    #[must_use]
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Replace the rules for one program
    #[must_use]
    pub fn with_program_rules(mut self, program: Program, rules: ProgramRules) -> Self {
        self.programs.insert(program, rules);
        self
    }

    /// Replace the eligibility keyword sets and counts
    #[must_use]
    pub fn with_eligibility(mut self, eligibility: EligibilityRules) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Rules for `program`; a missing entry is fatal for billing
    pub fn rules_for(&self, program: Program) -> Result<&ProgramRules> {
        self.programs
            .get(&program)
            .ok_or_else(|| CareError::configuration(program, "no thresholds or rate table configured"))
    }

    /// Templates for `program`
    pub fn templates_for(&self, program: Program) -> Result<&TemplateSet> {
        self.templates
            .get(program)
            .ok_or_else(|| CareError::configuration(program, "no task templates configured"))
    }

    /// Check that every program has consistent rules and templates
    pub fn validate(&self) -> Result<()> {
        for program in Program::ALL {
            self.rules_for(program)?.validate(program)?;
            let set = self.templates_for(program)?;
            let all_sets = std::iter::once(&set.generic).chain(set.variants.iter().map(|v| &v.tasks));
            for tasks in all_sets {
                let mut keys: Vec<&str> = tasks.iter().map(|t| t.key.as_str()).collect();
                keys.sort_unstable();
                if let Some(w) = keys.windows(2).find(|w| w[0] == w[1]) {
                    return Err(CareError::configuration(
                        program,
                        format!("duplicate task template key '{}'", w[0]),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for RulesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rules Configuration ({}):", self.version)?;
        writeln!(
            f,
            "  CCM minimum conditions: {}",
            self.eligibility.ccm_min_conditions
        )?;
        writeln!(
            f,
            "  PCM minimum conditions: {}",
            self.eligibility.pcm_min_conditions
        )?;
        for (program, rules) in &self.programs {
            writeln!(
                f,
                "  {program}: {} {} (at risk from {}), {} rate tier(s)",
                rules.minimum,
                rules.measure,
                rules.at_risk_floor,
                rules.tiers.len()
            )?;
        }
        Ok(())
    }
}
