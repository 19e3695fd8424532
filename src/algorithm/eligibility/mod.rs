//! Program eligibility classifier
//!
//! Determines which chronic-care programs a patient qualifies for from their
//! diagnosis list and recommends a program combination. Matching is a
//! case-insensitive substring test of the diagnosis description against the
//! configured keyword sets; duplicate codes count once.

pub mod recommendation;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::error::Result;
use crate::models::diagnosis::Diagnosis;
use crate::models::program::{Enrollment, Program, ProgramList};
use recommendation::Recommendation;

/// Eligibility flags and recommendation for one patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub rpm_eligible: bool,
    pub ccm_eligible: bool,
    pub pcm_eligible: bool,
    pub recommended_combination: Recommendation,
    /// Distinct diagnoses with a counted status
    pub counted_diagnoses: usize,
    /// Codes matching the RPM condition set
    pub rpm_conditions: Vec<String>,
    /// Codes matching the chronic (CCM/PCM) condition set
    pub chronic_conditions: Vec<String>,
    /// Current enrollment the result was computed against
    pub current_enrollment: Enrollment,
}

impl EligibilityResult {
    #[must_use]
    pub const fn is_eligible(&self, program: Program) -> bool {
        match program {
            Program::Rpm => self.rpm_eligible,
            Program::Ccm => self.ccm_eligible,
            Program::Pcm => self.pcm_eligible,
        }
    }

    /// Whether `program` may be added to the current enrollment
    #[must_use]
    pub fn can_enroll(&self, program: Program) -> bool {
        self.is_eligible(program)
            && !self.current_enrollment.contains(program)
            && self.current_enrollment.admits(program)
    }

    /// Recommended programs the patient is not yet enrolled in and can join
    #[must_use]
    pub fn additional_programs(&self) -> ProgramList {
        self.recommended_combination
            .programs()
            .into_iter()
            .filter(|p| self.can_enroll(*p))
            .collect()
    }
}

/// Classify a patient's diagnoses against the configured keyword sets.
///
/// `current_programs` is validated as an enrollment; CCM together with PCM is
/// rejected. Malformed diagnoses fail with a validation error naming the entry.
pub fn classify(
    diagnoses: &[Diagnosis],
    current_programs: &[Program],
    config: &RulesConfig,
) -> Result<EligibilityResult> {
    for (index, diagnosis) in diagnoses.iter().enumerate() {
        diagnosis.validate(index)?;
    }
    let current_enrollment = Enrollment::from_programs(current_programs)?;
    let rules = &config.eligibility;

    let counted: Vec<&Diagnosis> = diagnoses
        .iter()
        .filter(|d| rules.counted_statuses.contains(&d.status))
        .unique_by(|d| d.normalized_code())
        .collect();

    let rpm_conditions = matching_codes(&counted, &rules.rpm_keywords);
    let chronic_conditions = matching_codes(&counted, &rules.chronic_keywords);

    let rpm_eligible = !rpm_conditions.is_empty();
    let ccm_eligible = meets(chronic_conditions.len(), rules.ccm_min_conditions);
    let pcm_eligible = meets(chronic_conditions.len(), rules.pcm_min_conditions);

    let recommended_combination =
        Recommendation::select(rpm_eligible, ccm_eligible, pcm_eligible, counted.len());

    log::debug!(
        "Classified {} diagnoses ({} counted): RPM={rpm_eligible} CCM={ccm_eligible} PCM={pcm_eligible}, recommending {recommended_combination}",
        diagnoses.len(),
        counted.len()
    );

    Ok(EligibilityResult {
        rpm_eligible,
        ccm_eligible,
        pcm_eligible,
        recommended_combination,
        counted_diagnoses: counted.len(),
        rpm_conditions,
        chronic_conditions,
        current_enrollment,
    })
}

fn matching_codes(diagnoses: &[&Diagnosis], keywords: &[String]) -> Vec<String> {
    diagnoses
        .iter()
        .filter(|d| {
            keywords
                .iter()
                .filter(|k| !k.trim().is_empty())
                .any(|k| d.mentions(k))
        })
        .map(|d| d.normalized_code())
        .collect()
}

// A zero minimum would make every patient eligible; treat it as "needs one".
fn meets(matched: usize, minimum: usize) -> bool {
    matched >= minimum.max(1)
}
