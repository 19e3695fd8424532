//! Recommended program combinations
//!
//! This module defines the combinations the classifier can recommend and the
//! first-match precedence used to choose between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::program::{CareManagement, Enrollment, Program, ProgramList};

/// Program combination recommended for a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "RPM+CCM")]
    RpmCcm,
    #[serde(rename = "RPM+PCM")]
    RpmPcm,
    #[serde(rename = "CCM")]
    Ccm,
    #[serde(rename = "PCM")]
    Pcm,
    /// No combination applies. This is also the result for a patient who
    /// qualifies for RPM alone; check `EligibilityResult::rpm_eligible` or
    /// `can_enroll` rather than reading this as "eligible for nothing".
    #[serde(rename = "none")]
    None,
}

impl Recommendation {
    /// Pick a combination, first match wins:
    /// RPM+CCM, then RPM+PCM (single counted diagnosis only), then CCM, then PCM.
    #[must_use]
    pub const fn select(rpm: bool, ccm: bool, pcm: bool, diagnosis_count: usize) -> Self {
        if rpm && ccm {
            Self::RpmCcm
        } else if rpm && pcm && diagnosis_count == 1 {
            Self::RpmPcm
        } else if ccm {
            Self::Ccm
        } else if pcm {
            Self::Pcm
        } else {
            Self::None
        }
    }

    /// Get the display label for this combination
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RpmCcm => "RPM+CCM",
            Self::RpmPcm => "RPM+PCM",
            Self::Ccm => "CCM",
            Self::Pcm => "PCM",
            Self::None => "none",
        }
    }

    /// The enrollment this combination corresponds to
    #[must_use]
    pub const fn enrollment(self) -> Enrollment {
        let (rpm, care_management) = match self {
            Self::RpmCcm => (true, Some(CareManagement::Ccm)),
            Self::RpmPcm => (true, Some(CareManagement::Pcm)),
            Self::Ccm => (false, Some(CareManagement::Ccm)),
            Self::Pcm => (false, Some(CareManagement::Pcm)),
            Self::None => (false, None),
        };
        Enrollment {
            rpm,
            care_management,
        }
    }

    /// Programs in this combination
    #[must_use]
    pub fn programs(self) -> ProgramList {
        self.enrollment().programs()
    }

    #[must_use]
    pub fn includes(self, program: Program) -> bool {
        self.programs().contains(&program)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
