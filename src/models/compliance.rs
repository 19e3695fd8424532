//! Compliance metrics snapshot

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::program::Program;

/// What a program's billing threshold is counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Accumulated minutes of completed tasks
    Minutes,
    /// Distinct calendar days with a completed device reading
    DeviceDays,
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes => f.write_str("minutes"),
            Self::DeviceDays => f.write_str("device days"),
        }
    }
}

/// Three-tier compliance classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    NonCompliant,
    AtRisk,
    Compliant,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NonCompliant => "non-compliant",
            Self::AtRisk => "at-risk",
            Self::Compliant => "compliant",
        };
        f.write_str(s)
    }
}

/// Program-specific measures, tagged by `programType`.
///
/// Device-reading days only exist for RPM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "programType")]
pub enum ProgramMeasures {
    #[serde(rename = "RPM", rename_all = "camelCase")]
    Rpm { device_reading_days: u32 },
    #[serde(rename = "CCM")]
    Ccm,
    #[serde(rename = "PCM")]
    Pcm,
}

impl ProgramMeasures {
    #[must_use]
    pub const fn program(self) -> Program {
        match self {
            Self::Rpm { .. } => Program::Rpm,
            Self::Ccm => Program::Ccm,
            Self::Pcm => Program::Pcm,
        }
    }
}

/// Completion metrics for one program over one billing period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceMetrics {
    #[serde(flatten)]
    pub measures: ProgramMeasures,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Sum of durations of completed tasks in the period
    pub total_minutes: u32,
    pub completed_tasks: u32,
    pub total_tasks: u32,
    /// `completed_tasks / total_tasks`, zero when there are no tasks
    pub completion_rate: f64,
    pub compliance_status: ComplianceStatus,
}

impl ComplianceMetrics {
    #[must_use]
    pub const fn program_type(&self) -> Program {
        self.measures.program()
    }

    /// Device-reading days, present only for RPM
    #[must_use]
    pub const fn device_reading_days(&self) -> Option<u32> {
        match self.measures {
            ProgramMeasures::Rpm {
                device_reading_days,
            } => Some(device_reading_days),
            ProgramMeasures::Ccm | ProgramMeasures::Pcm => None,
        }
    }

    /// Value of `measure` for this snapshot
    #[must_use]
    pub fn units(&self, measure: Measure) -> u32 {
        match measure {
            Measure::Minutes => self.total_minutes,
            Measure::DeviceDays => self.device_reading_days().unwrap_or(0),
        }
    }
}
