//! Chronic-care billing programs and validated enrollment sets

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::error::{CareError, Result, ValidationError};

/// Small inline list of programs; a patient never holds more than three
pub type ProgramList = SmallVec<[Program; 3]>;

/// Chronic-care billing programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Program {
    /// Remote Patient Monitoring (CPT 99453-99458)
    Rpm,
    /// Chronic Care Management (CPT 99490-99491)
    Ccm,
    /// Principal Care Management (CPT 99424-99427)
    Pcm,
}

impl Program {
    /// All programs in canonical order
    pub const ALL: [Self; 3] = [Self::Rpm, Self::Ccm, Self::Pcm];

    /// Short program code as used on statements
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Rpm => "RPM",
            Self::Ccm => "CCM",
            Self::Pcm => "PCM",
        }
    }

    /// Get the display name for this program
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Rpm => "Remote Patient Monitoring",
            Self::Ccm => "Chronic Care Management",
            Self::Pcm => "Principal Care Management",
        }
    }

    /// CCM and PCM are both care-management programs and exclude each other
    #[must_use]
    pub const fn is_care_management(self) -> bool {
        matches!(self, Self::Ccm | Self::Pcm)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Program {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RPM" => Ok(Self::Rpm),
            "CCM" => Ok(Self::Ccm),
            "PCM" => Ok(Self::Pcm),
            _ => Err(CareError::InvalidProgram {
                value: s.to_string(),
            }),
        }
    }
}

/// The care-management half of an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CareManagement {
    Ccm,
    Pcm,
}

impl From<CareManagement> for Program {
    fn from(value: CareManagement) -> Self {
        match value {
            CareManagement::Ccm => Self::Ccm,
            CareManagement::Pcm => Self::Pcm,
        }
    }
}

/// A validated program enrollment.
///
/// The shape only admits RPM alone, one of CCM/PCM, or RPM with one of them,
/// so a CCM+PCM enrollment cannot be represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    /// Enrolled in Remote Patient Monitoring
    pub rpm: bool,
    /// Enrolled care-management program, if any
    pub care_management: Option<CareManagement>,
}

impl Enrollment {
    /// Build an enrollment from already-parsed programs.
    ///
    /// Duplicates collapse. CCM together with PCM is rejected, never corrected.
    pub fn from_programs(programs: &[Program]) -> Result<Self> {
        let mut enrollment = Self::default();
        for program in programs {
            match program {
                Program::Rpm => enrollment.rpm = true,
                Program::Ccm | Program::Pcm => {
                    let requested = if *program == Program::Ccm {
                        CareManagement::Ccm
                    } else {
                        CareManagement::Pcm
                    };
                    match enrollment.care_management {
                        Some(existing) if existing != requested => {
                            return Err(ValidationError::ConflictingPrograms.into());
                        }
                        _ => enrollment.care_management = Some(requested),
                    }
                }
            }
        }
        Ok(enrollment)
    }

    /// Enrolled programs in canonical order
    #[must_use]
    pub fn programs(&self) -> ProgramList {
        let mut programs = ProgramList::new();
        if self.rpm {
            programs.push(Program::Rpm);
        }
        if let Some(cm) = self.care_management {
            programs.push(cm.into());
        }
        programs
    }

    /// Whether `program` is part of this enrollment
    #[must_use]
    pub fn contains(&self, program: Program) -> bool {
        self.programs().contains(&program)
    }

    /// Whether adding `program` keeps the enrollment valid
    #[must_use]
    pub fn admits(&self, program: Program) -> bool {
        match (program, self.care_management) {
            (Program::Rpm, _) | (_, None) => true,
            (other, Some(existing)) => Program::from(existing) == other,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.rpm && self.care_management.is_none()
    }
}

/// Parse raw program identifiers and validate them as one enrollment.
///
/// Unknown identifiers fail with [`CareError::InvalidProgram`]; CCM with PCM
/// fails with [`ValidationError::ConflictingPrograms`].
pub fn validate_enrollment<S: AsRef<str>>(programs: &[S]) -> Result<Enrollment> {
    let parsed = programs
        .iter()
        .map(|p| p.as_ref().parse::<Program>())
        .collect::<Result<Vec<_>>>()?;
    Enrollment::from_programs(&parsed)
}
