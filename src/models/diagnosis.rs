//! Diagnosis entity model
//!
//! Diagnoses are supplied by patient-record storage and are read-only to the
//! engine. They drive program eligibility through their descriptions and are
//! deduplicated by their ICD-10 code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CareError, Result, ValidationError};

/// Clinical status of a diagnosis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisStatus {
    Active,
    Resolved,
    Chronic,
    Inactive,
}

impl DiagnosisStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
            Self::Chronic => "chronic",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for DiagnosisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosisStatus {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            "chronic" => Ok(Self::Chronic),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ValidationError::UnknownDiagnosisStatus {
                status: s.to_string(),
            }
            .into()),
        }
    }
}

/// Representation of a patient diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    /// ICD-10 diagnosis code
    pub code: String,
    /// Free-text description, matched against program keyword sets
    pub description: String,
    /// Clinical status
    pub status: DiagnosisStatus,
}

impl Diagnosis {
    /// Create a new diagnosis
    #[must_use]
    pub fn new(code: impl Into<String>, description: impl Into<String>, status: DiagnosisStatus) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            status,
        }
    }

    /// Create a diagnosis from raw record fields, parsing the status string
    pub fn from_record(description: &str, code: &str, status: &str) -> Result<Self> {
        Ok(Self::new(code, description, status.parse()?))
    }

    /// Code normalized for deduplication (trimmed, uppercase)
    #[must_use]
    pub fn normalized_code(&self) -> String {
        self.code.trim().to_uppercase()
    }

    /// Check the record shape. `index` is the position in the caller's list.
    pub fn validate(&self, index: usize) -> Result<()> {
        let code = self.normalized_code();
        if code.is_empty() {
            return Err(ValidationError::EmptyDiagnosisCode { index }.into());
        }
        if !is_icd10_code(&code) {
            return Err(ValidationError::MalformedDiagnosisCode { code }.into());
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDiagnosisDescription { code }.into());
        }
        Ok(())
    }

    /// Case-insensitive substring match of the description against `keyword`
    #[must_use]
    pub fn mentions(&self, keyword: &str) -> bool {
        self.description
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    }
}

/// Check the ICD-10 shape: a letter, two digits, then an optional dot
/// followed by up to four alphanumerics (e.g. `I10`, `E11.9`, `I50.32`).
#[must_use]
pub fn is_icd10_code(code: &str) -> bool {
    let mut chars = code.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.next().is_some_and(|c| c.is_ascii_digit())
        && chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    if !head_ok {
        return false;
    }

    let rest: &str = chars.as_str();
    if rest.is_empty() {
        return true;
    }
    let suffix = rest.strip_prefix('.').unwrap_or(rest);
    !suffix.is_empty() && suffix.len() <= 4 && suffix.chars().all(|c| c.is_ascii_alphanumeric())
}
