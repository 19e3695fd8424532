//! Error handling for the chronic-care engine.
//!
//! Every component returns [`Result`]. Errors carry the offending program id,
//! diagnosis entry or period so callers can render their own messages.

use chrono::NaiveDate;

use crate::models::program::Program;

/// Malformed input detected before any computation takes place
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Diagnosis at `index` has a blank ICD-10 code
    #[error("diagnosis #{index} has an empty code")]
    EmptyDiagnosisCode { index: usize },

    /// Diagnosis has a blank description
    #[error("diagnosis {code} has an empty description")]
    EmptyDiagnosisDescription { code: String },

    /// Code does not look like an ICD-10 code
    #[error("diagnosis code '{code}' is not a valid ICD-10 code")]
    MalformedDiagnosisCode { code: String },

    /// Status string outside {active, resolved, chronic, inactive}
    #[error("unknown diagnosis status '{status}'")]
    UnknownDiagnosisStatus { status: String },

    /// CCM and PCM proposed together
    #[error("CCM and PCM cannot be enrolled at the same time")]
    ConflictingPrograms,

    /// Blank patient identifier
    #[error("patient id must not be empty")]
    EmptyPatientId,

    /// Period end is not after its start
    #[error("billing period end {end} must be after start {start}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    /// Year/month pair that is not a calendar month
    #[error("{year}-{month} is not a calendar month")]
    InvalidMonth { year: i32, month: u32 },

    /// Same task id appears more than once in an aggregation input
    #[error("task id '{id}' appears more than once")]
    DuplicateTaskId { id: String },

    /// More than one metrics snapshot for a single program
    #[error("more than one metrics entry for {program}")]
    DuplicateProgramMetrics { program: Program },

    /// Metrics passed to billing cover different periods
    #[error("metrics for {program} cover {start}..{end}, expected {expected_start}..{expected_end}")]
    MismatchedPeriods {
        program: Program,
        start: NaiveDate,
        end: NaiveDate,
        expected_start: NaiveDate,
        expected_end: NaiveDate,
    },

    /// Device alert carries no id
    #[error("device alert #{index} has an empty id")]
    EmptyAlertId { index: usize },

    /// Task or device alert that belongs to a different patient
    #[error("'{id}' belongs to patient '{found}', expected '{expected}'")]
    ForeignPatientEntry {
        id: String,
        found: String,
        expected: String,
    },
}

/// Specialized error type for the engine
#[derive(Debug, thiserror::Error)]
pub enum CareError {
    /// Malformed diagnosis, program, period or task input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Program identifier outside {RPM, CCM, PCM}
    #[error("Invalid program '{value}'")]
    InvalidProgram { value: String },

    /// Missing or inconsistent rule for a known program
    #[error("Configuration error for {program}: {reason}")]
    Configuration { program: Program, reason: String },

    /// Line items do not add up to the reported total
    #[error("Billing total {reported} does not match per-program sum {expected}")]
    BillingMismatch { reported: u64, expected: u64 },

    /// Amount overflowed while summing line items
    #[error("Billing total overflowed")]
    AmountOverflow,

    /// Rules file could not be parsed
    #[error("Rules configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rules file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CareError {
    /// Build a configuration error for `program`
    pub fn configuration(program: Program, reason: impl Into<String>) -> Self {
        Self::Configuration {
            program,
            reason: reason.into(),
        }
    }

    /// Whether the caller may skip the offending entry and continue
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::InvalidProgram { .. })
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, CareError>;
