//! Program-eligibility and billing-compliance engine for chronic-care
//! programs (RPM, CCM, PCM).
//!
//! Data flows from diagnoses and enrollment through the eligibility
//! classifier, optionally the task generator, then the compliance aggregator
//! and finally the billing calculator. All thresholds, keyword sets, rate
//! tables and task templates come from a single [`RulesConfig`].

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{ProgramRules, RateTier, RulesConfig};
pub use error::{CareError, Result, ValidationError};

// Models
pub use models::{
    BillingLineItem, BillingPeriod, BillingSummary, Cadence, ComplianceMetrics, ComplianceStatus,
    DeviceAlert, Diagnosis, DiagnosisStatus, Enrollment, Priority, Program, Task, TaskStatus,
    validate_enrollment,
};

// Operations
pub use algorithm::billing::{calculate_billing, summarize};
pub use algorithm::compliance::{aggregate, aggregate_period};
pub use algorithm::eligibility::recommendation::Recommendation;
pub use algorithm::eligibility::{EligibilityResult, classify};
pub use algorithm::pipeline::{PatientOutcome, PatientRecord, evaluate_patient, evaluate_patients};
pub use algorithm::tasks::{GenerationReport, generate, merge_device_alerts, rollover};
