//! Domain models
//!
//! Shapes consumed from and handed back to the surrounding application:
//! diagnoses and enrollments in, tasks, metrics and billing summaries out.

pub mod billing;
pub mod compliance;
pub mod diagnosis;
pub mod period;
pub mod program;
pub mod task;

pub use billing::{BillingLineItem, BillingSummary};
pub use compliance::{ComplianceMetrics, ComplianceStatus, Measure, ProgramMeasures};
pub use diagnosis::{Diagnosis, DiagnosisStatus};
pub use period::BillingPeriod;
pub use program::{CareManagement, Enrollment, Program, ProgramList, validate_enrollment};
pub use task::{Cadence, DeviceAlert, Priority, ProgramTask, Task, TaskStatus};
