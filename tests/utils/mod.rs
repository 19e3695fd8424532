//! Shared fixtures for the engine tests

use chrono::NaiveDate;
use chronic_care_engine::models::task::ProgramTask;
use chronic_care_engine::{
    BillingPeriod, Cadence, DeviceAlert, Diagnosis, DiagnosisStatus, Priority, Task, TaskStatus,
};

/// Initialise `env_logger` once for the test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// March 2024, the period most tests bill
#[must_use]
pub fn march_2024() -> BillingPeriod {
    BillingPeriod::month(2024, 3).unwrap()
}

#[must_use]
pub fn active(description: &str, code: &str) -> Diagnosis {
    Diagnosis::new(code, description, DiagnosisStatus::Active)
}

/// A completed CCM/PCM task taking `minutes` on `due`
#[must_use]
pub fn completed_task(id: &str, program: ProgramTask, due: NaiveDate, minutes: u32) -> Task {
    Task {
        id: id.to_string(),
        patient_id: "patient-1".to_string(),
        program,
        title: "Care coordination".to_string(),
        description: "Coordination call".to_string(),
        cadence: Cadence::BiWeekly,
        priority: Priority::Medium,
        duration_minutes: minutes,
        due_date: due,
        status: TaskStatus::Completed,
        billing_code: "99490".to_string(),
    }
}

/// A reviewed device alert for `day` of March 2024
#[must_use]
pub fn reviewed_alert(id: &str, day: u32) -> DeviceAlert {
    DeviceAlert {
        id: id.to_string(),
        patient_id: "patient-1".to_string(),
        reading_date: date(2024, 3, day),
        title: "Blood pressure reading".to_string(),
        description: "Out-of-range systolic value".to_string(),
        duration_minutes: 2,
        reviewed: true,
    }
}
