//! Care task model
//!
//! Tasks are created by the generator (or merged in from device alerts),
//! mutated by external task-completion workflows and read back for
//! compliance aggregation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::program::Program;

/// How often a templated task recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Created once at enrollment, never regenerated
    OneTime,
    Weekly,
    BiWeekly,
    Monthly,
    /// Raised by a device reading; never produced from a template
    Event,
}

impl Cadence {
    /// Days between occurrences inside a period, `None` for single occurrences
    #[must_use]
    pub const fn interval_days(self) -> Option<u32> {
        match self {
            Self::Weekly => Some(7),
            Self::BiWeekly => Some(14),
            Self::OneTime | Self::Monthly | Self::Event => None,
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Task workflow state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Program-specific part of a task, tagged by `programType`.
///
/// Only RPM tasks can be device-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "programType")]
pub enum ProgramTask {
    #[serde(rename = "RPM", rename_all = "camelCase")]
    Rpm { device_triggered: bool },
    #[serde(rename = "CCM")]
    Ccm,
    #[serde(rename = "PCM")]
    Pcm,
}

impl ProgramTask {
    /// Program-specific part for a templated (non-device) task
    #[must_use]
    pub const fn scheduled(program: Program) -> Self {
        match program {
            Program::Rpm => Self::Rpm {
                device_triggered: false,
            },
            Program::Ccm => Self::Ccm,
            Program::Pcm => Self::Pcm,
        }
    }

    #[must_use]
    pub const fn program(self) -> Program {
        match self {
            Self::Rpm { .. } => Program::Rpm,
            Self::Ccm => Program::Ccm,
            Self::Pcm => Program::Pcm,
        }
    }
}

/// A single care task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier, unique per patient/program/template occurrence
    pub id: String,
    pub patient_id: String,
    #[serde(flatten)]
    pub program: ProgramTask,
    pub title: String,
    pub description: String,
    pub cadence: Cadence,
    pub priority: Priority,
    /// Expected duration when pending, actual duration once completed
    pub duration_minutes: u32,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    /// CPT code the task's time contributes to
    pub billing_code: String,
}

impl Task {
    #[must_use]
    pub const fn program_type(&self) -> Program {
        self.program.program()
    }

    #[must_use]
    pub const fn is_device_triggered(&self) -> bool {
        matches!(
            self.program,
            ProgramTask::Rpm {
                device_triggered: true
            }
        )
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Mark the task as started
    pub fn start(&mut self) {
        if self.status == TaskStatus::Pending {
            self.status = TaskStatus::InProgress;
        }
    }

    /// Mark the task completed with the minutes actually spent
    pub fn complete(&mut self, minutes: u32) {
        self.status = TaskStatus::Completed;
        self.duration_minutes = minutes;
    }
}

/// A device reading alert raised by the telemetry-ingestion collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAlert {
    pub id: String,
    pub patient_id: String,
    /// Calendar day the reading was taken
    pub reading_date: NaiveDate,
    pub title: String,
    pub description: String,
    /// Minutes spent reviewing the reading, zero until reviewed
    #[serde(default)]
    pub duration_minutes: u32,
    /// Whether the reading has already been reviewed
    #[serde(default)]
    pub reviewed: bool,
}
