//! Task templates per program
//!
//! Each program has a generic template set and optional keyword-specific
//! variants. A variant replaces the generic set when one of its keywords
//! appears in the patient's diagnosis keywords.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::program::Program;
use crate::models::task::{Cadence, Priority};

/// Blueprint for one recurring task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    /// Stable key, part of every generated task id
    pub key: String,
    pub title: String,
    pub description: String,
    pub cadence: Cadence,
    pub priority: Priority,
    pub duration_minutes: u32,
    pub billing_code: String,
    /// Days after the period start of the first occurrence
    #[serde(default)]
    pub day_offset: u32,
}

impl TaskTemplate {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        key: &str,
        title: &str,
        description: &str,
        cadence: Cadence,
        priority: Priority,
        duration_minutes: u32,
        billing_code: &str,
        day_offset: u32,
    ) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            cadence,
            priority,
            duration_minutes,
            billing_code: billing_code.to_string(),
            day_offset,
        }
    }
}

/// Keyword-specific replacement for a program's generic templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariant {
    pub name: String,
    /// Matched case-insensitively as substrings of diagnosis keywords
    pub keywords: Vec<String>,
    pub tasks: Vec<TaskTemplate>,
}

impl TemplateVariant {
    /// Whether any diagnosis keyword mentions one of this variant's keywords
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, diagnosis_keywords: &[S]) -> bool {
        diagnosis_keywords.iter().any(|dk| {
            let dk = dk.as_ref().to_lowercase();
            self.keywords
                .iter()
                .any(|k| !k.trim().is_empty() && dk.contains(&k.to_lowercase()))
        })
    }
}

/// Templates for one program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSet {
    pub generic: Vec<TaskTemplate>,
    #[serde(default)]
    pub variants: Vec<TemplateVariant>,
}

impl TemplateSet {
    /// First matching variant, falling back to the generic templates.
    /// Returns the variant name alongside the templates.
    #[must_use]
    pub fn select<S: AsRef<str>>(&self, diagnosis_keywords: &[S]) -> (&str, &[TaskTemplate]) {
        self.variants
            .iter()
            .find(|variant| variant.matches(diagnosis_keywords))
            .map_or(("generic", self.generic.as_slice()), |variant| {
                (variant.name.as_str(), variant.tasks.as_slice())
            })
    }
}

/// All task templates, keyed by program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCatalog(pub BTreeMap<Program, TemplateSet>);

impl TemplateCatalog {
    #[must_use]
    pub fn get(&self, program: Program) -> Option<&TemplateSet> {
        self.0.get(&program)
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        let mut catalog = BTreeMap::new();
        catalog.insert(Program::Rpm, rpm_templates());
        catalog.insert(Program::Ccm, ccm_templates());
        catalog.insert(Program::Pcm, pcm_templates());
        Self(catalog)
    }
}

fn rpm_templates() -> TemplateSet {
    TemplateSet {
        generic: vec![
            TaskTemplate::new(
                "device-setup",
                "Device setup and patient education",
                "Set up the monitoring device and teach the patient how to take readings",
                Cadence::OneTime,
                Priority::Medium,
                30,
                "99453",
                0,
            ),
            TaskTemplate::new(
                "readings-check-in",
                "Weekly readings check-in",
                "Confirm readings are transmitting and follow up on missed days",
                Cadence::Weekly,
                Priority::Medium,
                10,
                "99458",
                2,
            ),
            TaskTemplate::new(
                "monthly-data-review",
                "Monthly RPM data review",
                "Review the month's readings and discuss trends with the patient",
                Cadence::Monthly,
                Priority::High,
                20,
                "99457",
                20,
            ),
        ],
        variants: Vec::new(),
    }
}

fn ccm_templates() -> TemplateSet {
    TemplateSet {
        generic: vec![
            TaskTemplate::new(
                "care-plan",
                "Comprehensive care plan",
                "Create the comprehensive care plan covering all chronic conditions",
                Cadence::OneTime,
                Priority::High,
                45,
                "99491",
                0,
            ),
            TaskTemplate::new(
                "patient-outreach",
                "Patient outreach call",
                "Check symptoms, adherence and upcoming appointments",
                Cadence::BiWeekly,
                Priority::Medium,
                10,
                "99439",
                1,
            ),
            TaskTemplate::new(
                "care-plan-review",
                "Monthly care plan review",
                "Review goals and update the care plan",
                Cadence::Monthly,
                Priority::High,
                20,
                "99490",
                4,
            ),
            TaskTemplate::new(
                "medication-reconciliation",
                "Medication reconciliation",
                "Reconcile the medication list across prescribers",
                Cadence::Monthly,
                Priority::Medium,
                15,
                "99490",
                9,
            ),
        ],
        variants: Vec::new(),
    }
}

fn pcm_templates() -> TemplateSet {
    let care_plan = TaskTemplate::new(
        "care-plan",
        "Disease-specific care plan",
        "Create the care plan for the principal high-risk condition",
        Cadence::OneTime,
        Priority::High,
        30,
        "99424",
        0,
    );

    TemplateSet {
        generic: vec![
            care_plan.clone(),
            TaskTemplate::new(
                "symptom-monitoring",
                "Symptom monitoring call",
                "Follow up on symptoms of the principal condition",
                Cadence::BiWeekly,
                Priority::Medium,
                15,
                "99427",
                1,
            ),
            TaskTemplate::new(
                "disease-management-review",
                "Monthly disease management review",
                "Review condition status, labs and treatment response",
                Cadence::Monthly,
                Priority::High,
                30,
                "99426",
                4,
            ),
            TaskTemplate::new(
                "condition-education",
                "Condition education",
                "Self-management education for the principal condition",
                Cadence::Monthly,
                Priority::Low,
                10,
                "99427",
                14,
            ),
        ],
        variants: vec![TemplateVariant {
            name: "heart-failure".to_string(),
            keywords: vec![
                "heart failure".to_string(),
                "chf".to_string(),
                "cardiomyopathy".to_string(),
            ],
            tasks: vec![
                care_plan,
                TaskTemplate::new(
                    "hf-weight-review",
                    "Weight log review",
                    "Review daily weights for rapid gain and escalate fluid retention",
                    Cadence::Weekly,
                    Priority::High,
                    10,
                    "99427",
                    0,
                ),
                TaskTemplate::new(
                    "hf-medication-review",
                    "Diuretic and GDMT medication review",
                    "Review diuretic dosing and guideline-directed therapy",
                    Cadence::Monthly,
                    Priority::High,
                    30,
                    "99426",
                    3,
                ),
                TaskTemplate::new(
                    "hf-fluid-education",
                    "Fluid and sodium restriction education",
                    "Reinforce fluid and sodium limits and warning signs",
                    Cadence::Monthly,
                    Priority::Medium,
                    15,
                    "99427",
                    7,
                ),
            ],
        }],
    }
}
