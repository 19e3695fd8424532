//! Engine components
//!
//! Each component is a stateless function over its arguments and a shared,
//! read-only [`RulesConfig`](crate::config::RulesConfig):
//! eligibility classification, task generation, compliance aggregation and
//! billing, plus the pipeline chaining them per patient.

pub mod billing;
pub mod compliance;
pub mod eligibility;
pub mod pipeline;
pub mod tasks;
