//! Logging utilities
//!
//! Thin helpers over the `log` facade so every component reports
//! operations in the same format. The host application picks the logger.

pub mod log;

pub use self::log::{log_operation_complete, log_operation_start, log_warning};
