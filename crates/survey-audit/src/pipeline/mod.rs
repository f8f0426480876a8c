//! Pipeline module.
//!
//! This module provides the audit pipeline, its builder and progress reporting.

mod builder;
pub mod progress;

pub use builder::{AuditPipeline, AuditPipelineBuilder, AuditResult};
pub use progress::{AuditStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate};
