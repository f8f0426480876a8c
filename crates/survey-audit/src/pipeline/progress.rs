//! Progress reporting for the audit pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_audit::AuditPipeline;
//!
//! let result = AuditPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of an audit run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStage {
    /// Pipeline is starting
    Initializing,
    /// Matching input headers to the canonical schema
    SchemaNormalization,
    /// Parsing timestamps and numeric answers
    Coercion,
    /// Shape, completeness and subgroup counts
    Profiling,
    /// Range, enum and parse-rate checks
    ValidityChecks,
    /// Demographic imbalance and time-window coverage
    Imbalance,
    /// Building the bias risk matrix
    BiasScoring,
    /// Classifying free-text answers
    Taxonomy,
    /// Drawing SVG charts
    ChartRendering,
    /// Rendering the markdown report and summary
    ReportAssembly,
    /// Audit completed successfully
    Complete,
    /// Audit failed with an error
    Failed,
}

impl AuditStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::SchemaNormalization => "Normalizing Schema",
            Self::Coercion => "Coercing Types",
            Self::Profiling => "Profiling Dataset",
            Self::ValidityChecks => "Checking Validity",
            Self::Imbalance => "Measuring Imbalance",
            Self::BiasScoring => "Scoring Bias Risks",
            Self::Taxonomy => "Classifying Text",
            Self::ChartRendering => "Rendering Charts",
            Self::ReportAssembly => "Assembling Report",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run spent in this stage. Sums to 1.0 over the
    /// working stages.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.02,
            Self::SchemaNormalization => 0.08,
            Self::Coercion => 0.08,
            Self::Profiling => 0.10,
            Self::ValidityChecks => 0.07,
            Self::Imbalance => 0.10,
            Self::BiasScoring => 0.10,
            Self::Taxonomy => 0.15,
            Self::ChartRendering => 0.20,
            Self::ReportAssembly => 0.10,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::SchemaNormalization => 0.02,
            Self::Coercion => 0.10,
            Self::Profiling => 0.18,
            Self::ValidityChecks => 0.28,
            Self::Imbalance => 0.35,
            Self::BiasScoring => 0.45,
            Self::Taxonomy => 0.55,
            Self::ChartRendering => 0.70,
            Self::ReportAssembly => 0.90,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A progress update emitted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: AuditStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: AuditStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: AuditStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: AuditStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates during an audit run.
///
/// Implementations must be `Send + Sync` so a front end can run the audit on a
/// background thread.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
