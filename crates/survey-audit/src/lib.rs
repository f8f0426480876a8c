//! Survey Quality & Bias Audit Library
//!
//! Audits a tabular student survey export for coverage gaps, sampling bias and
//! measurement risk, and normalizes free-text answers into a fixed taxonomy.
//!
//! # Overview
//!
//! - **Schema Normalization**: Messy form headers are mapped onto canonical fields
//! - **Validity Checks**: Range, enum and timestamp parse-rate checks
//! - **Imbalance Analysis**: Max share, entropy and effective sample size per demographic
//! - **Bias Risk Scoring**: A fixed-order, human-auditable bias risk matrix
//! - **Text Taxonomy**: Deterministic keyword classification of stress causes
//! - **Reporting**: Markdown report, SVG charts, CSV tables and a JSON summary
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use survey_audit::{AuditConfig, AuditPipeline, io};
//!
//! let config = AuditConfig::builder()
//!     .output_dir("outputs")
//!     .report_path("reports/audit_report.md")
//!     .build()?;
//!
//! let df = io::read_csv("data/raw/survey.csv")?;
//! let result = AuditPipeline::builder()
//!     .config(config.clone())
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(df)?;
//!
//! io::persist(&result, &config)?;
//! for finding in &result.bias_findings {
//!     println!("{}: {}", finding.bias_type, finding.risk_level);
//! }
//! ```
//!
//! The analytical components never fail on messy data: unparseable values
//! become missing and absent fields skip or default their outputs. The only
//! fatal condition of a run is a missing input file.

pub mod config;
pub mod decisions;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod schema;
pub mod taxonomy;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{AuditConfig, AuditConfigBuilder, ConfigValidationError};
pub use decisions::{BiasInputs, BiasRiskScorer};
pub use error::{AuditError, ResultExt};
pub use pipeline::{
    AuditPipeline, AuditPipelineBuilder, AuditResult, AuditStage, ClosureProgressReporter,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::ImbalanceAnalyzer;
pub use quality::ValidityChecker;
pub use reporting::{ChartRenderer, RenderedChart, ReportAssembler};
pub use schema::SchemaNormalizer;
pub use taxonomy::{Taxonomy, TaxonomyClassifier};
pub use types::{
    AuditSummary, BiasFinding, BiasType, CanonicalField, GroupedStat, ImbalanceIndicator,
    ProfileStats, RiskLevel, SchemaMapping, TaxonomyCategory, TaxonomyCount, TaxonomyEntry,
    TimeWindowSummary, ValidityCheck,
};
