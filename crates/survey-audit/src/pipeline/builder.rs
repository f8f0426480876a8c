//! The audit pipeline and its builder.

use crate::config::{AuditConfig, ConfigValidationError};
use crate::decisions::{BiasInputs, BiasRiskScorer};
use crate::error::Result;
use crate::pipeline::progress::{
    AuditStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::{ImbalanceAnalyzer, grouped_pressure_stats, time_window_summary};
use crate::quality::{ValidityChecker, basic_profile, subgroup_counts};
use crate::reporting::{ChartRenderer, RenderedChart, ReportAssembler, ReportInputs, SummaryParts};
use crate::schema::{SchemaNormalizer, coerce_types};
use crate::taxonomy::{Taxonomy, TaxonomyClassifier};
use crate::types::{AuditSummary, BiasFinding, CanonicalField, GroupedStat};
use crate::utils::has_column;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Every artifact of one audit run, held in memory.
///
/// Schema metadata, profile, validity results, time window, imbalance
/// indicators and subgroup counts are carried by [`AuditSummary`]. Nothing
/// here has touched the file system; see [`crate::io::persist`].
#[derive(Debug, Clone)]
pub struct AuditResult {
    /// Canonical, coerced table (same row count as the input).
    pub frame: DataFrame,
    pub summary: AuditSummary,
    pub grouped_stats: Vec<GroupedStat>,
    pub bias_findings: Vec<BiasFinding>,
    pub taxonomy: Taxonomy,
    pub charts: Vec<RenderedChart>,
    /// Rendered markdown report.
    pub report: String,
}

/// The survey audit pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use survey_audit::{AuditConfig, AuditPipeline};
///
/// let result = AuditPipeline::builder()
///     .config(AuditConfig::builder().render_charts(false).build()?)
///     .on_progress(|update| println!("{}", update.stage.display_name()))
///     .build()?
///     .run(df)?;
///
/// println!("{} findings", result.bias_findings.len());
/// ```
pub struct AuditPipeline {
    config: AuditConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(AuditPipeline: Send);

impl AuditPipeline {
    pub fn builder() -> AuditPipelineBuilder {
        AuditPipelineBuilder::default()
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audit a raw survey table.
    pub fn run(&self, df: DataFrame) -> Result<AuditResult> {
        match self.run_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Audit completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Audit error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn start(&self, stage: AuditStage, message: &str) {
        info!("{}", message);
        self.report_progress(ProgressUpdate::new(stage, 0.0, message));
    }

    fn run_internal(&self, df: DataFrame) -> Result<AuditResult> {
        let start_time = Instant::now();
        self.start(AuditStage::Initializing, "Starting survey audit...");
        info!("Input has {} rows and {} columns", df.height(), df.width());

        self.start(AuditStage::SchemaNormalization, "Normalizing column names...");
        let (df, schema) = SchemaNormalizer::standardize(df)?;

        self.start(AuditStage::Coercion, "Parsing timestamps and numeric answers...");
        let df = coerce_types(df)?;

        self.start(AuditStage::Profiling, "Profiling dataset...");
        let profile = basic_profile(&df)?;
        let subgroups = subgroup_counts(&df)?;
        let grouped_stats = grouped_pressure_stats(&df)?;

        self.start(AuditStage::ValidityChecks, "Running validity checks...");
        let validity = ValidityChecker::run(&df)?;

        self.start(AuditStage::Imbalance, "Measuring imbalance and collection window...");
        let imbalance = ImbalanceAnalyzer::analyze(&df)?;
        let time_window = time_window_summary(&df)?;

        self.start(AuditStage::BiasScoring, "Scoring bias risks...");
        let demographics_present: Vec<CanonicalField> = CanonicalField::DEMOGRAPHIC
            .into_iter()
            .filter(|f| has_column(&df, f.name()))
            .collect();
        let bias_findings = BiasRiskScorer::score(&BiasInputs {
            time_window: &time_window,
            imbalance: &imbalance,
            demographics_present: &demographics_present,
        });

        self.start(AuditStage::Taxonomy, "Classifying free-text answers...");
        let taxonomy = TaxonomyClassifier::build(&df, &self.config.text_column)?;

        let charts = if self.config.render_charts {
            self.start(AuditStage::ChartRendering, "Rendering charts...");
            ChartRenderer::render_all(&df, &time_window, &taxonomy)?
        } else {
            info!("Skipping chart rendering (disabled)");
            Vec::new()
        };

        self.start(AuditStage::ReportAssembly, "Assembling report...");
        let taxonomy_mapping_file = self.config.taxonomy_mapping_path().display().to_string();
        let report = ReportAssembler::render(&ReportInputs {
            profile: &profile,
            time_window: &time_window,
            validity: &validity,
            bias_findings: &bias_findings,
            taxonomy_summary: &taxonomy.summary,
            taxonomy_mapping_file: &taxonomy_mapping_file,
            max_rows: self.config.report_max_rows,
        });

        let summary = AuditSummary::assemble(
            SummaryParts {
                schema,
                profile,
                time_window,
                imbalance_indicators: imbalance,
                subgroup_counts: subgroups,
                validity,
            },
            &self.config,
        );

        info!(
            "Audit finished in {} ms: {} findings, {} charts",
            start_time.elapsed().as_millis(),
            bias_findings.len(),
            charts.len()
        );

        Ok(AuditResult {
            frame: df,
            summary,
            grouped_stats,
            bias_findings,
            taxonomy,
            charts,
            report,
        })
    }
}

/// Builder for [`AuditPipeline`].
#[derive(Default)]
pub struct AuditPipelineBuilder {
    config: Option<AuditConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(AuditPipelineBuilder: Send);

impl AuditPipelineBuilder {
    pub fn config(mut self, config: AuditConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<AuditPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(AuditPipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
