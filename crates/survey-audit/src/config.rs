//! Configuration types for the survey audit pipeline.
//!
//! Output locations and presentation options are configurable through the
//! builder. The analytical policy (imbalance tiers, burst-window threshold,
//! allowed answer sets) is fixed and lives next to the code that applies it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name of the machine-readable summary inside `output_dir`.
pub const SUMMARY_FILE: &str = "audit_summary.json";
/// File name of the deduplicated taxonomy lookup table inside `output_dir`.
pub const TAXONOMY_MAPPING_FILE: &str = "taxonomy_mapping.csv";
/// File name of the grouped pressure statistics inside `output_dir`.
pub const GROUPED_STATS_FILE: &str = "grouped_stats.csv";
/// File name of the bias risk matrix inside `output_dir`.
pub const BIAS_MATRIX_FILE: &str = "bias_risk_matrix.csv";

/// Configuration for the audit pipeline.
///
/// Use [`AuditConfig::builder()`] to create a configuration with the fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use survey_audit::config::AuditConfig;
///
/// let config = AuditConfig::builder()
///     .output_dir("outputs")
///     .report_path("reports/audit_report.md")
///     .render_charts(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Directory for the summary JSON and the CSV tables.
    /// Default: "outputs"
    pub output_dir: PathBuf,

    /// Path of the rendered Markdown report.
    /// Default: "reports/audit_report.md"
    pub report_path: PathBuf,

    /// Directory for chart images.
    /// Default: "reports/figures"
    pub figures_dir: PathBuf,

    /// Path of the canonical, type-coerced copy of the input.
    /// Default: "data/processed/processed_survey.csv"
    pub processed_path: PathBuf,

    /// Canonical field holding the free-text answers to classify.
    /// Default: "stress_cause"
    pub text_column: String,

    /// Whether to draw charts.
    /// Default: true
    pub render_charts: bool,

    /// Maximum rows shown per table in the Markdown report.
    /// Default: 50
    pub report_max_rows: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            report_path: PathBuf::from("reports/audit_report.md"),
            figures_dir: PathBuf::from("reports/figures"),
            processed_path: PathBuf::from("data/processed/processed_survey.csv"),
            text_column: "stress_cause".to_string(),
            render_charts: true,
            report_max_rows: 50,
        }
    }
}

impl AuditConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.report_max_rows == 0 {
            return Err(ConfigValidationError::InvalidReportRows(self.report_max_rows));
        }

        if self.text_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTextColumn);
        }

        Ok(())
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE)
    }

    pub fn taxonomy_mapping_path(&self) -> PathBuf {
        self.output_dir.join(TAXONOMY_MAPPING_FILE)
    }

    pub fn grouped_stats_path(&self) -> PathBuf {
        self.output_dir.join(GROUPED_STATS_FILE)
    }

    pub fn bias_matrix_path(&self) -> PathBuf {
        self.output_dir.join(BIAS_MATRIX_FILE)
    }

    /// Path of a chart file inside `figures_dir`.
    pub fn figure_path(&self, file_name: &str) -> PathBuf {
        self.figures_dir.join(file_name)
    }

    /// The file map embedded in the summary, keyed by artifact name.
    pub fn file_map(&self) -> BTreeMap<String, String> {
        let display = |p: &Path| p.to_string_lossy().into_owned();
        BTreeMap::from([
            ("processed_csv".to_string(), display(&self.processed_path)),
            ("audit_summary".to_string(), display(&self.summary_path())),
            ("taxonomy_mapping".to_string(), display(&self.taxonomy_mapping_path())),
            ("grouped_stats".to_string(), display(&self.grouped_stats_path())),
            ("bias_risk_matrix".to_string(), display(&self.bias_matrix_path())),
            ("report".to_string(), display(&self.report_path)),
            ("figures_dir".to_string(), display(&self.figures_dir)),
        ])
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid report row limit: {0} (must be at least 1)")]
    InvalidReportRows(usize),

    #[error("Text column name must not be empty")]
    EmptyTextColumn,
}

/// Builder for [`AuditConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AuditConfigBuilder {
    output_dir: Option<PathBuf>,
    report_path: Option<PathBuf>,
    figures_dir: Option<PathBuf>,
    processed_path: Option<PathBuf>,
    text_column: Option<String>,
    render_charts: Option<bool>,
    report_max_rows: Option<usize>,
}

impl AuditConfigBuilder {
    /// Set the directory for the summary JSON and CSV tables.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the path of the Markdown report.
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Set the directory for chart images.
    pub fn figures_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.figures_dir = Some(path.into());
        self
    }

    /// Set the path of the processed dataset export.
    pub fn processed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.processed_path = Some(path.into());
        self
    }

    /// Set the canonical field whose free text is classified.
    pub fn text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = Some(column.into());
        self
    }

    /// Enable or disable chart rendering.
    pub fn render_charts(mut self, render: bool) -> Self {
        self.render_charts = Some(render);
        self
    }

    /// Set the maximum rows per Markdown table.
    pub fn report_max_rows(mut self, rows: usize) -> Self {
        self.report_max_rows = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AuditConfig` or an error if validation fails.
    pub fn build(self) -> Result<AuditConfig, ConfigValidationError> {
        let defaults = AuditConfig::default();
        let config = AuditConfig {
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            report_path: self.report_path.unwrap_or(defaults.report_path),
            figures_dir: self.figures_dir.unwrap_or(defaults.figures_dir),
            processed_path: self.processed_path.unwrap_or(defaults.processed_path),
            text_column: self.text_column.unwrap_or(defaults.text_column),
            render_charts: self.render_charts.unwrap_or(defaults.render_charts),
            report_max_rows: self.report_max_rows.unwrap_or(defaults.report_max_rows),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuditConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.report_path, PathBuf::from("reports/audit_report.md"));
        assert_eq!(config.text_column, "stress_cause");
        assert_eq!(config.report_max_rows, 50);
        assert!(config.render_charts);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AuditConfig::builder()
            .output_dir("out")
            .figures_dir("figs")
            .render_charts(false)
            .report_max_rows(10)
            .build()
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.figures_dir, PathBuf::from("figs"));
        assert!(!config.render_charts);
        assert_eq!(config.report_max_rows, 10);
        // untouched fields keep their defaults
        assert_eq!(config.text_column, "stress_cause");
    }

    #[test]
    fn test_validation_zero_report_rows() {
        let result = AuditConfig::builder().report_max_rows(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidReportRows(0)
        ));
    }

    #[test]
    fn test_validation_empty_text_column() {
        let result = AuditConfig::builder().text_column("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyTextColumn
        ));
    }

    #[test]
    fn test_file_map_uses_output_dir() {
        let config = AuditConfig::builder().output_dir("results").build().unwrap();
        let files = config.file_map();

        assert_eq!(
            files.get("taxonomy_mapping").map(String::as_str),
            Some(Path::new("results").join("taxonomy_mapping.csv").to_str().unwrap())
        );
        assert!(files.contains_key("processed_csv"));
        assert!(files.contains_key("bias_risk_matrix"));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "output_dir": "o",
            "report_path": "r.md",
            "figures_dir": "f",
            "processed_path": "p.csv",
            "text_column": "stress_cause",
            "render_charts": false,
            "report_max_rows": 5
        }"#;

        let config: AuditConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.report_path, PathBuf::from("r.md"));
        assert!(!config.render_charts);
        assert_eq!(config.report_max_rows, 5);
    }
}
