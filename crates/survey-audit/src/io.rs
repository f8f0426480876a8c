//! File system boundary: loading the survey export and persisting artifacts.

use crate::config::AuditConfig;
use crate::error::{AuditError, Result, ResultExt};
use crate::pipeline::AuditResult;
use crate::reporting::{ToFrame, frame_to_csv};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load a survey CSV with every column read as text.
///
/// Fails with [`AuditError::InputNotFound`] when `path` does not exist.
/// Malformed quoting is retried without quote handling and then on cleaned
/// content.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AuditError::InputNotFound(path.to_path_buf()));
    }

    // Strategy 1: standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    // Strategy 3: pre-clean content
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read {}", path.display()))?;
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(clean_csv_content(&content)))
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;
    Ok(df)
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `bytes` to `path`, creating parent directories. Existing files are
/// overwritten.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, bytes).context(format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Write every artifact of `result` to the locations in `config`.
///
/// Returns the file map, with one `figure:<name>` entry per chart written.
pub fn persist(result: &AuditResult, config: &AuditConfig) -> Result<BTreeMap<String, String>> {
    let mut files = config.file_map();

    let mut processed = result.frame.clone();
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut processed)
        .context("Failed to encode processed dataset")?;
    write_bytes(&config.processed_path, &buf)?;

    write_bytes(
        &config.taxonomy_mapping_path(),
        &frame_to_csv(&result.taxonomy.mapping.to_frame()?)?,
    )?;
    write_bytes(
        &config.grouped_stats_path(),
        &frame_to_csv(&result.grouped_stats.to_frame()?)?,
    )?;
    write_bytes(
        &config.bias_matrix_path(),
        &frame_to_csv(&result.bias_findings.to_frame()?)?,
    )?;
    write_bytes(
        &config.summary_path(),
        result.summary.to_json_pretty()?.as_bytes(),
    )?;
    write_bytes(&config.report_path, result.report.as_bytes())?;

    std::fs::create_dir_all(&config.figures_dir)
        .context(format!("Failed to create {}", config.figures_dir.display()))?;
    for chart in &result.charts {
        let path: PathBuf = config.figure_path(&chart.file_name);
        write_bytes(&path, chart.svg.as_bytes())?;
        files.insert(
            format!("figure:{}", chart.file_name),
            path.to_string_lossy().into_owned(),
        );
    }

    info!(
        "Persisted audit outputs to {} ({} charts)",
        config.output_dir.display(),
        result.charts.len()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv("definitely/not/here.csv").unwrap_err();
        assert!(err.is_input_missing());
        assert_eq!(err.error_code(), "INPUT_NOT_FOUND");
        assert_eq!(err.to_string(), "Input not found: definitely/not/here.csv");
    }

    #[test]
    fn test_read_csv_keeps_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        std::fs::write(&path, "Age,Pressure\n18-21,4\n22-25,\n").unwrap();

        let df = read_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Pressure").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Pressure").unwrap().null_count(), 1);
    }

    #[test]
    fn test_clean_csv_content() {
        assert_eq!(clean_csv_content("a,b\n\n\"\"x\"\",1\n"), "a,b\n\"x\",1");
    }

    #[test]
    fn test_write_bytes_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/file.txt");
        write_bytes(&path, b"first").unwrap();
        write_bytes(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }
}
