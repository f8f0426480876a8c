//! Shared helpers for reading canonical columns and parsing raw values.
//!
//! Every reader returns `Ok(None)` when the column is absent so callers can
//! treat a missing canonical field as "skip", never as an error.

use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashMap;

/// Category label used for missing values in distributions and groupings.
pub const MISSING_LABEL: &str = "(missing)";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static TZ_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(gmt|utc)([+-]\d{1,2}(:?\d{2})?)?$").expect("valid regex"));

const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

// =============================================================================
// String Utilities
// =============================================================================

/// Collapse runs of whitespace into a single space.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").into_owned()
}

/// Parse a numeric answer. Returns `None` for blanks, words and non-finite values.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a timestamp in one of the common survey-export layouts.
///
/// A trailing `GMT`/`UTC` offset (as written by form tools) is ignored and the
/// wall-clock time is kept. Unrecognized input yields `None`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    let cleaned = TZ_SUFFIX.replace(trimmed, "");
    let cleaned = cleaned.trim().trim_end_matches('Z');

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// =============================================================================
// Column Readers
// =============================================================================

/// Check whether a column exists.
#[inline]
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Read a column as optional strings, casting non-string dtypes.
pub fn column_strings(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    if !has_column(df, name) {
        return Ok(None);
    }
    let series = df.column(name)?.as_materialized_series().cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(Some(values))
}

/// Read a numeric column as optional `f64`. NaN is reported as missing.
pub fn column_f64(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    if !has_column(df, name) {
        return Ok(None);
    }
    let series = df.column(name)?.as_materialized_series().cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(Some(values))
}

/// Read a millisecond `Datetime` column as optional naive timestamps.
pub fn column_datetimes(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<NaiveDateTime>>>> {
    if !has_column(df, name) {
        return Ok(None);
    }
    let series = df.column(name)?.as_materialized_series().cast(&DataType::Int64)?;
    let values = series
        .i64()?
        .into_iter()
        .map(|v| v.and_then(DateTime::from_timestamp_millis).map(|dt| dt.naive_utc()))
        .collect();
    Ok(Some(values))
}

/// Build a millisecond `Datetime` series from optional timestamps.
pub fn datetime_series(name: &str, values: &[Option<NaiveDateTime>]) -> Result<Series> {
    let millis: Vec<Option<i64>> = values
        .iter()
        .map(|v| v.map(|dt| dt.and_utc().timestamp_millis()))
        .collect();
    let series = Series::new(name.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(series)
}

// =============================================================================
// Distribution Utilities
// =============================================================================

/// Count values with missing as its own category.
///
/// Sorted by descending count, ties broken by label so output is stable.
pub fn value_counts(values: &[Option<String>]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        let key = value.as_deref().unwrap_or(MISSING_LABEL);
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Mean of a slice, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of a slice, `None` when empty. Even lengths average the middle pair.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    // ==================== parse_numeric_string tests ====================

    #[test]
    fn test_parse_numeric_string() {
        assert_eq!(parse_numeric_string(" 3 "), Some(3.0));
        assert_eq!(parse_numeric_string("4.5"), Some(4.5));
        assert_eq!(parse_numeric_string(""), None);
        assert_eq!(parse_numeric_string("high"), None);
        assert_eq!(parse_numeric_string("NaN"), None);
    }

    // ==================== parse_timestamp tests ====================

    #[test]
    fn test_parse_timestamp_iso() {
        let ts = parse_timestamp("2024-01-05 10:15:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_timestamp_form_export_with_offset() {
        let ts = parse_timestamp("2024/01/05 10:15:32 PM GMT+5:30").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(ts.hour(), 22);
    }

    #[test]
    fn test_parse_timestamp_rfc3339_keeps_wall_clock() {
        let ts = parse_timestamp("2024-01-05T23:30:00+05:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        let ts = parse_timestamp("1/5/2024").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("  "), None);
    }

    // ==================== value_counts tests ====================

    #[test]
    fn test_value_counts_includes_missing() {
        let values = vec![
            Some("a".to_string()),
            None,
            Some("a".to_string()),
            Some("b".to_string()),
        ];
        let counts = value_counts(&values);
        assert_eq!(counts[0], ("a".to_string(), 2));
        assert!(counts.contains(&(MISSING_LABEL.to_string(), 1)));
        assert_eq!(counts.iter().map(|(_, c)| c).sum::<usize>(), 4);
    }

    // ==================== mean/median tests ====================

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }

    // ==================== column reader tests ====================

    #[test]
    fn test_column_readers_absent_column() {
        let df = df!["a" => [1i64, 2]].unwrap();
        assert!(column_strings(&df, "missing").unwrap().is_none());
        assert!(column_f64(&df, "missing").unwrap().is_none());
    }

    #[test]
    fn test_column_strings_casts_numbers() {
        let df = df!["a" => [Some(1i64), None]].unwrap();
        let values = column_strings(&df, "a").unwrap().unwrap();
        assert_eq!(values, vec![Some("1".to_string()), None]);
    }

    #[test]
    fn test_datetime_series_round_trip() {
        let ts = parse_timestamp("2024-01-05 08:00:00");
        let series = datetime_series("timestamp_parsed", &[ts, None]).unwrap();
        let df = DataFrame::new(vec![series.into()]).unwrap();
        let values = column_datetimes(&df, "timestamp_parsed").unwrap().unwrap();
        assert_eq!(values, vec![ts, None]);
    }
}
