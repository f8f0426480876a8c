//! Type coercion for canonical columns.
//!
//! Failures never drop rows: an unparseable value becomes a missing value.

use crate::error::Result;
use crate::types::CanonicalField;
use crate::utils::{column_strings, datetime_series, parse_numeric_string, parse_timestamp};
use polars::prelude::*;
use tracing::debug;

/// Derived column holding parsed timestamps.
pub const TIMESTAMP_PARSED: &str = "timestamp_parsed";
/// Derived column holding numeric academic pressure.
pub const PRESSURE_NUM: &str = "academic_pressure_num";

/// Canonical fields kept as trimmed text.
const TEXT_FIELDS: [CanonicalField; 6] = [
    CanonicalField::AgeGroup,
    CanonicalField::Gender,
    CanonicalField::EducationLevel,
    CanonicalField::StressFrequency,
    CanonicalField::SleepHours,
    CanonicalField::StressCause,
];

/// Coerce canonical columns to their analysis types.
///
/// - `timestamp` → `timestamp_parsed` (`Datetime[ms]`)
/// - `academic_pressure` → `academic_pressure_num` (`Float64`)
/// - remaining canonical text fields → trimmed `String`
pub fn coerce_types(df: DataFrame) -> Result<DataFrame> {
    let mut df = df;

    if let Some(raw) = column_strings(&df, CanonicalField::Timestamp.name())? {
        let parsed: Vec<_> = raw
            .iter()
            .map(|v| v.as_deref().and_then(parse_timestamp))
            .collect();
        let failed = parsed.iter().filter(|v| v.is_none()).count();
        debug!("Parsed timestamps: {} ok, {} missing", parsed.len() - failed, failed);
        df.with_column(datetime_series(TIMESTAMP_PARSED, &parsed)?)?;
    }

    if let Some(raw) = column_strings(&df, CanonicalField::AcademicPressure.name())? {
        let numeric: Vec<Option<f64>> = raw
            .iter()
            .map(|v| v.as_deref().and_then(parse_numeric_string))
            .collect();
        df.with_column(Series::new(PRESSURE_NUM.into(), numeric))?;
    }

    for field in TEXT_FIELDS {
        if let Some(raw) = column_strings(&df, field.name())? {
            let trimmed: Vec<Option<String>> = raw
                .into_iter()
                .map(|v| v.map(|s| s.trim().to_string()))
                .collect();
            df.with_column(Series::new(field.name().into(), trimmed))?;
        }
    }

    Ok(df)
}
