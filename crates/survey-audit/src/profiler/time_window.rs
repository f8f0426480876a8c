//! Collection-window coverage from parsed timestamps.

use crate::error::Result;
use crate::schema::TIMESTAMP_PARSED;
use crate::types::TimeWindowSummary;
use crate::utils::column_datetimes;
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::collections::BTreeMap;

const NO_USABLE_TIMESTAMPS: &str = "no usable timestamps";

/// Summarize the `timestamp_parsed` column of a coerced table.
pub fn time_window_summary(df: &DataFrame) -> Result<TimeWindowSummary> {
    let values = column_datetimes(df, TIMESTAMP_PARSED)?;
    Ok(summarize_timestamps(values.as_deref()))
}

/// Summarize timestamps; `None` means the table has no timestamp column.
///
/// Day coverage is inclusive of both endpoints, so responses on a single
/// calendar day cover one day.
pub fn summarize_timestamps(values: Option<&[Option<NaiveDateTime>]>) -> TimeWindowSummary {
    let Some(values) = values else {
        return TimeWindowSummary::default();
    };

    let parsed: Vec<NaiveDateTime> = values.iter().flatten().copied().collect();
    let (Some(min_ts), Some(max_ts)) = (parsed.iter().min(), parsed.iter().max()) else {
        return TimeWindowSummary {
            has_timestamp: true,
            note: Some(NO_USABLE_TIMESTAMPS.to_string()),
            ..TimeWindowSummary::default()
        };
    };

    let days = (max_ts.date() - min_ts.date()).num_days() + 1;

    let mut by_day: BTreeMap<String, usize> = BTreeMap::new();
    for ts in &parsed {
        *by_day.entry(ts.date().format("%Y-%m-%d").to_string()).or_insert(0) += 1;
    }
    let busiest = by_day.values().copied().max().unwrap_or(0);

    TimeWindowSummary {
        has_timestamp: true,
        parsed_nonnull: parsed.len(),
        min_timestamp: Some(min_ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        max_timestamp: Some(max_ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        calendar_days_covered: days.max(1) as usize,
        max_day_share: Some(busiest as f64 / parsed.len() as f64),
        responses_per_day: by_day,
        note: None,
    }
}
