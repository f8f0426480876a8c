//! Column-name matching against the canonical survey schema.

use crate::error::Result;
use crate::types::{CanonicalField, ColumnMatch, SchemaMapping};
use crate::utils::{collapse_whitespace, has_column};
use polars::prelude::*;
use tracing::{debug, warn};

/// Candidate substrings per canonical field, in claim order.
///
/// A normalized column name matches a field when it contains any of the
/// field's candidates.
pub static CANONICAL_FIELDS: [(CanonicalField, &[&str]); 8] = [
    (
        CanonicalField::Timestamp,
        &["timestamp", "time", "submitted", "date/time"],
    ),
    (CanonicalField::AgeGroup, &["age group", "age", "agegroup"]),
    (CanonicalField::Gender, &["gender", "sex"]),
    (
        CanonicalField::EducationLevel,
        &["current education level", "education level", "education"],
    ),
    (
        CanonicalField::AcademicPressure,
        &["how much academic pressure", "academic pressure"],
    ),
    (
        CanonicalField::StressFrequency,
        &[
            "how often do you feel stressed",
            "stress due to studies",
            "stress frequency",
        ],
    ),
    (
        CanonicalField::SleepHours,
        &["how many hours do you sleep", "sleep", "sleep hours"],
    ),
    (
        CanonicalField::StressCause,
        &[
            "main cause of your academic stress",
            "cause of your academic stress",
            "stress cause",
        ],
    ),
];

/// Normalize a header for matching: collapse whitespace, trim, lowercase.
pub fn normalize_column_name(name: &str) -> String {
    collapse_whitespace(name).trim().to_lowercase()
}

/// First original column (in file order) whose normalized name contains any candidate.
fn match_column<'a>(normalized: &'a [(String, String)], candidates: &[&str]) -> Option<&'a str> {
    normalized
        .iter()
        .find(|(_, norm)| candidates.iter().any(|c| norm.contains(c)))
        .map(|(original, _)| original.as_str())
}

/// Build the original → canonical mapping for a list of headers.
///
/// Fields are processed in declaration order. If two fields claim the same
/// original column, the later field overwrites the earlier claim in place.
pub fn build_mapping(columns: &[String]) -> Vec<ColumnMatch> {
    let normalized: Vec<(String, String)> = columns
        .iter()
        .map(|c| (c.clone(), normalize_column_name(c)))
        .collect();

    let mut mapping: Vec<ColumnMatch> = Vec::new();
    for (field, candidates) in CANONICAL_FIELDS.iter() {
        let Some(hit) = match_column(&normalized, candidates) else {
            debug!("No column matched canonical field '{}'", field);
            continue;
        };

        if let Some(existing) = mapping.iter_mut().find(|m| m.original == hit) {
            warn!(
                "Column '{}' claimed by both '{}' and '{}'; keeping '{}'",
                hit, existing.canonical, field, field
            );
            existing.canonical = *field;
        } else {
            mapping.push(ColumnMatch {
                original: hit.to_string(),
                canonical: *field,
            });
        }
    }
    mapping
}

/// Maps arbitrary survey headers onto the canonical schema.
pub struct SchemaNormalizer;

impl SchemaNormalizer {
    /// Rename matched columns to their canonical names.
    ///
    /// Unmatched columns are kept under their original names. An unmatched
    /// column that already carries a canonical name claimed by another column
    /// is renamed to `<name>_original` so the canonical name stays unique.
    ///
    /// Present and missing fields are read off the renamed frame.
    pub fn standardize(df: DataFrame) -> Result<(DataFrame, SchemaMapping)> {
        let mut df = df;
        let original_columns: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mapping = build_mapping(&original_columns);

        for col in &original_columns {
            let claimed_elsewhere = mapping
                .iter()
                .any(|m| m.canonical.name() == col && m.original != *col);
            let is_renamed = mapping.iter().any(|m| m.original == *col);
            if claimed_elsewhere && !is_renamed {
                let moved = format!("{}_original", col);
                warn!("Column '{}' shadows a canonical name; renaming to '{}'", col, moved);
                df.rename(col, moved.into())?;
            }
        }

        for m in &mapping {
            if m.original != m.canonical.name() {
                df.rename(&m.original, m.canonical.name().into())?;
            }
        }

        // Presence follows the renamed frame: a column already carrying a
        // canonical name counts even when no candidate matched it.
        let (present, missing): (Vec<_>, Vec<_>) = CanonicalField::ALL
            .into_iter()
            .partition(|f| has_column(&df, f.name()));

        debug!(
            "Schema mapping: {} matched, {} missing",
            present.len(),
            missing.len()
        );

        Ok((
            df,
            SchemaMapping {
                original_columns,
                mapping_used: mapping,
                canonical_columns_present: present,
                canonical_columns_missing: missing,
            },
        ))
    }
}
