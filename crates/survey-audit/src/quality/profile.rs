//! Shape, completeness and subgroup counts of the canonical table.

use crate::error::Result;
use crate::types::{CanonicalField, ProfileStats};
use crate::utils::{column_strings, value_counts};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Compute row/column counts, per-column missing counts and duplicates.
pub fn basic_profile(df: &DataFrame) -> Result<ProfileStats> {
    let columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut missing_values = BTreeMap::new();
    let mut row_has_missing = vec![false; df.height()];

    for name in &columns {
        let series = df.column(name)?.as_materialized_series();
        missing_values.insert(name.clone(), series.null_count());

        if series.null_count() > 0 {
            let nulls = series.is_null();
            for (idx, is_null) in nulls.into_iter().enumerate() {
                if is_null.unwrap_or(false) {
                    row_has_missing[idx] = true;
                }
            }
        }
    }

    let duplicate_rows = if df.width() == 0 {
        0
    } else {
        df.height() - df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?.height()
    };

    Ok(ProfileStats {
        n_rows: df.height(),
        n_cols: df.width(),
        columns,
        missing_values,
        missing_any_row: row_has_missing.into_iter().filter(|m| *m).count(),
        duplicate_rows,
    })
}

/// Value counts (missing included) for each present demographic field.
pub fn subgroup_counts(df: &DataFrame) -> Result<BTreeMap<CanonicalField, BTreeMap<String, usize>>> {
    let mut out = BTreeMap::new();
    for field in CanonicalField::DEMOGRAPHIC {
        if let Some(values) = column_strings(df, field.name())? {
            out.insert(field, value_counts(&values).into_iter().collect());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MISSING_LABEL;

    #[test]
    fn test_basic_profile_counts() {
        let df = df![
            "gender" => [Some("F"), Some("M"), Some("F"), None],
            "age_group" => [Some("18-21"), Some("22-25"), Some("18-21"), Some("18-21")],
        ]
        .unwrap();

        let profile = basic_profile(&df).unwrap();

        assert_eq!(profile.n_rows, 4);
        assert_eq!(profile.n_cols, 2);
        assert_eq!(profile.missing_values["gender"], 1);
        assert_eq!(profile.missing_values["age_group"], 0);
        assert_eq!(profile.missing_any_row, 1);
        assert_eq!(profile.duplicate_rows, 1);
    }

    #[test]
    fn test_basic_profile_empty_frame() {
        let profile = basic_profile(&DataFrame::empty()).unwrap();
        assert_eq!(profile.n_rows, 0);
        assert_eq!(profile.duplicate_rows, 0);
    }

    #[test]
    fn test_subgroup_counts_only_present_fields() {
        let df = df!["gender" => [Some("F"), None, Some("F")]].unwrap();
        let counts = subgroup_counts(&df).unwrap();

        assert_eq!(counts.len(), 1);
        let gender = &counts[&CanonicalField::Gender];
        assert_eq!(gender["F"], 2);
        assert_eq!(gender[MISSING_LABEL], 1);
    }
}
