//! Academic pressure summarized per demographic subgroup.

use crate::error::Result;
use crate::schema::PRESSURE_NUM;
use crate::types::{CanonicalField, GroupedStat};
use crate::utils::{MISSING_LABEL, column_f64, column_strings, mean, median};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Count, mean and median pressure for every subgroup of each present
/// demographic field.
///
/// Empty when there is no numeric pressure column. Groups are sorted by value
/// with the missing group last.
pub fn grouped_pressure_stats(df: &DataFrame) -> Result<Vec<GroupedStat>> {
    let Some(pressure) = column_f64(df, PRESSURE_NUM)? else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for field in CanonicalField::DEMOGRAPHIC {
        let Some(groups) = column_strings(df, field.name())? else {
            continue;
        };

        let mut present: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
        let mut missing: Vec<Option<f64>> = Vec::new();
        for (group, value) in groups.into_iter().zip(pressure.iter().copied()) {
            match group {
                Some(g) => present.entry(g).or_default().push(value),
                None => missing.push(value),
            }
        }

        let ordered = present
            .into_iter()
            .chain((!missing.is_empty()).then(|| (MISSING_LABEL.to_string(), missing)));

        for (group_value, values) in ordered {
            let observed: Vec<f64> = values.iter().flatten().copied().collect();
            rows.push(GroupedStat {
                group_by: field,
                group_value,
                n: values.len(),
                pressure_mean: mean(&observed),
                pressure_median: median(&observed),
            });
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::coerce_types;

    #[test]
    fn test_grouped_stats_per_group() {
        let df = df![
            "gender" => [Some("F"), Some("M"), Some("F"), None, Some("F")],
            "academic_pressure" => [Some("4"), Some("2"), None, Some("5"), Some("2")],
        ]
        .unwrap();
        let df = coerce_types(df).unwrap();

        let stats = grouped_pressure_stats(&df).unwrap();

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].group_value, "F");
        assert_eq!(stats[0].n, 3);
        assert_eq!(stats[0].pressure_mean, Some(3.0));
        assert_eq!(stats[0].pressure_median, Some(3.0));
        assert_eq!(stats[1].group_value, "M");
        assert_eq!(stats[2].group_value, MISSING_LABEL);
        assert_eq!(stats[2].pressure_mean, Some(5.0));
    }

    #[test]
    fn test_grouped_stats_without_pressure() {
        let df = df!["gender" => ["F", "M"]].unwrap();
        assert!(grouped_pressure_stats(&df).unwrap().is_empty());
    }

    #[test]
    fn test_group_without_observed_pressure() {
        let df = df![
            "age_group" => ["18-21", "22-25"],
            "academic_pressure" => [Some("3"), Some("n/a")],
        ]
        .unwrap();
        let df = coerce_types(df).unwrap();

        let stats = grouped_pressure_stats(&df).unwrap();
        let older = stats.iter().find(|s| s.group_value == "22-25").unwrap();
        assert_eq!(older.n, 1);
        assert_eq!(older.pressure_mean, None);
        assert_eq!(older.group_by, CanonicalField::AgeGroup);
    }
}
