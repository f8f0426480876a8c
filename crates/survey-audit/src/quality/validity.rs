//! Declarative range, enum and parse-rate checks.

use crate::error::Result;
use crate::schema::{PRESSURE_NUM, TIMESTAMP_PARSED};
use crate::types::{CanonicalField, ValidityCheck};
use crate::utils::{column_datetimes, column_f64, column_strings};
use polars::prelude::*;
use tracing::debug;

/// Answers the stress-frequency question is allowed to take.
///
/// The instrument offers no "Never"/"Rarely" option; that gap is reported as a
/// measurement bias rather than corrected here.
pub const ALLOWED_STRESS_FREQUENCIES: [&str; 3] = ["Sometimes", "Often", "Always"];

/// Inclusive bounds of the academic pressure scale.
pub const PRESSURE_RANGE: (f64, f64) = (1.0, 5.0);

/// Runs each check whose field is present; absent fields skip their check.
pub struct ValidityChecker;

impl ValidityChecker {
    pub fn run(df: &DataFrame) -> Result<Vec<ValidityCheck>> {
        let mut checks = Vec::new();

        if let Some(values) = column_f64(df, PRESSURE_NUM)? {
            checks.push(Self::pressure_range(&values));
        }

        if let Some(values) = column_strings(df, CanonicalField::StressFrequency.name())? {
            checks.push(Self::stress_frequency_allowed(&values));
        }

        if let Some(values) = column_datetimes(df, TIMESTAMP_PARSED)? {
            let parsed_ok = values.iter().filter(|v| v.is_some()).count();
            checks.push(ValidityCheck::TimestampParseRate {
                parsed_ok,
                parsed_bad: values.len() - parsed_ok,
            });
        }

        debug!("Ran {} validity checks", checks.len());
        Ok(checks)
    }

    /// Present-but-out-of-range values; missing values are not counted.
    pub(crate) fn pressure_range(values: &[Option<f64>]) -> ValidityCheck {
        let (min, max) = PRESSURE_RANGE;
        let invalid_count = values
            .iter()
            .flatten()
            .filter(|v| !(min..=max).contains(*v))
            .count();
        ValidityCheck::PressureRange { min, max, invalid_count }
    }

    /// Exact, case-sensitive membership; missing answers are not in the set.
    pub(crate) fn stress_frequency_allowed(values: &[Option<String>]) -> ValidityCheck {
        let invalid_count = values
            .iter()
            .filter(|v| {
                v.as_deref()
                    .is_none_or(|s| !ALLOWED_STRESS_FREQUENCIES.contains(&s))
            })
            .count();

        let mut allowed: Vec<String> = ALLOWED_STRESS_FREQUENCIES
            .iter()
            .map(|s| s.to_string())
            .collect();
        allowed.sort();

        ValidityCheck::StressFrequencyAllowed { allowed, invalid_count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::coerce_types;

    #[test]
    fn test_pressure_range_counts_out_of_range_only() {
        let check = ValidityChecker::pressure_range(&[Some(1.0), Some(3.0), Some(5.0), Some(7.0), None]);
        assert_eq!(check.invalid_count(), Some(1));
    }

    #[test]
    fn test_stress_frequency_is_case_sensitive() {
        let values: Vec<Option<String>> = ["Sometimes", "Never", "Always", "often"]
            .iter()
            .map(|s| Some(s.to_string()))
            .collect();
        let check = ValidityChecker::stress_frequency_allowed(&values);

        assert_eq!(check.invalid_count(), Some(2));
        match check {
            ValidityCheck::StressFrequencyAllowed { allowed, .. } => {
                assert_eq!(allowed, vec!["Always", "Often", "Sometimes"]);
            }
            other => panic!("unexpected check {:?}", other),
        }
    }

    #[test]
    fn test_run_skips_absent_fields() {
        let df = df!["gender" => ["F"]].unwrap();
        let checks = ValidityChecker::run(&df).unwrap();
        assert!(checks.is_empty());
    }

    #[test]
    fn test_run_in_fixed_order() {
        let df = df![
            "timestamp" => [Some("2024-01-05 10:00:00"), Some("??")],
            "academic_pressure" => [Some("2"), Some("9")],
            "stress_frequency" => [Some("Often"), None],
        ]
        .unwrap();
        let df = coerce_types(df).unwrap();

        let checks = ValidityChecker::run(&df).unwrap();
        let names: Vec<_> = checks.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "academic_pressure_range_1_to_5",
                "stress_frequency_allowed_values",
                "timestamp_parse_rate"
            ]
        );
        assert_eq!(checks[0].invalid_count(), Some(1));
        assert_eq!(checks[1].invalid_count(), Some(1));
        assert_eq!(
            checks[2],
            ValidityCheck::TimestampParseRate { parsed_ok: 1, parsed_bad: 1 }
        );
    }
}
