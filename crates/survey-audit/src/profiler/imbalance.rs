//! Skew metrics for categorical distributions.

use crate::error::Result;
use crate::types::{CanonicalField, ImbalanceIndicator};
use crate::utils::{column_strings, value_counts};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

impl ImbalanceIndicator {
    /// Compute skew metrics from category counts.
    ///
    /// Zero counts are ignored. Returns `None` when there are no observations.
    pub fn from_counts(counts: &[usize]) -> Option<Self> {
        let total: usize = counts.iter().sum();
        if total == 0 {
            return None;
        }

        let shares: Vec<f64> = counts
            .iter()
            .filter(|c| **c > 0)
            .map(|c| *c as f64 / total as f64)
            .collect();

        let max_share = shares.iter().copied().fold(0.0, f64::max);
        let entropy: f64 = shares.iter().map(|p| p * (1.0 / p).ln()).sum();

        Some(Self {
            max_share,
            entropy,
            effective_n: entropy.exp(),
        })
    }

    /// Skew metrics of a raw column, with missing values as their own category.
    pub fn from_values(values: &[Option<String>]) -> Option<Self> {
        let counts: Vec<usize> = value_counts(values).into_iter().map(|(_, c)| c).collect();
        Self::from_counts(&counts)
    }
}

/// Computes imbalance indicators for the demographic fields.
pub struct ImbalanceAnalyzer;

impl ImbalanceAnalyzer {
    /// Indicators for each present demographic field with at least one row.
    pub fn analyze(df: &DataFrame) -> Result<BTreeMap<CanonicalField, ImbalanceIndicator>> {
        let mut indicators = BTreeMap::new();

        for field in CanonicalField::DEMOGRAPHIC {
            let Some(values) = column_strings(df, field.name())? else {
                continue;
            };
            if let Some(indicator) = ImbalanceIndicator::from_values(&values) {
                debug!(
                    "{}: max_share={:.3}, effective_n={:.2}",
                    field, indicator.max_share, indicator.effective_n
                );
                indicators.insert(field, indicator);
            }
        }

        Ok(indicators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_uniform_distribution_effective_n_equals_categories() {
        let ind = ImbalanceIndicator::from_counts(&[5, 5, 5, 5]).unwrap();
        assert!((ind.max_share - 0.25).abs() < EPS);
        assert!((ind.effective_n - 4.0).abs() < 1e-9);
        assert!((ind.entropy - 4.0f64.ln()).abs() < EPS);
    }

    #[test]
    fn test_skewed_distribution_effective_n_below_categories() {
        let ind = ImbalanceIndicator::from_counts(&[8, 1, 1]).unwrap();
        assert!((ind.max_share - 0.8).abs() < EPS);
        assert!(ind.effective_n >= 1.0);
        assert!(ind.effective_n < 3.0);
    }

    #[test]
    fn test_single_category() {
        let ind = ImbalanceIndicator::from_counts(&[7]).unwrap();
        assert_eq!(ind.max_share, 1.0);
        assert_eq!(ind.entropy, 0.0);
        assert_eq!(ind.effective_n, 1.0);
    }

    #[test]
    fn test_zero_counts_are_excluded() {
        let with_zero = ImbalanceIndicator::from_counts(&[3, 0, 1]).unwrap();
        let without = ImbalanceIndicator::from_counts(&[3, 1]).unwrap();
        assert!((with_zero.entropy - without.entropy).abs() < EPS);
    }

    #[test]
    fn test_empty_distribution() {
        assert!(ImbalanceIndicator::from_counts(&[]).is_none());
        assert!(ImbalanceIndicator::from_counts(&[0, 0]).is_none());
    }

    #[test]
    fn test_bounds_hold_over_many_distributions() {
        let distributions: Vec<Vec<usize>> = vec![
            vec![1],
            vec![1, 1],
            vec![10, 1],
            vec![2, 3, 5, 7, 11],
            vec![100, 1, 1, 1],
            vec![0, 4, 4],
        ];
        for counts in distributions {
            let ind = ImbalanceIndicator::from_counts(&counts).unwrap();
            let nonzero = counts.iter().filter(|c| **c > 0).count() as f64;
            assert!((0.0..=1.0).contains(&ind.max_share));
            assert!(ind.entropy >= 0.0);
            assert!(ind.effective_n >= 1.0 - EPS);
            assert!(ind.effective_n <= nonzero + EPS);
        }
    }

    #[test]
    fn test_missing_counts_as_category() {
        let values = vec![Some("F".to_string()), None];
        let ind = ImbalanceIndicator::from_values(&values).unwrap();
        assert!((ind.max_share - 0.5).abs() < EPS);
        assert!((ind.effective_n - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_only_present_demographics() {
        let df = df![
            "gender" => ["F", "F", "M"],
            "stress_cause" => ["exams", "money", "exams"],
        ]
        .unwrap();

        let indicators = ImbalanceAnalyzer::analyze(&df).unwrap();
        assert_eq!(indicators.len(), 1);
        let gender = indicators[&CanonicalField::Gender];
        assert!((gender.max_share - 2.0 / 3.0).abs() < EPS);
    }
}
