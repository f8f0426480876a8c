//! Builds the taxonomy lookup table and category summary for a text column.

use super::rules::{classify, clean_text};
use crate::error::Result;
use crate::types::{TaxonomyCategory, TaxonomyCount, TaxonomyEntry};
use crate::utils::column_strings;
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Output of classifying one text column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Taxonomy {
    /// Distinct raw answers with their cleaned form and category, sorted by
    /// category label then raw text.
    pub mapping: Vec<TaxonomyEntry>,
    /// Category counts over all rows, most frequent first.
    pub summary: Vec<TaxonomyCount>,
}

impl Taxonomy {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }

    pub fn total(&self) -> usize {
        self.summary.iter().map(|c| c.count).sum()
    }
}

/// Classifies free-text answers into the fixed taxonomy.
pub struct TaxonomyClassifier;

impl TaxonomyClassifier {
    /// Classify `column` of the table. An absent column yields an empty taxonomy.
    ///
    /// Missing answers are classified as empty text.
    pub fn build(df: &DataFrame, column: &str) -> Result<Taxonomy> {
        let Some(values) = column_strings(df, column)? else {
            debug!("Text column '{}' absent; taxonomy skipped", column);
            return Ok(Taxonomy::default());
        };

        let raw: Vec<String> = values.into_iter().map(Option::unwrap_or_default).collect();
        let taxonomy = Self::from_texts(&raw);
        info!(
            "Classified {} answers ({} distinct) into {} categories",
            raw.len(),
            taxonomy.mapping.len(),
            taxonomy.summary.len()
        );
        Ok(taxonomy)
    }

    /// Classify already-extracted answers.
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Taxonomy {
        let mut seen = HashSet::new();
        let mut mapping = Vec::new();
        let mut counts: BTreeMap<TaxonomyCategory, usize> = BTreeMap::new();

        for text in texts {
            let raw = text.as_ref();
            let category = classify(raw);
            *counts.entry(category).or_insert(0) += 1;

            if seen.insert(raw.to_string()) {
                mapping.push(TaxonomyEntry {
                    raw_text: raw.to_string(),
                    cleaned_text: clean_text(raw),
                    category,
                });
            }
        }

        mapping.sort_by(|a, b| {
            a.category
                .label()
                .cmp(b.category.label())
                .then_with(|| a.raw_text.cmp(&b.raw_text))
        });

        let total = texts.len();
        let mut summary: Vec<TaxonomyCount> = counts
            .into_iter()
            .map(|(category, count)| TaxonomyCount {
                category,
                count,
                share: count as f64 / total as f64,
            })
            .collect();
        // Stable sort keeps declaration order among equal counts.
        summary.sort_by(|a, b| b.count.cmp(&a.count));

        Taxonomy { mapping, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mapping_is_deduplicated_and_sorted() {
        let taxonomy = TaxonomyClassifier::from_texts(&[
            "Money",
            "Exams",
            "Money",
            "deadlines",
            "Exams",
            "exams",
        ]);

        let rows: Vec<(&str, TaxonomyCategory)> = taxonomy
            .mapping
            .iter()
            .map(|e| (e.raw_text.as_str(), e.category))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Exams", TaxonomyCategory::ExamsGrades),
                ("exams", TaxonomyCategory::ExamsGrades),
                ("Money", TaxonomyCategory::Financial),
                ("deadlines", TaxonomyCategory::WorkloadTime),
            ]
        );
    }

    #[test]
    fn test_summary_counts_all_rows() {
        let taxonomy =
            TaxonomyClassifier::from_texts(&["exam", "exam", "fees", "homework", "fees", "exam"]);

        assert_eq!(taxonomy.total(), 6);
        assert_eq!(taxonomy.summary[0].category, TaxonomyCategory::ExamsGrades);
        assert_eq!(taxonomy.summary[0].count, 3);
        assert!((taxonomy.summary[0].share - 0.5).abs() < 1e-9);
        let share_sum: f64 = taxonomy.summary.iter().map(|c| c.share).sum();
        assert!((share_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_ties_use_category_order() {
        let taxonomy = TaxonomyClassifier::from_texts(&["family", "fees", "exam"]);
        let order: Vec<_> = taxonomy.summary.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![
                TaxonomyCategory::ExamsGrades,
                TaxonomyCategory::Financial,
                TaxonomyCategory::FamilyPersonal,
            ]
        );
    }

    #[test]
    fn test_build_with_missing_values() {
        let df = df!["stress_cause" => [Some("Exam pressure and deadlines!!"), None]].unwrap();
        let taxonomy = TaxonomyClassifier::build(&df, "stress_cause").unwrap();

        assert_eq!(taxonomy.total(), 2);
        let unspecified = taxonomy
            .mapping
            .iter()
            .find(|e| e.category == TaxonomyCategory::Unspecified)
            .unwrap();
        assert_eq!(unspecified.raw_text, "");
        let exams = taxonomy
            .mapping
            .iter()
            .find(|e| e.category == TaxonomyCategory::ExamsGrades)
            .unwrap();
        assert_eq!(exams.cleaned_text, "exam pressure and deadlines");
    }

    #[test]
    fn test_build_absent_column() {
        let df = df!["gender" => ["F"]].unwrap();
        let taxonomy = TaxonomyClassifier::build(&df, "stress_cause").unwrap();
        assert!(taxonomy.is_empty());
        assert!(taxonomy.mapping.is_empty());
    }
}
