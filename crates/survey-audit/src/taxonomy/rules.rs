//! Text cleaning and keyword rules for stress-cause answers.

use crate::types::TaxonomyCategory;
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]+").expect("valid regex"));

/// Keyword rules in priority order. The first category with a keyword
/// contained in the cleaned text wins.
pub static TAXONOMY_RULES: [(TaxonomyCategory, &[&str]); 6] = [
    (
        TaxonomyCategory::ExamsGrades,
        &["exam", "grade", "test", "quiz", "result", "gpa"],
    ),
    (
        TaxonomyCategory::Financial,
        &["financial", "money", "fees", "tuition", "income", "cost"],
    ),
    (
        TaxonomyCategory::WorkloadTime,
        &[
            "deadline",
            "workload",
            "assignment",
            "project",
            "homework",
            "time",
            "study load",
        ],
    ),
    (
        TaxonomyCategory::FamilyPersonal,
        &[
            "family",
            "relationship",
            "parents",
            "personal",
            "health",
            "mental",
            "life",
        ],
    ),
    (
        TaxonomyCategory::CareerFuture,
        &["career", "future", "job", "employment", "internship"],
    ),
    (
        TaxonomyCategory::ExpectationsCompetition,
        &["expectation", "competitive", "competition", "rank", "peer"],
    ),
];

/// Lowercase, strip punctuation and collapse whitespace.
///
/// Non-ASCII letters are treated as punctuation.
pub fn clean_text(raw: &str) -> String {
    let lowered = collapse_whitespace(raw.trim()).to_lowercase();
    let stripped = NON_ALNUM.replace_all(&lowered, " ");
    collapse_whitespace(&stripped).trim().to_string()
}

/// Assign one category to a raw answer. Total over all strings.
///
/// Keywords are plain substring tests, so "latest" contains "test" and lands
/// in exams. That is accepted behavior of the rule set.
pub fn classify(raw: &str) -> TaxonomyCategory {
    let cleaned = clean_text(raw);

    if cleaned.is_empty() || cleaned == "nan" {
        return TaxonomyCategory::Unspecified;
    }
    if cleaned.contains("prefer") {
        return TaxonomyCategory::PreferNotToSay;
    }
    if cleaned == "other" {
        return TaxonomyCategory::Other;
    }

    TAXONOMY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| cleaned.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(TaxonomyCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== clean_text tests ====================

    #[test]
    fn test_clean_text_strips_punctuation() {
        assert_eq!(clean_text("Exam pressure and deadlines!!"), "exam pressure and deadlines");
        assert_eq!(clean_text("  Money/Fees\t & rent "), "money fees rent");
        assert_eq!(clean_text("!!!"), "");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        for raw in ["Family -- issues", "GPA (3.2)", "  ", "Career: future?"] {
            let once = clean_text(raw);
            assert_eq!(clean_text(&once), once);
        }
    }

    fn mixed_corpus() -> Vec<String> {
        let mut corpus: Vec<String> = [
            "Écoles et examens",
            "学费太贵",
            "stress 😩 from exams",
            "Ωmega GPA 3.9",
            "İstanbul internship",
            "2024",
            "  \t\n ",
            "\u{00A0}\u{2003}",
            "tab\tseparated\nlines",
            "ＦＵＬＬ ｗｉｄｔｈ",
            "nan",
            "NULL",
            "-- / -- ",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        corpus.push("deadline ".repeat(5_000));
        corpus.push("x".repeat(20_000));
        corpus
    }

    #[test]
    fn test_clean_text_emits_only_ascii_alnum_and_single_spaces() {
        for raw in mixed_corpus() {
            let cleaned = clean_text(&raw);
            assert!(
                cleaned
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '),
                "unexpected character in {cleaned:?}"
            );
            assert!(!cleaned.contains("  "));
            assert_eq!(cleaned.trim(), cleaned);
            assert_eq!(clean_text(&cleaned), cleaned);
        }
    }

    #[test]
    fn test_classify_is_total_and_deterministic() {
        for raw in mixed_corpus() {
            let category = classify(&raw);
            assert_eq!(classify(&raw), category);
            assert_eq!(classify(&clean_text(&raw)), category);
        }
        assert_eq!(classify("  \t\n "), TaxonomyCategory::Unspecified);
        assert_eq!(classify(&"deadline ".repeat(5_000)), TaxonomyCategory::WorkloadTime);
    }

    // ==================== classify tests ====================

    #[test]
    fn test_first_matching_rule_wins() {
        assert_eq!(classify("Exam pressure and deadlines!!"), TaxonomyCategory::ExamsGrades);
        assert_eq!(classify("tuition fees"), TaxonomyCategory::Financial);
        assert_eq!(classify("Too much homework"), TaxonomyCategory::WorkloadTime);
        assert_eq!(classify("parents"), TaxonomyCategory::FamilyPersonal);
        assert_eq!(classify("Getting a job"), TaxonomyCategory::CareerFuture);
        assert_eq!(classify("peer competition"), TaxonomyCategory::ExpectationsCompetition);
    }

    #[test]
    fn test_special_answers() {
        assert_eq!(classify(""), TaxonomyCategory::Unspecified);
        assert_eq!(classify("  NaN "), TaxonomyCategory::Unspecified);
        assert_eq!(classify("...."), TaxonomyCategory::Unspecified);
        assert_eq!(classify("I'd prefer not to say"), TaxonomyCategory::PreferNotToSay);
        assert_eq!(classify("Prefer exams"), TaxonomyCategory::PreferNotToSay);
        assert_eq!(classify("Other"), TaxonomyCategory::Other);
        assert_eq!(classify("weather"), TaxonomyCategory::Other);
    }

    #[test]
    fn test_substring_matching_is_greedy() {
        assert_eq!(classify("the latest news"), TaxonomyCategory::ExamsGrades);
        assert_eq!(classify("other exams"), TaxonomyCategory::ExamsGrades);
    }

    #[test]
    fn test_classify_is_case_and_punctuation_insensitive() {
        assert_eq!(classify("FINANCIAL!!!"), classify("financial"));
        assert_eq!(classify("Study-Load"), TaxonomyCategory::WorkloadTime);
    }
}
