//! Fixed-order heuristic bias scoring.

use crate::types::{
    BiasFinding, BiasType, CanonicalField, ImbalanceIndicator, RiskLevel, TimeWindowSummary,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Top-category share at or above which a demographic is High risk.
pub const HIGH_IMBALANCE_SHARE: f64 = 0.65;
/// Top-category share at or above which a demographic is Medium risk.
pub const MEDIUM_IMBALANCE_SHARE: f64 = 0.50;
/// Collections spanning at most this many calendar days count as a burst.
pub const BURST_WINDOW_DAYS: usize = 2;

/// Everything the scorer looks at.
#[derive(Debug, Clone, Copy)]
pub struct BiasInputs<'a> {
    pub time_window: &'a TimeWindowSummary,
    pub imbalance: &'a BTreeMap<CanonicalField, ImbalanceIndicator>,
    /// Demographic fields present in the table, in any order.
    pub demographics_present: &'a [CanonicalField],
}

type RuleStep = fn(&BiasInputs<'_>) -> Vec<BiasFinding>;

/// Finding generators in report order. Never reordered.
const RULES: [(&str, RuleStep); 5] = [
    ("selection", selection_rule),
    ("time_window", time_window_rule),
    ("demographic", demographic_rule),
    ("measurement", measurement_rule),
    ("social_desirability", social_desirability_rule),
];

/// Produces the bias risk matrix.
///
/// Scoring is total: a missing input narrows or defaults a finding but never
/// removes the always-on ones.
pub struct BiasRiskScorer;

impl BiasRiskScorer {
    pub fn score(inputs: &BiasInputs<'_>) -> Vec<BiasFinding> {
        let mut findings = Vec::new();
        for (name, rule) in RULES {
            let produced = rule(inputs);
            debug!("Bias rule '{}' produced {} finding(s)", name, produced.len());
            findings.extend(produced);
        }
        findings
    }
}

/// Risk tier for a demographic's largest category share.
///
/// Boundaries are inclusive on the lower end of each tier.
pub fn imbalance_tier(max_share: f64) -> RiskLevel {
    if max_share >= HIGH_IMBALANCE_SHARE {
        RiskLevel::High
    } else if max_share >= MEDIUM_IMBALANCE_SHARE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn finding(
    bias_type: BiasType,
    risk_level: RiskLevel,
    evidence: impl Into<String>,
    mitigation: &str,
) -> BiasFinding {
    BiasFinding {
        bias_type,
        risk_level,
        evidence: evidence.into(),
        mitigation_next_time: mitigation.to_string(),
    }
}

fn selection_rule(_: &BiasInputs<'_>) -> Vec<BiasFinding> {
    vec![finding(
        BiasType::Selection,
        RiskLevel::High,
        "Voluntary responses; sample may over-represent students motivated to respond.",
        "Structured recruitment, track response rates, stratify by student groups.",
    )]
}

fn time_window_rule(inputs: &BiasInputs<'_>) -> Vec<BiasFinding> {
    let burst = match inputs.time_window.known_days() {
        Some(days) if days <= BURST_WINDOW_DAYS => Some(days),
        _ => None,
    };

    let row = match burst {
        Some(days) => finding(
            BiasType::TimeWindow,
            RiskLevel::High,
            format!(
                "Responses collected within ~{days} day(s); may reflect a narrow moment (e.g., exams)."
            ),
            "Collect over multiple weeks; add an exam-period indicator; compare early vs late responses.",
        ),
        None => finding(
            BiasType::TimeWindow,
            RiskLevel::Medium,
            "Collection window unknown or longer; temporal skew still possible.",
            "Record collection window; recruit evenly across time.",
        ),
    };
    vec![row]
}

fn demographic_rule(inputs: &BiasInputs<'_>) -> Vec<BiasFinding> {
    const MITIGATION: &str = "Use quotas/stratified sampling; publish subgroup counts; avoid population claims with low-N groups.";

    CanonicalField::DEMOGRAPHIC
        .into_iter()
        .filter(|field| inputs.demographics_present.contains(field))
        .map(|field| match inputs.imbalance.get(&field) {
            Some(indicator) => finding(
                BiasType::Demographic(field),
                imbalance_tier(indicator.max_share),
                format!(
                    "Top category share is {:.1}%; distribution may not represent the target population.",
                    indicator.max_share * 100.0
                ),
                MITIGATION,
            ),
            None => finding(
                BiasType::Demographic(field),
                RiskLevel::Low,
                "No responses recorded; imbalance cannot be assessed.",
                MITIGATION,
            ),
        })
        .collect()
}

fn measurement_rule(_: &BiasInputs<'_>) -> Vec<BiasFinding> {
    vec![finding(
        BiasType::Measurement,
        RiskLevel::Medium,
        "Stress frequency scale lacks 'Never/Rarely' which can inflate frequency estimates.",
        "Use balanced Likert scale with clear anchors.",
    )]
}

fn social_desirability_rule(_: &BiasInputs<'_>) -> Vec<BiasFinding> {
    vec![finding(
        BiasType::SocialDesirability,
        RiskLevel::Medium,
        "Self-reported stress may be under/over-reported depending on context.",
        "Anonymous collection; neutral wording; include validated scales where possible.",
    )]
}
