//! Bias risk scoring.
//!
//! Findings come from an ordered list of independent rules, each a pure
//! function of a summary statistic, so that the resulting matrix is stable and
//! can be audited by hand.

mod bias_rules;

pub use bias_rules::{
    BURST_WINDOW_DAYS, BiasInputs, BiasRiskScorer, HIGH_IMBALANCE_SHARE, MEDIUM_IMBALANCE_SHARE,
    imbalance_tier,
};
