//! Distribution profiling module.
//!
//! This module provides:
//! - Imbalance indicators (max share, entropy, effective sample size)
//! - The collection time-window summary
//! - Grouped pressure statistics per demographic subgroup

mod grouped;
mod imbalance;
mod time_window;

pub use grouped::grouped_pressure_stats;
pub use imbalance::ImbalanceAnalyzer;
pub use time_window::{summarize_timestamps, time_window_summary};
