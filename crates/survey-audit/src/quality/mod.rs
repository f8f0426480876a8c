//! Data quality module.
//!
//! This module provides the dataset profile (shape, missing values,
//! duplicates, subgroup counts) and the declarative validity checks.

mod profile;
mod validity;

pub use profile::{basic_profile, subgroup_counts};
pub use validity::{ALLOWED_STRESS_FREQUENCIES, PRESSURE_RANGE, ValidityChecker};
