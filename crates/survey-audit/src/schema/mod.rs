//! Schema normalization for survey tables.
//!
//! This module provides:
//! - Best-effort matching of messy headers onto the canonical schema
//! - Type coercion of the canonical columns (timestamps, numeric pressure, trimmed text)

mod coercion;
mod normalizer;

pub use coercion::{PRESSURE_NUM, TIMESTAMP_PARSED, coerce_types};
pub use normalizer::{CANONICAL_FIELDS, SchemaNormalizer, build_mapping, normalize_column_name};
