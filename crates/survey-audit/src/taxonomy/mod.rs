//! Rule-based classification of free-text stress causes.

mod classifier;
mod rules;

pub use classifier::{Taxonomy, TaxonomyClassifier};
pub use rules::{TAXONOMY_RULES, classify, clean_text};
