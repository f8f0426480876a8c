use crate::config::AuditConfig;
use crate::types::{
    AuditSummary, CanonicalField, ImbalanceIndicator, ProfileStats, SchemaMapping,
    TimeWindowSummary, ValidityCheck,
};
use std::collections::BTreeMap;

/// Parts of the machine-readable summary computed by earlier stages.
#[derive(Debug, Clone)]
pub struct SummaryParts {
    pub schema: SchemaMapping,
    pub profile: ProfileStats,
    pub time_window: TimeWindowSummary,
    pub imbalance_indicators: BTreeMap<CanonicalField, ImbalanceIndicator>,
    pub subgroup_counts: BTreeMap<CanonicalField, BTreeMap<String, usize>>,
    pub validity: Vec<ValidityCheck>,
}

impl AuditSummary {
    /// Assemble the summary with the output locations of `config`.
    pub fn assemble(parts: SummaryParts, config: &AuditConfig) -> Self {
        Self {
            schema: parts.schema,
            profile: parts.profile,
            time_window: parts.time_window,
            imbalance_indicators: parts.imbalance_indicators,
            subgroup_counts: parts.subgroup_counts,
            validity: parts.validity,
            files: config.file_map(),
        }
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
