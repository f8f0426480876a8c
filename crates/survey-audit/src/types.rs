use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Canonical schema
// ============================================================================

/// A survey attribute the audit understands natively.
///
/// Declaration order matters: it is the order in which the schema normalizer
/// claims input columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Timestamp,
    AgeGroup,
    Gender,
    EducationLevel,
    AcademicPressure,
    StressFrequency,
    SleepHours,
    StressCause,
}

impl CanonicalField {
    /// All canonical fields in declaration order.
    pub const ALL: [CanonicalField; 8] = [
        Self::Timestamp,
        Self::AgeGroup,
        Self::Gender,
        Self::EducationLevel,
        Self::AcademicPressure,
        Self::StressFrequency,
        Self::SleepHours,
        Self::StressCause,
    ];

    /// Demographic fields checked for sample imbalance, in report order.
    pub const DEMOGRAPHIC: [CanonicalField; 3] =
        [Self::AgeGroup, Self::Gender, Self::EducationLevel];

    /// Column name used in the canonical table.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::AgeGroup => "age_group",
            Self::Gender => "gender",
            Self::EducationLevel => "education_level",
            Self::AcademicPressure => "academic_pressure",
            Self::StressFrequency => "stress_frequency",
            Self::SleepHours => "sleep_hours",
            Self::StressCause => "stress_cause",
        }
    }

    /// Human-readable label used in findings and chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Timestamp => "Timestamp",
            Self::AgeGroup => "Age group",
            Self::Gender => "Gender",
            Self::EducationLevel => "Education level",
            Self::AcademicPressure => "Academic pressure",
            Self::StressFrequency => "Stress frequency",
            Self::SleepHours => "Sleep hours",
            Self::StressCause => "Stress cause",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One original column claimed by a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMatch {
    pub original: String,
    pub canonical: CanonicalField,
}

/// Metadata recorded by the schema normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMapping {
    pub original_columns: Vec<String>,
    /// Original column → canonical field, in claim order.
    pub mapping_used: Vec<ColumnMatch>,
    pub canonical_columns_present: Vec<CanonicalField>,
    pub canonical_columns_missing: Vec<CanonicalField>,
}

impl SchemaMapping {
    /// Canonical field an original column was renamed to, if any.
    pub fn canonical_for(&self, original: &str) -> Option<CanonicalField> {
        self.mapping_used
            .iter()
            .find(|m| m.original == original)
            .map(|m| m.canonical)
    }

    pub fn is_present(&self, field: CanonicalField) -> bool {
        self.canonical_columns_present.contains(&field)
    }
}

// ============================================================================
// Profile & validity
// ============================================================================

/// Shape and completeness statistics of the canonical table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileStats {
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<String>,
    pub missing_values: BTreeMap<String, usize>,
    /// Rows with at least one missing value.
    pub missing_any_row: usize,
    pub duplicate_rows: usize,
}

/// Outcome of one declarative validity check.
///
/// Checks report counts only; severity is left to the report layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum ValidityCheck {
    #[serde(rename = "academic_pressure_range_1_to_5")]
    PressureRange { min: f64, max: f64, invalid_count: usize },

    #[serde(rename = "stress_frequency_allowed_values")]
    StressFrequencyAllowed { allowed: Vec<String>, invalid_count: usize },

    #[serde(rename = "timestamp_parse_rate")]
    TimestampParseRate { parsed_ok: usize, parsed_bad: usize },
}

impl ValidityCheck {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PressureRange { .. } => "academic_pressure_range_1_to_5",
            Self::StressFrequencyAllowed { .. } => "stress_frequency_allowed_values",
            Self::TimestampParseRate { .. } => "timestamp_parse_rate",
        }
    }

    pub fn invalid_count(&self) -> Option<usize> {
        match self {
            Self::PressureRange { invalid_count, .. }
            | Self::StressFrequencyAllowed { invalid_count, .. } => Some(*invalid_count),
            Self::TimestampParseRate { .. } => None,
        }
    }
}

// ============================================================================
// Imbalance & time window
// ============================================================================

/// Distributional skew of one categorical field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceIndicator {
    /// Largest category's share of all rows, in `[0, 1]`.
    pub max_share: f64,
    /// Shannon entropy in nats over nonzero categories.
    pub entropy: f64,
    /// `exp(entropy)`, always `>= 1`.
    pub effective_n: f64,
}

/// Coverage of the collection window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowSummary {
    /// Whether the table has a timestamp column at all.
    pub has_timestamp: bool,
    pub parsed_nonnull: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_timestamp: Option<String>,
    pub calendar_days_covered: usize,
    /// ISO date → responses, chronological.
    pub responses_per_day: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_day_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TimeWindowSummary {
    /// Day coverage when a timestamp column exists, `None` otherwise.
    pub fn known_days(&self) -> Option<usize> {
        self.has_timestamp.then_some(self.calendar_days_covered)
    }
}

/// Pressure statistics for one subgroup of a demographic field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedStat {
    pub group_by: CanonicalField,
    pub group_value: String,
    /// Rows in the group, including rows without a pressure value.
    pub n: usize,
    pub pressure_mean: Option<f64>,
    pub pressure_median: Option<f64>,
}

// ============================================================================
// Bias findings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// Kind of sampling or measurement bias a finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiasType {
    Selection,
    TimeWindow,
    Demographic(CanonicalField),
    Measurement,
    SocialDesirability,
}

impl fmt::Display for BiasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selection => f.write_str("Selection / volunteer bias"),
            Self::TimeWindow => f.write_str("Time-window / burst collection bias"),
            Self::Demographic(field) => write!(f, "Demographic imbalance ({})", field.label()),
            Self::Measurement => f.write_str("Measurement / instrument bias"),
            Self::SocialDesirability => f.write_str("Social desirability bias"),
        }
    }
}

impl Serialize for BiasType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the bias risk matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiasFinding {
    pub bias_type: BiasType,
    pub risk_level: RiskLevel,
    pub evidence: String,
    pub mitigation_next_time: String,
}

// ============================================================================
// Text taxonomy
// ============================================================================

/// Closed set of buckets for free-text stress causes.
///
/// `Ord` follows declaration order, which breaks count ties in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaxonomyCategory {
    #[serde(rename = "Exams & grades")]
    ExamsGrades,
    #[serde(rename = "Financial")]
    Financial,
    #[serde(rename = "Workload & time")]
    WorkloadTime,
    #[serde(rename = "Family & personal")]
    FamilyPersonal,
    #[serde(rename = "Career & future")]
    CareerFuture,
    #[serde(rename = "Expectations & competition")]
    ExpectationsCompetition,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
    #[serde(rename = "Unspecified")]
    Unspecified,
    #[serde(rename = "Other")]
    Other,
}

impl TaxonomyCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExamsGrades => "Exams & grades",
            Self::Financial => "Financial",
            Self::WorkloadTime => "Workload & time",
            Self::FamilyPersonal => "Family & personal",
            Self::CareerFuture => "Career & future",
            Self::ExpectationsCompetition => "Expectations & competition",
            Self::PreferNotToSay => "Prefer not to say",
            Self::Unspecified => "Unspecified",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for TaxonomyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One distinct (raw text, category) pair of the taxonomy lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub raw_text: String,
    pub cleaned_text: String,
    pub category: TaxonomyCategory,
}

/// Category frequency over all rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyCount {
    pub category: TaxonomyCategory,
    pub count: usize,
    pub share: f64,
}

// ============================================================================
// Summary
// ============================================================================

/// The canonical machine-readable output of an audit run.
///
/// Carries no run timestamp, so the same input always serializes identically.
#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub schema: SchemaMapping,
    pub profile: ProfileStats,
    pub time_window: TimeWindowSummary,
    pub imbalance_indicators: BTreeMap<CanonicalField, ImbalanceIndicator>,
    pub subgroup_counts: BTreeMap<CanonicalField, BTreeMap<String, usize>>,
    pub validity: Vec<ValidityCheck>,
    pub files: BTreeMap<String, String>,
}
