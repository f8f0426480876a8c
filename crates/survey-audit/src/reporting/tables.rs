//! Tabular exports of the audit artifacts.

use crate::error::Result;
use crate::types::{BiasFinding, GroupedStat, TaxonomyCount, TaxonomyEntry};
use polars::prelude::*;

/// Conversion of a typed artifact table into a DataFrame for CSV export.
pub trait ToFrame {
    fn to_frame(&self) -> Result<DataFrame>;
}

impl ToFrame for [BiasFinding] {
    fn to_frame(&self) -> Result<DataFrame> {
        let df = df![
            "bias_type" => self.iter().map(|f| f.bias_type.to_string()).collect::<Vec<_>>(),
            "risk_level" => self.iter().map(|f| f.risk_level.to_string()).collect::<Vec<_>>(),
            "evidence" => self.iter().map(|f| f.evidence.clone()).collect::<Vec<_>>(),
            "mitigation_next_time" => self.iter().map(|f| f.mitigation_next_time.clone()).collect::<Vec<_>>(),
        ]?;
        Ok(df)
    }
}

impl ToFrame for [TaxonomyEntry] {
    fn to_frame(&self) -> Result<DataFrame> {
        let df = df![
            "raw_text" => self.iter().map(|e| e.raw_text.clone()).collect::<Vec<_>>(),
            "cleaned_text" => self.iter().map(|e| e.cleaned_text.clone()).collect::<Vec<_>>(),
            "category" => self.iter().map(|e| e.category.label()).collect::<Vec<_>>(),
        ]?;
        Ok(df)
    }
}

impl ToFrame for [TaxonomyCount] {
    fn to_frame(&self) -> Result<DataFrame> {
        let df = df![
            "category" => self.iter().map(|c| c.category.label()).collect::<Vec<_>>(),
            "count" => self.iter().map(|c| c.count as u64).collect::<Vec<_>>(),
            "share" => self.iter().map(|c| c.share).collect::<Vec<_>>(),
        ]?;
        Ok(df)
    }
}

impl ToFrame for [GroupedStat] {
    fn to_frame(&self) -> Result<DataFrame> {
        let df = df![
            "group_by" => self.iter().map(|g| g.group_by.name()).collect::<Vec<_>>(),
            "group_value" => self.iter().map(|g| g.group_value.clone()).collect::<Vec<_>>(),
            "n" => self.iter().map(|g| g.n as u64).collect::<Vec<_>>(),
            "pressure_mean" => self.iter().map(|g| g.pressure_mean).collect::<Vec<_>>(),
            "pressure_median" => self.iter().map(|g| g.pressure_median).collect::<Vec<_>>(),
        ]?;
        Ok(df)
    }
}

/// Encode a frame as CSV with a header row.
pub fn frame_to_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut df = df.clone();
    CsvWriter::new(&mut out)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BiasType, CanonicalField, RiskLevel, TaxonomyCategory};

    #[test]
    fn test_bias_matrix_frame_columns() {
        let findings = vec![BiasFinding {
            bias_type: BiasType::Demographic(CanonicalField::Gender),
            risk_level: RiskLevel::High,
            evidence: "e".to_string(),
            mitigation_next_time: "m".to_string(),
        }];
        let df = findings.to_frame().unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec!["bias_type", "risk_level", "evidence", "mitigation_next_time"]
        );
        let types = df.column("bias_type").unwrap().as_materialized_series().str().unwrap().clone();
        assert_eq!(types.get(0), Some("Demographic imbalance (Gender)"));
    }

    #[test]
    fn test_empty_tables_keep_headers() {
        let entries: Vec<TaxonomyEntry> = Vec::new();
        let csv = frame_to_csv(&entries.to_frame().unwrap()).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap().trim(), "raw_text,cleaned_text,category");
    }

    #[test]
    fn test_taxonomy_summary_csv() {
        let counts = vec![TaxonomyCount {
            category: TaxonomyCategory::ExamsGrades,
            count: 2,
            share: 1.0,
        }];
        let csv = String::from_utf8(frame_to_csv(&counts.to_frame().unwrap()).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("category,count,share"));
        assert!(lines.next().unwrap().starts_with("Exams & grades,2,1"));
    }

    #[test]
    fn test_grouped_stats_nulls() {
        let stats = vec![GroupedStat {
            group_by: CanonicalField::AgeGroup,
            group_value: "18-21".to_string(),
            n: 2,
            pressure_mean: None,
            pressure_median: None,
        }];
        let df = stats.to_frame().unwrap();
        assert_eq!(df.column("pressure_mean").unwrap().null_count(), 1);
    }
}
