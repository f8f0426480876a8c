//! Markdown rendering of the audit report.

use crate::types::{BiasFinding, ProfileStats, TaxonomyCount, TimeWindowSummary, ValidityCheck};

/// Subgroups smaller than this are flagged as low-confidence comparisons.
pub const LOW_N_SUBGROUP: usize = 5;

const NO_DATA: &str = "_(no data)_";

/// Everything the report text is composed from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub profile: &'a ProfileStats,
    pub time_window: &'a TimeWindowSummary,
    pub validity: &'a [ValidityCheck],
    pub bias_findings: &'a [BiasFinding],
    pub taxonomy_summary: &'a [TaxonomyCount],
    /// Where the taxonomy mapping is exported, quoted in the notes.
    pub taxonomy_mapping_file: &'a str,
    /// Row cap for each rendered table.
    pub max_rows: usize,
}

/// Renders the human-readable audit report.
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn render(inputs: &ReportInputs<'_>) -> String {
        let mut md: Vec<String> = Vec::new();

        md.push("# Student Survey Quality & Bias Audit".into());
        md.push(String::new());
        md.push(
            "This report evaluates **coverage, sample representativeness, measurement risks, and text-response noise**."
                .into(),
        );
        md.push(
            "It is designed to prevent overconfident conclusions from small or biased survey samples."
                .into(),
        );
        md.push(String::new());

        Self::overview(&mut md, inputs);
        Self::guardrails(&mut md);

        md.push("## Data validity checks".into());
        md.push(validity_table(inputs.validity, inputs.max_rows));
        md.push(String::new());

        md.push("## Bias risk matrix".into());
        md.push(bias_table(inputs.bias_findings, inputs.max_rows));
        md.push(String::new());

        md.push("## Stress cause taxonomy (open-text normalization)".into());
        md.push(taxonomy_table(inputs.taxonomy_summary, inputs.max_rows));
        md.push(String::new());
        md.push(
            "**Why this matters:** open-text answers create many near-duplicates. A transparent taxonomy makes patterns readable without overfitting."
                .into(),
        );
        md.push(String::new());

        Self::recommendations(&mut md);

        md.push("## Notes".into());
        md.push(
            "- **Small sample warning**: Interpret subgroup differences cautiously; low-N segments can be unstable."
                .into(),
        );
        md.push(format!(
            "- **Taxonomy transparency**: Mapping exported to {}.",
            inputs.taxonomy_mapping_file
        ));

        format!("{}\n", md.join("\n").trim())
    }

    fn overview(md: &mut Vec<String>, inputs: &ReportInputs<'_>) {
        md.push("## Dataset overview".into());
        md.push(format!("- Responses: **{}**", inputs.profile.n_rows));
        md.push(format!("- Columns: **{}**", inputs.profile.n_cols));

        let tw = inputs.time_window;
        if tw.has_timestamp {
            match (&tw.min_timestamp, &tw.max_timestamp) {
                (Some(min), Some(max)) => {
                    md.push(format!("- Collection window: **{min} → {max}**"));
                }
                _ => md.push("- Collection window: **unknown (no usable timestamps)**".into()),
            }
            md.push(format!(
                "- Calendar days covered: **{}**",
                tw.calendar_days_covered
            ));
            md.push(format!(
                "- Largest single-day share: **{}**",
                percent(tw.max_day_share.unwrap_or(0.0))
            ));
        }
        md.push(String::new());
    }

    fn guardrails(md: &mut Vec<String>) {
        md.push("## Key interpretation guardrails".into());
        md.push("- This is a **survey sample**, not a controlled population study.".into());
        md.push(format!(
            "- Treat subgroup comparisons as low confidence when subgroup size is small (commonly **n < {LOW_N_SUBGROUP}**)."
        ));
        md.push("- Use language like **'in this sample'** rather than population-level claims.".into());
        md.push("- Avoid population claims unless sampling is representative.".into());
        md.push("- Report counts alongside percentages.".into());
        md.push(String::new());
    }

    fn recommendations(md: &mut Vec<String>) {
        md.push("## Recommendations for the next survey run".into());
        md.push("### Representativeness".into());
        md.push("- Recruit across multiple groups (age/education), not a single channel.".into());
        md.push("- Track invite count and response rate to quantify selection bias.".into());
        md.push(String::new());
        md.push("### Measurement quality".into());
        md.push("- Use balanced Likert options (Never → Always).".into());
        md.push("- Add structured stress-cause options + optional free text.".into());
        md.push(String::new());
        md.push("### Analysis safety".into());
        md.push("- Report subgroup counts alongside charts.".into());
        md.push("- Avoid causal language; use effect sizes and uncertainty where possible.".into());
        md.push(String::new());
    }
}

fn percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

/// Render a pipe table, or a no-data marker when there are no rows.
pub fn markdown_table(headers: &[&str], rows: &[Vec<String>], max_rows: usize) -> String {
    if rows.is_empty() {
        return NO_DATA.to_string();
    }

    let mut lines = Vec::with_capacity(rows.len().min(max_rows) + 2);
    lines.push(format!("| {} |", headers.join(" | ")));
    lines.push(format!(
        "|{}|",
        headers.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    ));
    for row in rows.iter().take(max_rows) {
        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }
    lines.join("\n")
}

fn validity_table(checks: &[ValidityCheck], max_rows: usize) -> String {
    let rows: Vec<Vec<String>> = checks
        .iter()
        .map(|check| {
            let mut row = vec![check.name().to_string()];
            row.extend(match check {
                ValidityCheck::PressureRange { min, max, invalid_count } => [
                    invalid_count.to_string(),
                    format!("{min}-{max}"),
                    String::new(),
                    String::new(),
                ],
                ValidityCheck::StressFrequencyAllowed { allowed, invalid_count } => [
                    invalid_count.to_string(),
                    allowed.join(", "),
                    String::new(),
                    String::new(),
                ],
                ValidityCheck::TimestampParseRate { parsed_ok, parsed_bad } => [
                    String::new(),
                    String::new(),
                    parsed_ok.to_string(),
                    parsed_bad.to_string(),
                ],
            });
            row
        })
        .collect();

    markdown_table(
        &["name", "invalid_count", "allowed", "parsed_ok", "parsed_bad"],
        &rows,
        max_rows,
    )
}

fn bias_table(findings: &[BiasFinding], max_rows: usize) -> String {
    let rows: Vec<Vec<String>> = findings
        .iter()
        .map(|f| {
            vec![
                f.bias_type.to_string(),
                f.risk_level.to_string(),
                f.evidence.clone(),
                f.mitigation_next_time.clone(),
            ]
        })
        .collect();

    markdown_table(
        &["bias_type", "risk_level", "evidence", "mitigation_next_time"],
        &rows,
        max_rows,
    )
}

fn taxonomy_table(summary: &[TaxonomyCount], max_rows: usize) -> String {
    let rows: Vec<Vec<String>> = summary
        .iter()
        .map(|c| {
            vec![
                c.category.label().to_string(),
                c.count.to_string(),
                format!("{:.3}", c.share),
            ]
        })
        .collect();

    markdown_table(&["category", "count", "share"], &rows, max_rows)
}
