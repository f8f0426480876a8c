//! SVG bar charts of sample composition and answer distributions.
//!
//! Charts are drawn in memory with the plotters SVG backend. A failing chart is
//! logged and left out; it never fails the audit.

use crate::error::{AuditError, Result};
use crate::schema::PRESSURE_NUM;
use crate::taxonomy::Taxonomy;
use crate::types::{CanonicalField, TimeWindowSummary};
use crate::utils::{column_f64, column_strings, value_counts};
use plotters::prelude::{
    BLUE, ChartBuilder, Color, IntoDrawingArea, IntoSegmentedCoord, Rectangle, SVGBackend,
    SegmentValue, WHITE,
};
use polars::prelude::*;
use std::fmt::Display;
use tracing::{debug, warn};

const CHART_SIZE: (u32, u32) = (900, 540);

/// A rendered chart ready to be written to the figures directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub file_name: String,
    pub svg: String,
}

/// Source data of one bar chart.
struct BarChart {
    file_name: &'static str,
    title: String,
    x_desc: &'static str,
    bars: Vec<(String, usize)>,
}

impl BarChart {
    fn new(
        file_name: &'static str,
        title: impl Into<String>,
        x_desc: &'static str,
        bars: Vec<(String, usize)>,
    ) -> Self {
        Self {
            file_name,
            title: title.into(),
            x_desc,
            bars,
        }
    }
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render every chart whose source data is present and non-empty.
    pub fn render_all(
        df: &DataFrame,
        time_window: &TimeWindowSummary,
        taxonomy: &Taxonomy,
    ) -> Result<Vec<RenderedChart>> {
        let planned = planned_charts(df, time_window, taxonomy)?;

        let mut charts = Vec::with_capacity(planned.len());
        for plan in planned {
            match render_bar_chart(&plan) {
                Ok(svg) => {
                    debug!("Rendered chart {}", plan.file_name);
                    charts.push(RenderedChart {
                        file_name: plan.file_name.to_string(),
                        svg,
                    });
                }
                Err(e) => warn!("Skipping chart: {}", e),
            }
        }
        Ok(charts)
    }
}

fn composition_file(field: CanonicalField) -> &'static str {
    match field {
        CanonicalField::AgeGroup => "composition_age.svg",
        CanonicalField::Gender => "composition_gender.svg",
        _ => "composition_education.svg",
    }
}

fn observed_counts(values: Vec<Option<String>>) -> Vec<(String, usize)> {
    let observed: Vec<Option<String>> = values.into_iter().filter(Option::is_some).collect();
    value_counts(&observed)
}

fn pressure_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn pressure_counts(values: &[Option<f64>]) -> Vec<(String, usize)> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
    sorted.sort_by(f64::total_cmp);

    let mut bars: Vec<(f64, usize)> = Vec::new();
    for v in sorted {
        match bars.last_mut() {
            Some((last, count)) if *last == v => *count += 1,
            _ => bars.push((v, 1)),
        }
    }
    bars.into_iter().map(|(v, c)| (pressure_label(v), c)).collect()
}

fn planned_charts(
    df: &DataFrame,
    time_window: &TimeWindowSummary,
    taxonomy: &Taxonomy,
) -> Result<Vec<BarChart>> {
    let mut planned = Vec::new();

    for field in CanonicalField::DEMOGRAPHIC {
        if let Some(values) = column_strings(df, field.name())? {
            planned.push(BarChart::new(
                composition_file(field),
                format!("Sample composition: {}", field.label()),
                field.label(),
                value_counts(&values),
            ));
        }
    }

    planned.push(BarChart::new(
        "responses_per_day.svg",
        "Responses per day (collection window)",
        "Date",
        time_window
            .responses_per_day
            .iter()
            .map(|(day, n)| (day.clone(), *n))
            .collect(),
    ));

    if let Some(values) = column_f64(df, PRESSURE_NUM)? {
        planned.push(BarChart::new(
            "pressure_distribution.svg",
            "Academic pressure distribution (1-5)",
            "Pressure (1-5)",
            pressure_counts(&values),
        ));
    }

    if let Some(values) = column_strings(df, CanonicalField::StressFrequency.name())? {
        planned.push(BarChart::new(
            "stress_frequency_distribution.svg",
            "Stress frequency distribution",
            "",
            observed_counts(values),
        ));
    }

    if let Some(values) = column_strings(df, CanonicalField::SleepHours.name())? {
        planned.push(BarChart::new(
            "sleep_distribution.svg",
            "Sleep hours distribution",
            "",
            observed_counts(values),
        ));
    }

    planned.push(BarChart::new(
        "taxonomy_summary.svg",
        "Stress cause taxonomy (cleaned)",
        "",
        taxonomy
            .summary
            .iter()
            .map(|c| (c.category.label().to_string(), c.count))
            .collect(),
    ));

    planned.retain(|plan| !plan.bars.is_empty());
    Ok(planned)
}

fn render_error(chart: &str, reason: impl Display) -> AuditError {
    AuditError::ChartRenderFailed {
        chart: chart.to_string(),
        reason: reason.to_string(),
    }
}

fn render_bar_chart(plan: &BarChart) -> Result<String> {
    let err = |e: &dyn Display| render_error(plan.file_name, e);

    let n = plan.bars.len() as u32;
    let max = plan.bars.iter().map(|(_, c)| *c).max().unwrap_or(0) as u32;
    let y_top = max + max / 10 + 1;
    let labels: Vec<&str> = plan.bars.iter().map(|(label, _)| label.as_str()).collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| err(&e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&plan.title, ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(70)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u32..y_top)
            .map_err(|e| err(&e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|v: &SegmentValue<u32>| match v {
                SegmentValue::CenterOf(i) => {
                    labels.get(*i as usize).map(|s| s.to_string()).unwrap_or_default()
                }
                _ => String::new(),
            })
            .x_desc(plan.x_desc)
            .y_desc("Count")
            .draw()
            .map_err(|e| err(&e))?;

        chart
            .draw_series(plan.bars.iter().enumerate().map(|(i, (_, count))| {
                let i = i as u32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0),
                        (SegmentValue::Exact(i + 1), *count as u32),
                    ],
                    BLUE.mix(0.7).filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))
            .map_err(|e| err(&e))?;

        root.present().map_err(|e| err(&e))?;
    }
    Ok(svg)
}
