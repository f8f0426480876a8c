//! CLI entry point for the survey audit.

use anyhow::{Result, anyhow};
use clap::Parser;
use survey_audit::{AuditConfig, AuditPipeline, AuditResult, io};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Student survey quality & bias audit",
    long_about = "Audits a survey CSV for coverage gaps, sampling bias and measurement risk,\n\
                  and normalizes free-text stress causes into a fixed taxonomy.\n\n\
                  EXAMPLES:\n  \
                  # Audit with default output locations\n  \
                  survey-audit -i data/raw/survey.csv\n\n  \
                  # Custom outputs, no charts\n  \
                  survey-audit -i survey.csv -o results --no-charts\n\n  \
                  # Machine-readable summary only\n  \
                  survey-audit -i survey.csv --json"
)]
struct Args {
    /// Path to the input CSV
    #[arg(short, long)]
    input: String,

    /// Outputs directory (summary JSON and CSV tables)
    #[arg(short, long, default_value = "outputs")]
    out: String,

    /// Report markdown path
    #[arg(long, default_value = "reports/audit_report.md")]
    report: String,

    /// Figures directory
    #[arg(long, default_value = "reports/figures")]
    figures: String,

    /// Processed (canonical) dataset CSV path
    #[arg(long, default_value = "data/processed/processed_survey.csv")]
    processed: String,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Print the audit summary as JSON to stdout (disables logging)
    #[arg(long)]
    json: bool,

    /// Suppress progress output (only show warnings and the final result)
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str, quiet: bool, json_output: bool) {
    // stdout carries only the JSON summary in --json mode
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = AuditConfig::builder()
        .output_dir(&args.out)
        .report_path(&args.report)
        .figures_dir(&args.figures)
        .processed_path(&args.processed)
        .render_charts(!args.no_charts)
        .build()?;

    info!("Loading dataset from: {}", args.input);
    let data = io::read_csv(&args.input).map_err(|e| {
        error!("{}", e);
        anyhow!(e)
    })?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let mut builder = AuditPipeline::builder().config(config.clone());
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    let result = builder.build()?.run(data)?;
    io::persist(&result, &config)?;

    if args.json {
        println!("{}", result.summary.to_json_pretty()?);
    } else {
        print_summary(&result, &config);
    }
    Ok(())
}

/// Human-readable completion summary.
///
/// Uses `println!` so it stays visible regardless of log level.
fn print_summary(result: &AuditResult, config: &AuditConfig) {
    println!("\nDone! Audit project outputs created.");
    println!("Outputs folder: {}", config.output_dir.display());
    println!("Report: {}", config.report_path.display());
    println!("Figures: {}", config.figures_dir.display());
    println!("Responses analyzed: {}\n", result.summary.profile.n_rows);
}
