//! CLI entry point for the data quality scorer.

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use yssl_quality::reporting::{DEFAULT_CATEGORY_LIMIT, text_bar};
use yssl_quality::{
    AnalyzerConfig, BreakdownRequest, Dimension, QualityAnalyzer, QualityError, QualityReport,
    QualityResult, ReportGenerator, SampleDataGenerator, load_csv,
};

/// Records generated when neither `--input` nor `--sample` is given.
const DEFAULT_SAMPLE_SIZE: usize = 1000;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Multi-dimensional data quality scoring",
    long_about = "Scores a tabular dataset on accuracy, completeness, timeliness,\n\
                  accessibility and consistency (0-5 each) and reports the mean.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG              Log filter, overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  # Score a CSV file\n  \
                  yssl-quality -i trademarks.csv\n\n  \
                  # Score 5000 generated trademark records\n  \
                  yssl-quality --sample 5000 --seed 7\n\n  \
                  # Pin the timeliness window and save a JSON report\n  \
                  yssl-quality -i trademarks.csv --reference-year 2024 --emit-report\n\n  \
                  # Break violations down by type, city and year\n  \
                  yssl-quality -i violations.csv -b ViolationType -b City --year-column Year"
)]
struct Args {
    /// Path to the CSV file to score
    #[arg(short, long, conflicts_with = "sample")]
    input: Option<String>,

    /// Score a generated trademark dataset with this many records
    ///
    /// Used with 1000 records when no input file is given
    #[arg(long)]
    sample: Option<usize>,

    /// Seed for the sample generator
    #[arg(long, default_value_t = SampleDataGenerator::DEFAULT_SEED)]
    seed: u64,

    /// Output directory for reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Year timeliness is measured against (defaults to the current year)
    #[arg(long)]
    reference_year: Option<i32>,

    /// Duplicate identifier rate (0.0 - 1.0) above which accuracy loses a point
    #[arg(long, default_value = "0.01")]
    duplicate_threshold: f64,

    /// Column to break down by value (repeatable)
    #[arg(short, long = "breakdown", value_name = "COLUMN")]
    breakdowns: Vec<String>,

    /// Year or date column to count records per year
    #[arg(long, value_name = "COLUMN")]
    year_column: Option<String>,

    /// Categories kept per breakdown before the rest is grouped as "Other"
    #[arg(long, default_value_t = DEFAULT_CATEGORY_LIMIT)]
    breakdown_limit: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logging; only the report JSON is written. Failures are
    /// written as {"error": {"code", "message"}}.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_quality_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries
/// the report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
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

/// Error body printed to stdout in `--json` mode.
#[derive(Serialize)]
struct ErrorOutput<'a> {
    error: &'a QualityError,
}

fn main() -> Result<()> {
    // .env may set RUST_LOG, so load it before the subscriber reads the environment
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let (report, stem) = match run_analysis(&args) {
        Ok(done) => done,
        Err(e) if args.json => {
            println!("{}", serde_json::to_string_pretty(&ErrorOutput { error: &e })?);
            std::process::exit(1);
        }
        Err(e) => {
            error!(code = e.error_code(), "{}", e);
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let generator = ReportGenerator::new(PathBuf::from(&args.output));
        let report_path = generator.write_report_to_file(&report, &stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Load, score and report. Returns the report and its file stem.
fn run_analysis(args: &Args) -> QualityResult<(QualityReport, String)> {
    let (source, stem, data) = load_dataset(args)?;
    info!("Dataset loaded: {} rows x {} columns", data.height(), data.width());

    let mut builder = AnalyzerConfig::builder().duplicate_rate_threshold(args.duplicate_threshold);
    if let Some(year) = args.reference_year {
        builder = builder.reference_year(year);
    }
    let config = builder.build()?;

    let mut analyzer = QualityAnalyzer::with_config(&data, config);
    analyzer.analyze_all();

    let request = BreakdownRequest {
        category_columns: args.breakdowns.clone(),
        year_column: args.year_column.clone(),
        limit: args.breakdown_limit,
    };
    let report = ReportGenerator::build_report_with(&source, &analyzer, &request)?;

    Ok((report, stem))
}

/// Load the input file, or generate sample data when there is none.
///
/// Returns the source label, the report file stem and the data.
fn load_dataset(args: &Args) -> QualityResult<(String, String, DataFrame)> {
    match &args.input {
        Some(input) => {
            info!("Loading dataset from: {}", input);
            let data = load_csv(input)?;
            Ok((input.clone(), extract_file_stem(input), data))
        }
        None => {
            let records = args.sample.unwrap_or(DEFAULT_SAMPLE_SIZE);
            let data = SampleDataGenerator::new(args.seed).generate(records)?;
            Ok(("sample".to_string(), "sample".to_string(), data))
        }
    }
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print scores, summary and the worst fields.
///
/// Uses `println!` rather than logging so the result is visible at any log level.
fn print_human_readable_summary(report: &QualityReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("DATA QUALITY REPORT");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Source: {} ({} rows x {} columns)",
        report.source, summary.total_records, summary.total_fields
    );
    println!();

    println!("Quality Scores:");
    for dimension in Dimension::ALL {
        println!(
            "  {:<15} {:.2}/5",
            dimension.label(),
            report.scores.get(dimension)
        );
    }
    println!();

    println!("Summary:");
    println!("  Missing cells: {}", summary.missing_cells);
    println!("  Completeness: {:.1}%", summary.completeness_rate * 100.0);
    if let Some(rate) = report.metrics.recent_record_rate {
        println!("  Recent records: {:.1}%", rate * 100.0);
    }
    println!();

    if !report.charts.missingness.is_empty() {
        println!("Missing Data by Field:");
        for bar in &report.charts.missingness {
            println!(
                "  {:<24} {} {:>6.1}%",
                truncate_str(&bar.field, 23),
                text_bar(bar.missing_percentage, 30),
                bar.missing_percentage
            );
        }
        println!();
    }

    for breakdown in &report.charts.category_breakdowns {
        println!("{} (top {}):", breakdown.column, breakdown.counts.len());
        for slice in &breakdown.composition {
            println!(
                "  {:<24} {:>6} {:>6.1}%",
                truncate_str(&slice.label, 23),
                slice.count,
                slice.percentage
            );
        }
        println!();
    }

    if let Some(yearly) = &report.charts.yearly_counts {
        println!("Records by {}:", yearly.column);
        for point in &yearly.counts {
            println!("  {} {:>6}", point.year, point.count);
        }
        println!();
    }

    if let Some(issues) = report.metrics.accuracy_issues.as_ref().filter(|i| !i.is_empty()) {
        println!("Issues:");
        for issue in issues {
            println!("  ! {}", issue);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save the JSON report");
    println!("{}", "=".repeat(80));
}

/// Truncate a string to a maximum length, adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
