//! Data Quality Scoring Library
//!
//! Scores tabular open-data datasets (trademark filings, regulatory
//! violation registers and the like) on five quality dimensions, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! - **Accuracy**: duplicate identifiers
//! - **Completeness**: share of non-null cells, plus per-field missingness
//! - **Timeliness**: share of records dated within a recent window
//! - **Accessibility** and **Consistency**: structural checks
//!
//! Each dimension is scored on a 0-5 scale and the overall score is their
//! mean. Alongside the scores the analyzer keeps a [`MetricsSidecar`] of
//! diagnostics that the [`reporting`] module turns into chart series and
//! JSON reports.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use yssl_quality::{AnalyzerConfig, QualityAnalyzer, ReportGenerator, load_csv};
//!
//! let df = load_csv("trademarks.csv")?;
//!
//! let config = AnalyzerConfig::builder()
//!     .duplicate_rate_threshold(0.01)
//!     .reference_year(2024)
//!     .build()?;
//!
//! let mut analyzer = QualityAnalyzer::with_config(&df, config);
//! let scores = analyzer.analyze_all();
//! println!("Overall: {:.2}/5", scores.overall);
//!
//! let report = ReportGenerator::build_report("trademarks.csv", &analyzer)?;
//! ReportGenerator::default().write_report_to_file(&report, "trademarks")?;
//! ```
//!
//! # Data Sources
//!
//! The analyzer works on anything implementing [`Dataset`]. Polars
//! `DataFrame`s implement it directly; [`RecordTable`] is a small row-based
//! implementation for data that does not come from a file.

pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod quality;
pub mod reporting;

// Re-exports for convenient access
pub use config::{
    AnalyzerConfig, AnalyzerConfigBuilder, ConfigValidationError, DEFAULT_IDENTIFIER_CANDIDATES,
    MAX_RECENT_WINDOW_YEARS,
};
pub use dataset::{CellValue, Dataset, RecordTable};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use loader::{SampleDataGenerator, load_csv};
pub use quality::{
    Dimension, MetricsSidecar, QualityAnalyzer, ScoreSet, SummaryReport, find_date_column,
    find_identifier_column,
};
pub use reporting::{
    BreakdownRequest, CategoryBreakdown, ChartData, MissingnessBar, MissingnessSeverity,
    QualityReport, ReportGenerator,
};
