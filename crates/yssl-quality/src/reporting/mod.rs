//! Report assembly and chart series.
//!
//! [`ReportGenerator`] collects a finished analysis into a [`QualityReport`]
//! and writes it as JSON. The [`charts`] helpers turn sidecar metrics into
//! series ready for plotting, and [`categories`] breaks individual columns
//! down by value and by year.

pub mod categories;
pub mod charts;
mod generator;

pub use categories::{
    BreakdownRequest, CategoryBreakdown, CategoryCount, CompositionSlice, DEFAULT_CATEGORY_LIMIT,
    OTHER_LABEL, YearlyBreakdown, breakdowns, composition, value_counts, year_counts,
};
pub use charts::{
    ChartData, DEFAULT_MISSINGNESS_LIMIT, MissingnessBar, MissingnessSeverity, RadarPoint,
    YearCount, missingness_bars, radar_values, temporal_series, text_bar,
};
pub use generator::{QualityReport, ReportGenerator};
