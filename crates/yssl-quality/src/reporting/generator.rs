use crate::dataset::Dataset;
use crate::error::{QualityError, Result};
use crate::quality::{MetricsSidecar, QualityAnalyzer, ScoreSet, SummaryReport};
use crate::reporting::categories::{BreakdownRequest, breakdowns};
use crate::reporting::charts::ChartData;
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything one analysis run produced, in a single serializable value.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Where the data came from (file path or "sample")
    pub source: String,
    pub summary: SummaryReport,
    pub scores: ScoreSet,
    pub metrics: MetricsSidecar,
    pub charts: ChartData,
}

/// Builds quality reports and writes them to disk.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Collect scores, metrics and chart series from a finished analysis.
    ///
    /// Fails if [`QualityAnalyzer::analyze_all`] has not run yet.
    pub fn build_report<D: Dataset + ?Sized>(
        source: &str,
        analyzer: &QualityAnalyzer<'_, D>,
    ) -> Result<QualityReport> {
        Self::build_report_with(source, analyzer, &BreakdownRequest::default())
    }

    /// Like [`build_report`](Self::build_report), adding the category and
    /// yearly breakdowns named in `request`.
    pub fn build_report_with<D: Dataset + ?Sized>(
        source: &str,
        analyzer: &QualityAnalyzer<'_, D>,
        request: &BreakdownRequest,
    ) -> Result<QualityReport> {
        let scores = *analyzer.scores().ok_or_else(|| {
            QualityError::ReportGenerationFailed("analysis has not been run".to_string())
        })?;
        let metrics = analyzer.metrics().clone();
        let mut charts = ChartData::from_analysis(Some(&scores), &metrics);
        if !request.is_empty() {
            let (categories, yearly) = breakdowns(analyzer.dataset(), request)?;
            charts.category_breakdowns = categories;
            charts.yearly_counts = yearly;
        }

        Ok(QualityReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source: source.to_string(),
            summary: analyzer.summary_report()?,
            scores,
            metrics,
            charts,
        })
    }

    /// Write a report as pretty JSON.
    ///
    /// The file is named `<stem>_quality_report.json` inside the output
    /// directory, which is created if needed.
    pub fn write_report_to_file(&self, report: &QualityReport, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_quality_report.json", stem));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn analyzed_frame() -> DataFrame {
        df![
            "ApplicationNumber" => ["CA1", "CA2", "CA2", "CA3"],
            "FilingDate" => [Some("2023-01-01"), Some("1999-09-09"), None, Some("2024-05-05")],
            "ImageFile" => [None::<&str>, None, None, Some("image.png")],
        ]
        .unwrap()
    }

    #[test]
    fn test_build_report_requires_analysis() {
        let df = analyzed_frame();
        let analyzer = QualityAnalyzer::new(&df);

        let err = ReportGenerator::build_report("test.csv", &analyzer).unwrap_err();
        assert_eq!(err.error_code(), "REPORT_GENERATION_FAILED");
    }

    #[test]
    fn test_build_report_contents() {
        let df = analyzed_frame();
        let mut analyzer = QualityAnalyzer::new(&df);
        let scores = analyzer.analyze_all();

        let report = ReportGenerator::build_report("test.csv", &analyzer).unwrap();

        assert_eq!(report.source, "test.csv");
        assert_eq!(report.scores, scores);
        assert_eq!(report.summary.total_records, 4);
        assert_eq!(report.summary.missing_cells, 4);
        assert_eq!(report.charts.radar.len(), 5);
        assert_eq!(report.charts.missingness[0].field, "ImageFile");
        assert_eq!(report.charts.temporal_distribution.len(), 3);
    }

    #[test]
    fn test_build_report_with_breakdowns() {
        let df = analyzed_frame();
        let mut analyzer = QualityAnalyzer::new(&df);
        analyzer.analyze_all();
        let request = BreakdownRequest::new()
            .category("ApplicationNumber")
            .year_column("FilingDate");

        let report = ReportGenerator::build_report_with("test.csv", &analyzer, &request).unwrap();

        let counts = &report.charts.category_breakdowns[0].counts;
        assert_eq!(counts[0].label, "CA2");
        assert_eq!(counts[0].count, 2);
        let yearly = report.charts.yearly_counts.unwrap();
        assert_eq!(yearly.column, "FilingDate");
        assert_eq!(yearly.counts.len(), 3);

        let plain = ReportGenerator::build_report("test.csv", &analyzer).unwrap();
        assert!(plain.charts.category_breakdowns.is_empty());
        assert!(plain.charts.yearly_counts.is_none());
    }

    #[test]
    fn test_write_report_to_file() {
        let df = analyzed_frame();
        let mut analyzer = QualityAnalyzer::new(&df);
        analyzer.analyze_all();
        let report = ReportGenerator::build_report("sample", &analyzer).unwrap();

        let dir = std::env::temp_dir().join(format!("yssl_report_{}", std::process::id()));
        let generator = ReportGenerator::new(&dir);
        let path = generator.write_report_to_file(&report, "trademarks").unwrap();

        assert!(path.ends_with("trademarks_quality_report.json"));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["source"], "sample");
        assert!(written["scores"]["overall"].is_number());
        assert!(written["metrics"]["field_missingness"].is_object());

        fs::remove_dir_all(&dir).ok();
    }
}
