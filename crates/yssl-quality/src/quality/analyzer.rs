use crate::config::AnalyzerConfig;
use crate::dataset::{CellValue, Dataset};
use crate::error::{Result, ResultExt};
use crate::quality::columns::{find_date_column, find_identifier_column};
use crate::quality::dates::coerce_date;
use crate::quality::scores::{
    MAX_SCORE, MIN_SCORE, MetricsSidecar, ScoreSet, SummaryReport, clamp_score,
    completeness_bucket, timeliness_bucket,
};
use chrono::Datelike;
use std::collections::{BTreeMap, HashSet};
use tracing::{Span, debug, info, info_span, warn};

/// Timeliness score when the dataset has no date column.
pub const NEUTRAL_TIMELINESS_SCORE: f64 = 3.0;
/// Timeliness score when the date column cannot be read at all.
pub const TIMELINESS_FALLBACK_SCORE: f64 = 2.0;
/// Timeliness score when no value in the date column parses.
pub const NO_VALID_DATES_SCORE: f64 = 1.0;
/// Lowest score a non-empty dimension is allowed to report.
pub const SCORE_FLOOR: f64 = 1.0;

/// Scores a tabular dataset on five quality dimensions.
///
/// The analyzer borrows the dataset and accumulates a [`MetricsSidecar`]
/// as each dimension runs. Dimensions can be computed one at a time, but
/// [`QualityAnalyzer::analyze_all`] is the normal entry point.
///
/// Logging goes through `tracing`. Every event is emitted inside the
/// analyzer's span, which defaults to a `quality_analysis` span and can be
/// replaced with [`QualityAnalyzer::with_span`].
///
/// # Example
///
/// ```rust,ignore
/// use yssl_quality::QualityAnalyzer;
///
/// let df = yssl_quality::loader::load_csv("trademarks.csv")?;
/// let mut analyzer = QualityAnalyzer::new(&df);
/// let scores = analyzer.analyze_all();
/// println!("Overall: {:.2}/5", scores.overall);
/// ```
pub struct QualityAnalyzer<'a, D: Dataset + ?Sized> {
    dataset: &'a D,
    config: AnalyzerConfig,
    span: Span,
    metrics: MetricsSidecar,
    scores: Option<ScoreSet>,
}

struct Missingness {
    per_field: BTreeMap<String, f64>,
    missing_cells: usize,
    total_cells: usize,
}

impl<'a, D: Dataset + ?Sized> QualityAnalyzer<'a, D> {
    /// Create an analyzer with the default configuration.
    pub fn new(dataset: &'a D) -> Self {
        Self::with_config(dataset, AnalyzerConfig::default())
    }

    pub fn with_config(dataset: &'a D, config: AnalyzerConfig) -> Self {
        let span = info_span!(
            "quality_analysis",
            records = dataset.row_count(),
            fields = dataset.column_count()
        );
        Self {
            dataset,
            config,
            span,
            metrics: MetricsSidecar::default(),
            scores: None,
        }
    }

    /// Replace the span all analyzer events are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The dataset being scored.
    pub fn dataset(&self) -> &'a D {
        self.dataset
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Diagnostics collected so far.
    pub fn metrics(&self) -> &MetricsSidecar {
        &self.metrics
    }

    /// Scores from the last [`QualityAnalyzer::analyze_all`] run.
    pub fn scores(&self) -> Option<&ScoreSet> {
        self.scores.as_ref()
    }

    /// Run all five dimensions in order and average them.
    ///
    /// Never fails: each dimension degrades to a default score on bad input.
    pub fn analyze_all(&mut self) -> ScoreSet {
        let span = self.span.clone();
        let _guard = span.enter();
        info!("Running quality analysis...");

        self.metrics = MetricsSidecar::default();

        let accuracy = self.analyze_accuracy();
        let completeness = self.analyze_completeness();
        let timeliness = self.analyze_timeliness();
        let accessibility = self.analyze_accessibility();
        let consistency = self.analyze_consistency();

        let scores = ScoreSet::from_dimensions(
            accuracy,
            completeness,
            timeliness,
            accessibility,
            consistency,
        );

        info!("Overall quality score: {:.2}/5", scores.overall);
        self.scores = Some(scores);
        scores
    }

    /// Duplicate identifiers. Loses one point above the configured rate.
    pub fn analyze_accuracy(&mut self) -> f64 {
        let span = self.span.clone();
        let _guard = span.enter();

        let mut score = MAX_SCORE;
        let mut issues = Vec::new();

        match self.duplicate_rate() {
            Ok(Some((column, rate))) => {
                debug!(column = %column, duplicate_rate = rate, "Checked identifier duplicates");
                if rate > self.config.duplicate_rate_threshold {
                    score -= 1.0;
                    issues.push(format!("High duplicate rate: {:.1}%", rate * 100.0));
                }
            }
            Ok(None) => debug!("No identifier column or no records; skipping duplicate check"),
            Err(e) => warn!("Error analyzing accuracy: {}", e),
        }

        self.metrics.accuracy_issues = Some(issues);
        clamp_score(score)
    }

    /// Share of non-null cells, bucketed into 1..=5.
    pub fn analyze_completeness(&mut self) -> f64 {
        let span = self.span.clone();
        let _guard = span.enter();

        let missingness = match self.missingness() {
            Ok(m) => m,
            Err(e) => {
                warn!("Error analyzing completeness: {}", e);
                return SCORE_FLOOR;
            }
        };

        let rate = if missingness.total_cells == 0 {
            0.0
        } else {
            1.0 - missingness.missing_cells as f64 / missingness.total_cells as f64
        };
        debug!(
            missing_cells = missingness.missing_cells,
            total_cells = missingness.total_cells,
            completeness_rate = rate,
            "Computed completeness"
        );

        self.metrics.field_missingness = Some(missingness.per_field);
        self.metrics.overall_completeness = Some(rate);

        if missingness.total_cells == 0 {
            SCORE_FLOOR
        } else {
            completeness_bucket(rate)
        }
    }

    /// Share of dated records within the recent window, bucketed into 1..=5.
    pub fn analyze_timeliness(&mut self) -> f64 {
        let span = self.span.clone();
        let _guard = span.enter();

        let columns = self.dataset.columns();
        let Some(column) = find_date_column(&columns) else {
            debug!("No date column found; using neutral timeliness score");
            return NEUTRAL_TIMELINESS_SCORE;
        };

        let values = match self.dataset.column_values(column) {
            Ok(values) => values,
            Err(e) => {
                warn!("Error analyzing timeliness: {}", e);
                return TIMELINESS_FALLBACK_SCORE;
            }
        };

        let years: Vec<i32> = values
            .iter()
            .filter(|v| !self.dataset.is_null(v))
            .filter_map(coerce_date)
            .map(|d| d.year())
            .collect();

        if years.is_empty() {
            debug!(column, "No parseable dates");
            return NO_VALID_DATES_SCORE;
        }

        let cutoff = self.config.recent_cutoff_year();
        let recent = years.iter().filter(|&&year| year >= cutoff).count();
        let recent_rate = recent as f64 / years.len() as f64;

        let mut distribution = BTreeMap::new();
        for year in &years {
            *distribution.entry(*year).or_insert(0usize) += 1;
        }

        debug!(
            column,
            valid_dates = years.len(),
            cutoff_year = cutoff,
            recent_rate,
            "Computed timeliness"
        );

        self.metrics.recent_record_rate = Some(recent_rate);
        self.metrics.year_distribution = Some(distribution);

        timeliness_bucket(recent_rate)
    }

    /// 0 for an empty dataset, otherwise 5.
    pub fn analyze_accessibility(&mut self) -> f64 {
        let span = self.span.clone();
        let _guard = span.enter();

        if self.dataset.row_count() == 0 {
            debug!("Empty dataset; accessibility is zero");
            return MIN_SCORE;
        }

        self.metrics.record_count = Some(self.dataset.row_count());
        self.metrics.field_count = Some(self.dataset.column_count());
        MAX_SCORE.max(SCORE_FLOOR)
    }

    /// Always 5; records the field count.
    pub fn analyze_consistency(&mut self) -> f64 {
        let span = self.span.clone();
        let _guard = span.enter();

        self.metrics.dtype_consistency = Some(self.dataset.column_count());
        MAX_SCORE.max(SCORE_FLOOR)
    }

    /// Dataset shape, missing cells and the latest scores.
    pub fn summary_report(&self) -> Result<SummaryReport> {
        Ok(SummaryReport {
            total_records: self.dataset.row_count(),
            total_fields: self.dataset.column_count(),
            missing_cells: self
                .missingness()
                .context("Counting missing cells for summary")?
                .missing_cells,
            completeness_rate: self.metrics.overall_completeness.unwrap_or(0.0),
            quality_scores: self.scores,
        })
    }

    fn duplicate_rate(&self) -> Result<Option<(String, f64)>> {
        let total = self.dataset.row_count();
        if total == 0 {
            return Ok(None);
        }

        let columns = self.dataset.columns();
        let Some(column) = find_identifier_column(&columns, &self.config.identifier_candidates)
        else {
            return Ok(None);
        };

        let values = self.dataset.column_values(column)?;
        let mut seen: HashSet<&CellValue> = HashSet::with_capacity(values.len());
        let duplicates = values.iter().filter(|v| !seen.insert(*v)).count();

        Ok(Some((column.to_string(), duplicates as f64 / total as f64)))
    }

    fn missingness(&self) -> Result<Missingness> {
        let rows = self.dataset.row_count();
        let columns = self.dataset.columns();

        let mut per_field = BTreeMap::new();
        let mut missing_cells = 0;
        for column in &columns {
            let missing = self.dataset.null_count(column)?;
            missing_cells += missing;
            let pct = if rows == 0 {
                0.0
            } else {
                round2(missing as f64 / rows as f64 * 100.0)
            };
            per_field.insert(column.clone(), pct);
        }

        Ok(Missingness {
            per_field,
            missing_cells,
            total_cells: rows * columns.len(),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
