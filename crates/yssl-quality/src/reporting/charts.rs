//! Chart-ready series derived from scores and sidecar metrics.
//!
//! Nothing here draws pixels. Each function returns the data a renderer
//! needs, already ordered and classified.

use crate::quality::{Dimension, MetricsSidecar, ScoreSet};
use crate::reporting::categories::{CategoryBreakdown, YearlyBreakdown};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many fields the missingness chart shows by default.
pub const DEFAULT_MISSINGNESS_LIMIT: usize = 10;

/// Colour band of a missingness bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingnessSeverity {
    Low,
    Moderate,
    High,
    Critical,
}

impl MissingnessSeverity {
    /// >80% critical, >50% high, >20% moderate, otherwise low.
    pub fn from_percentage(pct: f64) -> Self {
        if pct > 80.0 {
            Self::Critical
        } else if pct > 50.0 {
            Self::High
        } else if pct > 20.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Critical => "#ef4444",
            Self::High => "#f97316",
            Self::Moderate => "#eab308",
            Self::Low => "#22c55e",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingnessBar {
    pub field: String,
    pub missing_percentage: f64,
    pub severity: MissingnessSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub dimension: Dimension,
    pub label: &'static str,
    pub value: f64,
}

/// All series the presentation layer draws.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub temporal_distribution: Vec<YearCount>,
    pub missingness: Vec<MissingnessBar>,
    pub radar: Vec<RadarPoint>,
    /// Value counts of requested category columns; empty unless asked for.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_breakdowns: Vec<CategoryBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_counts: Option<YearlyBreakdown>,
}

impl ChartData {
    /// Build every series that the available metrics allow.
    ///
    /// Missing sidecar keys produce empty series rather than errors.
    pub fn from_analysis(scores: Option<&ScoreSet>, metrics: &MetricsSidecar) -> Self {
        Self {
            temporal_distribution: metrics
                .year_distribution
                .as_ref()
                .map(temporal_series)
                .unwrap_or_default(),
            missingness: metrics
                .field_missingness
                .as_ref()
                .map(|m| missingness_bars(m, DEFAULT_MISSINGNESS_LIMIT))
                .unwrap_or_default(),
            radar: scores.map(radar_values).unwrap_or_default(),
            category_breakdowns: Vec::new(),
            yearly_counts: None,
        }
    }
}

/// The `limit` most incomplete fields, worst first.
pub fn missingness_bars(
    field_missingness: &BTreeMap<String, f64>,
    limit: usize,
) -> Vec<MissingnessBar> {
    let mut fields: Vec<(&String, f64)> =
        field_missingness.iter().map(|(k, v)| (k, *v)).collect();
    fields.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    fields
        .into_iter()
        .take(limit)
        .map(|(field, pct)| MissingnessBar {
            field: field.clone(),
            missing_percentage: pct,
            severity: MissingnessSeverity::from_percentage(pct),
        })
        .collect()
}

/// Records per year, ascending.
pub fn temporal_series(year_distribution: &BTreeMap<i32, usize>) -> Vec<YearCount> {
    year_distribution
        .iter()
        .map(|(&year, &count)| YearCount { year, count })
        .collect()
}

/// The five scored dimensions, overall excluded.
pub fn radar_values(scores: &ScoreSet) -> Vec<RadarPoint> {
    Dimension::SCORED
        .into_iter()
        .map(|dimension| RadarPoint {
            dimension,
            label: dimension.label(),
            value: scores.get(dimension),
        })
        .collect()
}

/// Fixed-width text bar for a 0-100 percentage.
pub fn text_bar(pct: f64, width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_severity_bands() {
        assert_eq!(MissingnessSeverity::from_percentage(85.0), MissingnessSeverity::Critical);
        assert_eq!(MissingnessSeverity::from_percentage(80.0), MissingnessSeverity::High);
        assert_eq!(MissingnessSeverity::from_percentage(50.0), MissingnessSeverity::Moderate);
        assert_eq!(MissingnessSeverity::from_percentage(20.0), MissingnessSeverity::Low);
        assert_eq!(MissingnessSeverity::from_percentage(0.0), MissingnessSeverity::Low);
        assert_eq!(MissingnessSeverity::Critical.color(), "#ef4444");
    }

    #[test]
    fn test_missingness_bars_sorted_and_limited() {
        let fields: BTreeMap<String, f64> = [
            ("ApplicationNumber", 0.0),
            ("ImageFile", 85.0),
            ("MarkCategory", 80.2),
            ("MarkFeature", 85.0),
            ("MarkDescription", 81.9),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let bars = missingness_bars(&fields, 3);
        let names: Vec<&str> = bars.iter().map(|b| b.field.as_str()).collect();

        // ties on 85.0 are broken alphabetically
        assert_eq!(names, vec!["ImageFile", "MarkFeature", "MarkDescription"]);
        assert!(bars.iter().all(|b| b.severity == MissingnessSeverity::Critical));
    }

    #[test]
    fn test_temporal_series_ascending() {
        let dist: BTreeMap<i32, usize> = [(2024, 2), (1987, 1), (2003, 5)].into_iter().collect();
        let series = temporal_series(&dist);
        assert_eq!(
            series,
            vec![
                YearCount { year: 1987, count: 1 },
                YearCount { year: 2003, count: 5 },
                YearCount { year: 2024, count: 2 },
            ]
        );
    }

    #[test]
    fn test_radar_excludes_overall() {
        let scores = ScoreSet::from_dimensions(4.0, 3.0, 1.0, 5.0, 5.0);
        let radar = radar_values(&scores);
        assert_eq!(radar.len(), 5);
        assert_eq!(radar[0].label, "Accuracy");
        assert_eq!(radar[2].value, 1.0);
        assert!(radar.iter().all(|p| p.dimension != Dimension::Overall));
    }

    #[test]
    fn test_chart_data_tolerates_missing_metrics() {
        let charts = ChartData::from_analysis(None, &MetricsSidecar::default());
        assert_eq!(charts, ChartData::default());
    }

    #[test]
    fn test_text_bar() {
        assert_eq!(text_bar(50.0, 10), "#####.....");
        assert_eq!(text_bar(100.0, 4), "####");
        assert_eq!(text_bar(-3.0, 4), "....");
    }
}
