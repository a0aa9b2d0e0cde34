//! Score and diagnostic types produced by the analyzer.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Lowest and highest score any dimension can take.
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 5.0;

/// One quality axis, plus the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Accuracy,
    Completeness,
    Timeliness,
    Accessibility,
    Consistency,
    Overall,
}

impl Dimension {
    /// The five scored dimensions, in evaluation order.
    pub const SCORED: [Dimension; 5] = [
        Dimension::Accuracy,
        Dimension::Completeness,
        Dimension::Timeliness,
        Dimension::Accessibility,
        Dimension::Consistency,
    ];

    /// All six entries of a [`ScoreSet`].
    pub const ALL: [Dimension; 6] = [
        Dimension::Accuracy,
        Dimension::Completeness,
        Dimension::Timeliness,
        Dimension::Accessibility,
        Dimension::Consistency,
        Dimension::Overall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Accuracy => "accuracy",
            Dimension::Completeness => "completeness",
            Dimension::Timeliness => "timeliness",
            Dimension::Accessibility => "accessibility",
            Dimension::Consistency => "consistency",
            Dimension::Overall => "overall",
        }
    }

    /// Display label, e.g. "Accuracy".
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Accuracy => "Accuracy",
            Dimension::Completeness => "Completeness",
            Dimension::Timeliness => "Timeliness",
            Dimension::Accessibility => "Accessibility",
            Dimension::Consistency => "Consistency",
            Dimension::Overall => "Overall",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores for every dimension of one analysis run.
///
/// Serializes as a JSON object keyed by dimension name.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoreSet {
    pub accuracy: f64,
    pub completeness: f64,
    pub timeliness: f64,
    pub accessibility: f64,
    pub consistency: f64,
    pub overall: f64,
}

impl ScoreSet {
    /// Build a score set whose `overall` is the mean of the five dimensions.
    pub fn from_dimensions(
        accuracy: f64,
        completeness: f64,
        timeliness: f64,
        accessibility: f64,
        consistency: f64,
    ) -> Self {
        let overall = (accuracy + completeness + timeliness + accessibility + consistency)
            / Dimension::SCORED.len() as f64;
        Self {
            accuracy,
            completeness,
            timeliness,
            accessibility,
            consistency,
            overall,
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Accuracy => self.accuracy,
            Dimension::Completeness => self.completeness,
            Dimension::Timeliness => self.timeliness,
            Dimension::Accessibility => self.accessibility,
            Dimension::Consistency => self.consistency,
            Dimension::Overall => self.overall,
        }
    }

    /// All six `(dimension, score)` pairs in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(|d| (d, self.get(d)))
    }
}

impl Serialize for ScoreSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Dimension::ALL.len()))?;
        for (dimension, score) in self.iter() {
            map.serialize_entry(dimension.as_str(), &score)?;
        }
        map.end()
    }
}

/// Diagnostics gathered while scoring.
///
/// Each field is filled by the dimension that computes it. Absent fields are
/// skipped when serialized, so consumers must not assume any key exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSidecar {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy_issues: Option<Vec<String>>,
    /// Field name to missing percentage (0-100, two decimals).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_missingness: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_completeness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_record_rate: Option<f64>,
    /// Year to record count, ascending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_distribution: Option<BTreeMap<i32, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtype_consistency: Option<usize>,
}

/// Read-only summary of a dataset and its latest scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub total_records: usize,
    pub total_fields: usize,
    pub missing_cells: usize,
    pub completeness_rate: f64,
    #[serde(serialize_with = "serialize_optional_scores")]
    pub quality_scores: Option<ScoreSet>,
}

fn serialize_optional_scores<S>(scores: &Option<ScoreSet>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match scores {
        Some(scores) => scores.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Clamp a score into `[MIN_SCORE, MAX_SCORE]`.
pub(crate) fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Completeness rate to score: >=0.9 -> 5, >=0.7 -> 4, >=0.5 -> 3, >=0.3 -> 2, else 1.
pub(crate) fn completeness_bucket(rate: f64) -> f64 {
    if rate >= 0.9 {
        5.0
    } else if rate >= 0.7 {
        4.0
    } else if rate >= 0.5 {
        3.0
    } else if rate >= 0.3 {
        2.0
    } else {
        1.0
    }
}

/// Recent-record rate to score: >=0.5 -> 5, >=0.3 -> 4, >=0.1 -> 3, >=0.05 -> 2, else 1.
pub(crate) fn timeliness_bucket(rate: f64) -> f64 {
    if rate >= 0.5 {
        5.0
    } else if rate >= 0.3 {
        4.0
    } else if rate >= 0.1 {
        3.0
    } else if rate >= 0.05 {
        2.0
    } else {
        1.0
    }
}

static_assertions::assert_impl_all!(ScoreSet: Send, Sync, Copy);
static_assertions::assert_impl_all!(MetricsSidecar: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_is_mean() {
        let scores = ScoreSet::from_dimensions(4.0, 1.0, 3.0, 5.0, 5.0);
        assert!((scores.overall - 3.6).abs() < 1e-12);
    }

    #[test]
    fn test_score_set_serializes_as_map() {
        let scores = ScoreSet::from_dimensions(5.0, 5.0, 5.0, 5.0, 5.0);
        let value = serde_json::to_value(scores).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        assert_eq!(obj["timeliness"], 5.0);
        assert_eq!(obj["overall"], 5.0);
    }

    #[test]
    fn test_score_set_iter_order() {
        let scores = ScoreSet::from_dimensions(1.0, 2.0, 3.0, 4.0, 5.0);
        let dims: Vec<_> = scores.iter().map(|(d, _)| d).collect();
        assert_eq!(dims, Dimension::ALL.to_vec());
        assert_eq!(scores.get(Dimension::Timeliness), 3.0);
    }

    #[test]
    fn test_completeness_bucket_boundaries() {
        assert_eq!(completeness_bucket(1.0), 5.0);
        assert_eq!(completeness_bucket(0.9), 5.0);
        assert_eq!(completeness_bucket(0.899), 4.0);
        assert_eq!(completeness_bucket(0.7), 4.0);
        assert_eq!(completeness_bucket(0.5), 3.0);
        assert_eq!(completeness_bucket(0.3), 2.0);
        assert_eq!(completeness_bucket(0.29), 1.0);
        assert_eq!(completeness_bucket(0.0), 1.0);
    }

    #[test]
    fn test_timeliness_bucket_boundaries() {
        assert_eq!(timeliness_bucket(0.5), 5.0);
        assert_eq!(timeliness_bucket(0.3), 4.0);
        assert_eq!(timeliness_bucket(0.1), 3.0);
        assert_eq!(timeliness_bucket(0.05), 2.0);
        assert_eq!(timeliness_bucket(0.049), 1.0);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-1.0), 0.0);
        assert_eq!(clamp_score(6.5), 5.0);
        assert_eq!(clamp_score(4.0), 4.0);
    }

    #[test]
    fn test_sidecar_skips_absent_keys() {
        let sidecar = MetricsSidecar {
            field_count: Some(3),
            ..Default::default()
        };
        let json = serde_json::to_string(&sidecar).unwrap();
        assert_eq!(json, r#"{"field_count":3}"#);
    }

    #[test]
    fn test_summary_without_scores_serializes_empty_map() {
        let summary = SummaryReport {
            total_records: 0,
            total_fields: 2,
            missing_cells: 0,
            completeness_rate: 0.0,
            quality_scores: None,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["quality_scores"], serde_json::json!({}));
    }

    #[test]
    fn test_dimension_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Dimension::Accessibility).unwrap(),
            r#""accessibility""#
        );
        assert_eq!(Dimension::Overall.to_string(), "overall");
    }
}
