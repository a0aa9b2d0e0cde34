//! Category breakdowns of individual columns.
//!
//! Counts how often each value of a column occurs (violation types, cities),
//! how many records fall in each year, and the share each category makes up
//! of the whole.

use crate::dataset::{CellValue, Dataset};
use crate::error::{Result, ResultExt};
use crate::quality::coerce_date;
use crate::reporting::charts::YearCount;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// How many categories a breakdown keeps by default.
pub const DEFAULT_CATEGORY_LIMIT: usize = 10;

/// Composition label for everything outside the top categories.
pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionSlice {
    pub label: String,
    pub count: usize,
    /// Share of all non-null values, rounded to one decimal.
    pub percentage: f64,
}

/// Most frequent values of one column and their shares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub column: String,
    pub counts: Vec<CategoryCount>,
    pub composition: Vec<CompositionSlice>,
}

/// Records per year of one year or date column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyBreakdown {
    pub column: String,
    pub counts: Vec<YearCount>,
}

/// Columns a report breaks down.
///
/// # Example
///
/// ```rust,ignore
/// use yssl_quality::reporting::BreakdownRequest;
///
/// let request = BreakdownRequest::new()
///     .category("ViolationType")
///     .category("City")
///     .year_column("Year")
///     .limit(5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRequest {
    pub category_columns: Vec<String>,
    pub year_column: Option<String>,
    pub limit: usize,
}

impl Default for BreakdownRequest {
    fn default() -> Self {
        Self {
            category_columns: Vec::new(),
            year_column: None,
            limit: DEFAULT_CATEGORY_LIMIT,
        }
    }
}

impl BreakdownRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, column: impl Into<String>) -> Self {
        self.category_columns.push(column.into());
        self
    }

    pub fn year_column(mut self, column: impl Into<String>) -> Self {
        self.year_column = Some(column.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category_columns.is_empty() && self.year_column.is_none()
    }
}

impl CategoryBreakdown {
    /// Top `limit` values of `column`, plus a composition with an
    /// [`OTHER_LABEL`] slice for the rest.
    pub fn from_column<D: Dataset + ?Sized>(
        dataset: &D,
        column: &str,
        limit: usize,
    ) -> Result<Self> {
        let all = value_counts(dataset, column)?;
        Ok(Self {
            column: column.to_string(),
            composition: composition(&all, limit),
            counts: all.into_iter().take(limit).collect(),
        })
    }
}

/// Occurrences of each non-null value, most frequent first.
///
/// Ties are ordered by label.
pub fn value_counts<D: Dataset + ?Sized>(dataset: &D, column: &str) -> Result<Vec<CategoryCount>> {
    let values = dataset
        .column_values(column)
        .context(format!("Counting values of '{}'", column))?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values.iter().filter(|v| !dataset.is_null(v)) {
        if let Some(label) = cell_label(value) {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    Ok(counts)
}

/// Records per year, ascending.
///
/// Integer cells are read as years; text and date cells go through the
/// usual date coercion. Cells with no year are skipped.
pub fn year_counts<D: Dataset + ?Sized>(dataset: &D, column: &str) -> Result<Vec<YearCount>> {
    let values = dataset
        .column_values(column)
        .context(format!("Counting years of '{}'", column))?;

    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for year in values
        .iter()
        .filter(|v| !dataset.is_null(v))
        .filter_map(cell_year)
    {
        *years.entry(year).or_insert(0) += 1;
    }

    Ok(years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect())
}

/// Shares of the first `limit` categories, with the remainder folded into
/// one [`OTHER_LABEL`] slice.
pub fn composition(counts: &[CategoryCount], limit: usize) -> Vec<CompositionSlice> {
    let total: usize = counts.iter().map(|c| c.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let slice = |label: String, count: usize| CompositionSlice {
        label,
        count,
        percentage: (count as f64 / total as f64 * 1000.0).round() / 10.0,
    };

    let mut slices: Vec<CompositionSlice> = counts
        .iter()
        .take(limit)
        .map(|c| slice(c.label.clone(), c.count))
        .collect();

    let shown: usize = slices.iter().map(|s| s.count).sum();
    if shown < total {
        slices.push(slice(OTHER_LABEL.to_string(), total - shown));
    }
    slices
}

/// Every breakdown in `request` that the dataset has a column for.
///
/// Columns that do not exist are skipped with a warning.
pub fn breakdowns<D: Dataset + ?Sized>(
    dataset: &D,
    request: &BreakdownRequest,
) -> Result<(Vec<CategoryBreakdown>, Option<YearlyBreakdown>)> {
    let columns = dataset.columns();
    let present = |name: &str| {
        let found = columns.iter().any(|c| c == name);
        if !found {
            warn!("Column '{}' not found; skipping breakdown", name);
        }
        found
    };

    let mut categories = Vec::new();
    for column in request.category_columns.iter().filter(|c| present(c)) {
        categories.push(CategoryBreakdown::from_column(dataset, column, request.limit)?);
    }

    let yearly = match request.year_column.as_deref().filter(|c| present(c)) {
        Some(column) => Some(YearlyBreakdown {
            column: column.to_string(),
            counts: year_counts(dataset, column)?,
        }),
        None => None,
    };

    debug!(
        categories = categories.len(),
        yearly = yearly.is_some(),
        "Built category breakdowns"
    );
    Ok((categories, yearly))
}

fn cell_label(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Null => None,
        CellValue::Bool(v) => Some(v.to_string()),
        CellValue::Int(v) => Some(v.to_string()),
        CellValue::Float(v) if v.is_nan() => None,
        CellValue::Float(v) => Some(v.to_string()),
        CellValue::Str(v) => Some(v.clone()),
        CellValue::Date(v) => Some(v.format("%Y-%m-%d").to_string()),
        CellValue::DateTime(v) => Some(v.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}

fn cell_year(value: &CellValue) -> Option<i32> {
    match value {
        CellValue::Int(v) => i32::try_from(*v).ok().filter(|y| (1..=9999).contains(y)),
        CellValue::Float(v) if v.fract() == 0.0 && (1.0..=9999.0).contains(v) => Some(*v as i32),
        other => coerce_date(other).map(|d| d.year()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RecordTable;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn count(label: &str, count: usize) -> CategoryCount {
        CategoryCount {
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn test_value_counts_sorted_with_ties_by_label() {
        let df = df![
            "City" => [Some("Toronto"), Some("Ottawa"), None, Some("Toronto"), Some("Hamilton")]
        ]
        .unwrap();

        let counts = value_counts(&df, "City").unwrap();

        assert_eq!(
            counts,
            vec![count("Toronto", 2), count("Hamilton", 1), count("Ottawa", 1)]
        );
    }

    #[test]
    fn test_value_counts_missing_column() {
        let df = df!["City" => ["Toronto"]].unwrap();
        let err = value_counts(&df, "Region").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert!(err.to_string().starts_with("Counting values of 'Region'"));
    }

    #[test]
    fn test_year_counts_from_integers_and_dates() {
        let table = RecordTable::new(["Year"])
            .with_record([("Year", CellValue::Int(2021))])
            .unwrap()
            .with_record([("Year", CellValue::from("2019-03-01"))])
            .unwrap()
            .with_record([("Year", CellValue::Int(2021))])
            .unwrap()
            .with_record([("Year", CellValue::from("unknown"))])
            .unwrap()
            .with_record([("Year", CellValue::Null)])
            .unwrap();

        assert_eq!(
            year_counts(&table, "Year").unwrap(),
            vec![
                YearCount { year: 2019, count: 1 },
                YearCount { year: 2021, count: 2 },
            ]
        );
    }

    #[test]
    fn test_composition_folds_remainder() {
        let counts = vec![
            count("Unpaid wages", 3),
            count("Overtime pay", 2),
            count("Vacation pay", 3),
        ];

        let slices = composition(&counts, 2);

        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Unpaid wages", "Overtime pay", "Other"]);
        assert_eq!(slices[0].percentage, 37.5);
        assert_eq!(slices[1].percentage, 25.0);
        assert_eq!(slices[2].count, 3);
    }

    #[test]
    fn test_composition_without_remainder_or_values() {
        let slices = composition(&[count("Word", 1), count("Design", 1)], 5);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].percentage, 50.0);

        assert!(composition(&[], 5).is_empty());
    }

    #[test]
    fn test_breakdowns_skip_absent_columns() {
        let df = df![
            "ViolationType" => ["Unpaid wages", "Overtime pay", "Unpaid wages"],
            "Year" => [2021i64, 2022, 2022],
        ]
        .unwrap();
        let request = BreakdownRequest::new()
            .category("ViolationType")
            .category("Region")
            .year_column("Year")
            .limit(1);

        let (categories, yearly) = breakdowns(&df, &request).unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].counts, vec![count("Unpaid wages", 2)]);
        assert_eq!(categories[0].composition.len(), 2);
        let yearly = yearly.unwrap();
        assert_eq!(yearly.counts.last(), Some(&YearCount { year: 2022, count: 2 }));
    }

    #[test]
    fn test_empty_request() {
        let df = df!["a" => [1i64]].unwrap();
        let request = BreakdownRequest::default();
        assert!(request.is_empty());
        assert_eq!(request.limit, DEFAULT_CATEGORY_LIMIT);

        let (categories, yearly) = breakdowns(&df, &request).unwrap();
        assert!(categories.is_empty());
        assert!(yearly.is_none());
    }
}
