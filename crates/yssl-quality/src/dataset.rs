//! Tabular dataset access for the quality analyzer.
//!
//! The analyzer only needs a handful of read operations, captured by the
//! [`Dataset`] trait. A polars [`DataFrame`] implements it directly, and
//! [`RecordTable`] offers a small row-oriented implementation for callers
//! that do not hold a DataFrame.

use crate::error::{QualityError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A single cell of a tabular dataset.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Null, or a float NaN.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// Floats compare by bit pattern so that NaN == NaN, which keeps duplicate
// detection consistent with the hash.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Str(a), CellValue::Str(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(v) => v.hash(state),
            CellValue::Int(v) => v.hash(state),
            CellValue::Float(v) => v.to_bits().hash(state),
            CellValue::Str(v) => v.hash(state),
            CellValue::Date(v) => v.hash(state),
            CellValue::DateTime(v) => v.hash(state),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Str(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Str(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// Read-only view of a tabular dataset.
///
/// Implementations must return a stable column set and row count for the
/// lifetime of an analysis run.
pub trait Dataset {
    /// Column names in dataset order.
    fn columns(&self) -> Vec<String>;

    /// Number of records.
    fn row_count(&self) -> usize;

    /// All values of one column, one per record.
    fn column_values(&self, name: &str) -> Result<Vec<CellValue>>;

    /// Whether a value counts as missing.
    fn is_null(&self, value: &CellValue) -> bool {
        value.is_null()
    }

    /// Number of missing values in one column.
    fn null_count(&self, name: &str) -> Result<usize> {
        Ok(self
            .column_values(name)?
            .iter()
            .filter(|v| self.is_null(v))
            .count())
    }

    /// Number of columns.
    fn column_count(&self) -> usize {
        self.columns().len()
    }
}

impl Dataset for DataFrame {
    fn columns(&self) -> Vec<String> {
        self.get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    fn row_count(&self) -> usize {
        self.height()
    }

    fn column_values(&self, name: &str) -> Result<Vec<CellValue>> {
        let col = self
            .column(name)
            .map_err(|_| QualityError::ColumnNotFound(name.to_string()))?;
        let series = col.as_materialized_series().rechunk();

        Ok(series.iter().map(any_value_to_cell).collect())
    }

    fn null_count(&self, name: &str) -> Result<usize> {
        let col = self
            .column(name)
            .map_err(|_| QualityError::ColumnNotFound(name.to_string()))?;

        let nan_count = if col.dtype().is_float() {
            let floats = col.cast(&DataType::Float64)?;
            floats
                .f64()?
                .into_iter()
                .filter(|v| v.is_some_and(f64::is_nan))
                .count()
        } else {
            0
        };

        Ok(col.null_count() + nan_count)
    }

    fn column_count(&self) -> usize {
        self.width()
    }
}

/// Convert a polars value into a [`CellValue`].
fn any_value_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Boolean(v) => CellValue::Bool(v),
        AnyValue::String(v) => CellValue::Str(v.to_string()),
        AnyValue::StringOwned(v) => CellValue::Str(v.to_string()),
        AnyValue::Int8(v) => CellValue::Int(v.into()),
        AnyValue::Int16(v) => CellValue::Int(v.into()),
        AnyValue::Int32(v) => CellValue::Int(v.into()),
        AnyValue::Int64(v) => CellValue::Int(v),
        AnyValue::UInt8(v) => CellValue::Int(v.into()),
        AnyValue::UInt16(v) => CellValue::Int(v.into()),
        AnyValue::UInt32(v) => CellValue::Int(v.into()),
        AnyValue::UInt64(v) => {
            i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Int)
        }
        AnyValue::Float32(v) => CellValue::Float(v.into()),
        AnyValue::Float64(v) => CellValue::Float(v),
        AnyValue::Date(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days.into())))
            .map_or(CellValue::Null, CellValue::Date),
        AnyValue::Datetime(v, unit, _) | AnyValue::DatetimeOwned(v, unit, _) => {
            datetime_from_unit(v, unit).map_or(CellValue::Null, CellValue::DateTime)
        }
        other => CellValue::Str(other.to_string()),
    }
}

fn datetime_from_unit(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    dt.map(|dt| dt.naive_utc())
}

/// Row-oriented in-memory dataset.
///
/// Fields absent from a record read back as [`CellValue::Null`].
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    columns: Vec<String>,
    records: Vec<HashMap<String, CellValue>>,
}

impl RecordTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
        }
    }

    /// Append a record. Fields outside the declared column set are rejected.
    pub fn push_record<I, K, V>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut record = HashMap::new();
        for (key, value) in fields {
            let key = key.into();
            if !self.columns.contains(&key) {
                return Err(QualityError::ColumnNotFound(key));
            }
            record.insert(key, value.into());
        }
        self.records.push(record);
        Ok(())
    }

    /// Builder-style variant of [`RecordTable::push_record`].
    pub fn with_record<I, K, V>(mut self, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        self.push_record(fields)?;
        Ok(self)
    }
}

impl Dataset for RecordTable {
    fn columns(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn row_count(&self) -> usize {
        self.records.len()
    }

    fn column_values(&self, name: &str) -> Result<Vec<CellValue>> {
        if !self.columns.iter().any(|c| c == name) {
            return Err(QualityError::ColumnNotFound(name.to_string()));
        }
        Ok(self
            .records
            .iter()
            .map(|record| record.get(name).cloned().unwrap_or(CellValue::Null))
            .collect())
    }
}

static_assertions::assert_impl_all!(CellValue: Send, Sync);
static_assertions::assert_impl_all!(RecordTable: Send, Sync);
