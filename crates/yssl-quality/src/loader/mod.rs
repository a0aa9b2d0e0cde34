//! Dataset ingestion.
//!
//! Two ways to obtain a [`polars::prelude::DataFrame`] for analysis:
//!
//! - [`load_csv`] reads a CSV export, retrying with more lenient settings
//!   when the strict read fails.
//! - [`SampleDataGenerator`] synthesises a reproducible trademark-filing
//!   dataset for demos and tests.

mod csv;
mod sample;

pub use csv::{NA_TOKENS, clean_csv_content, load_csv};
pub use sample::SampleDataGenerator;
