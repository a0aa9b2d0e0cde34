//! CSV loading with fallbacks for messy regulatory exports.

use crate::error::{QualityError, Result, ResultExt};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Cell texts read as missing, matching the placeholders common in
/// spreadsheet and statistics exports. Empty fields are always missing.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Load a CSV file into a DataFrame.
///
/// Tries, in order: a strict UTF-8 read with quote handling, a lossy UTF-8
/// read (for Latin-1 exports), and finally a read of pre-cleaned content.
/// Every strategy reads [`NA_TOKENS`] as null.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let path_label = path.display().to_string();

    if !path.exists() {
        return Err(QualityError::LoadFailed {
            path: path_label,
            reason: "file not found".to_string(),
        });
    }

    info!("Loading CSV from {}", path_label);

    // Strategy 1: Standard loading with quote handling
    match read_with(path, na_parse_options().with_quote_char(Some(b'"'))) {
        Ok(df) => return loaded(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: Lossy decoding for non-UTF-8 files
    match read_with(path, na_parse_options().with_encoding(CsvEncoding::LossyUtf8)) {
        Ok(df) => return loaded(df),
        Err(e) => debug!("Lossy UTF-8 loading failed: {}", e),
    }

    // Strategy 3: Pre-clean content
    let content = std::fs::read_to_string(path).map_err(|e| {
        error!("Could not read file: {}", e);
        QualityError::LoadFailed {
            path: path_label.clone(),
            reason: e.to_string(),
        }
    })?;

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(na_parse_options())
        .into_reader_with_file_handle(Cursor::new(clean_csv_content(&content)))
        .finish()
        .context(format!("Reading cleaned CSV content of {}", path_label))?;

    loaded(df)
}

fn na_parse_options() -> CsvParseOptions {
    let tokens = NA_TOKENS.iter().map(|token| PlSmallStr::from(*token)).collect();
    CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(tokens)))
}

fn read_with(path: &Path, parse_options: CsvParseOptions) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
}

fn loaded(df: DataFrame) -> Result<DataFrame> {
    info!("Loaded {} records with {} columns", df.height(), df.width());
    Ok(df)
}

/// Collapse doubled quotes and drop blank lines.
pub fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
