//! Synthetic trademark-filing dataset.

use crate::error::{QualityError, Result, ResultExt};
use polars::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use tracing::info;

const MARK_CATEGORIES: [(Option<&str>, f64); 4] = [
    (Some("Word"), 0.15),
    (Some("Design"), 0.03),
    (Some("Combined"), 0.02),
    (None, 0.80),
];

const MARK_FEATURES: [(Option<&str>, f64); 3] =
    [(Some("Standard"), 0.10), (Some("Color"), 0.05), (None, 0.85)];

const IMAGE_FILES: [(Option<&str>, f64); 2] = [(Some("image.png"), 0.15), (None, 0.85)];

const STATUSES: [&str; 4] = ["Registered", "Pending", "Abandoned", "Dead"];

/// Probability that a record has a mark description.
const DESCRIPTION_RATE: f64 = 0.18;

/// Generates trademark-like records with realistic gaps.
///
/// The filing-date mix is skewed toward old filings (70% before 2000) and
/// most descriptive fields are sparse, so the generated data scores poorly
/// on completeness and timeliness. Output is fully determined by the seed.
///
/// # Example
///
/// ```rust,ignore
/// use yssl_quality::loader::SampleDataGenerator;
///
/// let df = SampleDataGenerator::default().generate(1000)?;
/// assert_eq!(df.height(), 1000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SampleDataGenerator {
    seed: u64,
}

impl Default for SampleDataGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl SampleDataGenerator {
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate `n_records` rows.
    pub fn generate(&self, n_records: usize) -> Result<DataFrame> {
        info!("Creating sample dataset with {} records", n_records);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let application_numbers: Vec<String> = (0..n_records)
            .map(|i| format!("CA{}", 1_000_000 + i))
            .collect();
        let filing_dates: Vec<String> = (0..n_records)
            .map(|_| random_filing_date(&mut rng))
            .collect();
        let mark_categories = choose_weighted(&mut rng, &MARK_CATEGORIES, n_records)?;
        let mark_features = choose_weighted(&mut rng, &MARK_FEATURES, n_records)?;
        let mark_descriptions: Vec<Option<String>> = (0..n_records)
            .map(|i| (rng.r#gen::<f64>() < DESCRIPTION_RATE).then(|| format!("Trademark {i}")))
            .collect();
        let image_files = choose_weighted(&mut rng, &IMAGE_FILES, n_records)?;
        let statuses: Vec<&str> = (0..n_records)
            .map(|_| STATUSES[rng.gen_range(0..STATUSES.len())])
            .collect();
        let classifications: Vec<String> = (0..n_records)
            .map(|_| format!("Nice Class {}", rng.gen_range(1..=45)))
            .collect();

        let df = DataFrame::new(vec![
            Column::new("ApplicationNumber".into(), application_numbers),
            Column::new("FilingDate".into(), filing_dates),
            Column::new("MarkCategory".into(), mark_categories),
            Column::new("MarkFeature".into(), mark_features),
            Column::new("MarkDescription".into(), mark_descriptions),
            Column::new("ImageFile".into(), image_files),
            Column::new("CurrentStatus".into(), statuses),
            Column::new("Classification".into(), classifications),
        ])
        .context("Assembling sample dataset")?;

        info!("Created {} sample records", df.height());
        Ok(df)
    }
}

/// Filing date as `YYYY-MM-DD`: 70% 1980-1999, 15% 2000-2009, 10% 2010-2019,
/// 5% 2020-2024. Days stop at 27 so every month is valid.
fn random_filing_date(rng: &mut StdRng) -> String {
    let roll: f64 = rng.r#gen();
    let year = if roll < 0.70 {
        rng.gen_range(1980..2000)
    } else if roll < 0.85 {
        rng.gen_range(2000..2010)
    } else if roll < 0.95 {
        rng.gen_range(2010..2020)
    } else {
        rng.gen_range(2020..2025)
    };
    let month = rng.gen_range(1..13);
    let day = rng.gen_range(1..28);
    format!("{year}-{month:02}-{day:02}")
}

fn choose_weighted(
    rng: &mut StdRng,
    choices: &[(Option<&str>, f64)],
    n: usize,
) -> Result<Vec<Option<String>>> {
    let dist = WeightedIndex::new(choices.iter().map(|(_, weight)| *weight))
        .map_err(|e| QualityError::SampleGenerationFailed(e.to_string()))?;
    Ok((0..n)
        .map(|_| choices[dist.sample(&mut *rng)].0.map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::parse_date_str;
    use chrono::Datelike;

    fn null_rate(df: &DataFrame, name: &str) -> f64 {
        df.column(name).unwrap().null_count() as f64 / df.height() as f64
    }

    #[test]
    fn test_shape_and_columns() {
        let df = SampleDataGenerator::default().generate(200).unwrap();
        assert_eq!(df.shape(), (200, 8));
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names[0], "ApplicationNumber");
        assert_eq!(names[7], "Classification");
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = SampleDataGenerator::new(7).generate(100).unwrap();
        let b = SampleDataGenerator::new(7).generate(100).unwrap();
        assert!(a.equals_missing(&b));
    }

    #[test]
    fn test_different_seed_different_data() {
        let a = SampleDataGenerator::new(1).generate(100).unwrap();
        let b = SampleDataGenerator::new(2).generate(100).unwrap();
        assert!(!a.equals_missing(&b));
    }

    #[test]
    fn test_application_numbers_are_unique() {
        let df = SampleDataGenerator::default().generate(500).unwrap();
        let ids = df.column("ApplicationNumber").unwrap();
        assert_eq!(ids.n_unique().unwrap(), 500);
        assert_eq!(
            ids.as_materialized_series().str().unwrap().get(0),
            Some("CA1000000")
        );
    }

    #[test]
    fn test_filing_dates_parse_within_range() {
        let df = SampleDataGenerator::default().generate(300).unwrap();
        let dates = df.column("FilingDate").unwrap();
        let dates = dates.as_materialized_series().str().unwrap();
        for value in dates.into_iter() {
            let date = parse_date_str(value.unwrap()).unwrap();
            assert!((1980..=2024).contains(&date.year()));
        }
    }

    #[test]
    fn test_sparse_fields_follow_weights() {
        let df = SampleDataGenerator::default().generate(4000).unwrap();
        assert!((null_rate(&df, "MarkCategory") - 0.80).abs() < 0.04);
        assert!((null_rate(&df, "MarkFeature") - 0.85).abs() < 0.04);
        assert!((null_rate(&df, "MarkDescription") - 0.82).abs() < 0.04);
        assert!((null_rate(&df, "ImageFile") - 0.85).abs() < 0.04);
        assert_eq!(null_rate(&df, "CurrentStatus"), 0.0);
    }

    #[test]
    fn test_zero_records() {
        let df = SampleDataGenerator::default().generate(0).unwrap();
        assert_eq!(df.shape(), (0, 8));
    }
}
