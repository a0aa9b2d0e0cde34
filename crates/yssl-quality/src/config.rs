//! Configuration for the quality analyzer.
//!
//! This module provides the tunable knobs of the scoring heuristics using
//! the builder pattern.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Column names treated as record identifiers when no other hint is given.
pub const DEFAULT_IDENTIFIER_CANDIDATES: [&str; 1] = ["ApplicationNumber"];

/// Widest recent window `validate()` accepts, in years.
pub const MAX_RECENT_WINDOW_YEARS: u32 = 9999;

/// Configuration for [`crate::QualityAnalyzer`].
///
/// Use [`AnalyzerConfig::builder()`] to create a customised configuration.
///
/// # Example
///
/// ```rust,ignore
/// use yssl_quality::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .duplicate_rate_threshold(0.05)
///     .reference_year(2024)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Column names that identify unique records, checked before the
    /// name-based heuristic.
    /// Default: `["ApplicationNumber"]`
    pub identifier_candidates: Vec<String>,

    /// Duplicate identifier rate (0.0 - 1.0) above which accuracy loses a point.
    /// Default: 0.01 (1%)
    pub duplicate_rate_threshold: f64,

    /// How many years before the reference year still count as recent.
    /// Default: 2
    pub recent_window_years: u32,

    /// Year that timeliness is measured against.
    /// If None, the current local year is used.
    /// Default: None
    pub reference_year: Option<i32>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            identifier_candidates: DEFAULT_IDENTIFIER_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            duplicate_rate_threshold: 0.01,
            recent_window_years: 2,
            reference_year: None,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// The year timeliness is measured against.
    pub fn effective_reference_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// First year that still counts as recent.
    ///
    /// Saturates instead of overflowing for configurations that skipped
    /// [`AnalyzerConfig::validate`].
    pub fn recent_cutoff_year(&self) -> i32 {
        let window = i32::try_from(self.recent_window_years).unwrap_or(i32::MAX);
        self.effective_reference_year().saturating_sub(window)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.duplicate_rate_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "duplicate_rate_threshold".to_string(),
                value: self.duplicate_rate_threshold,
            });
        }

        if self.recent_window_years > MAX_RECENT_WINDOW_YEARS {
            return Err(ConfigValidationError::InvalidRecentWindow(
                self.recent_window_years,
            ));
        }

        if self.identifier_candidates.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyIdentifierCandidate);
        }

        if let Some(year) = self.reference_year
            && !(1..=9999).contains(&year)
        {
            return Err(ConfigValidationError::InvalidReferenceYear(year));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid recent window: {0} years (must be at most 9999)")]
    InvalidRecentWindow(u32),

    #[error("Identifier candidates must not contain empty names")]
    EmptyIdentifierCandidate,

    #[error("Invalid reference year: {0} (must be between 1 and 9999)")]
    InvalidReferenceYear(i32),
}

impl From<ConfigValidationError> for crate::error::QualityError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::QualityError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalyzerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    identifier_candidates: Option<Vec<String>>,
    duplicate_rate_threshold: Option<f64>,
    recent_window_years: Option<u32>,
    reference_year: Option<i32>,
}

impl AnalyzerConfigBuilder {
    /// Replace the identifier column candidates.
    pub fn identifier_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier_candidates = Some(candidates.into_iter().map(Into::into).collect());
        self
    }

    /// Set the duplicate rate above which accuracy is penalised.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.01 = 1%)
    pub fn duplicate_rate_threshold(mut self, threshold: f64) -> Self {
        self.duplicate_rate_threshold = Some(threshold);
        self
    }

    /// Set the width of the "recent" window in years.
    pub fn recent_window_years(mut self, years: u32) -> Self {
        self.recent_window_years = Some(years);
        self
    }

    /// Pin the reference year instead of reading the clock.
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalyzerConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalyzerConfig, ConfigValidationError> {
        let defaults = AnalyzerConfig::default();
        let config = AnalyzerConfig {
            identifier_candidates: self
                .identifier_candidates
                .unwrap_or(defaults.identifier_candidates),
            duplicate_rate_threshold: self
                .duplicate_rate_threshold
                .unwrap_or(defaults.duplicate_rate_threshold),
            recent_window_years: self
                .recent_window_years
                .unwrap_or(defaults.recent_window_years),
            reference_year: self.reference_year,
        };

        config.validate()?;
        Ok(config)
    }
}
