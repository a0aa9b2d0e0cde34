//! Data quality scoring.
//!
//! This module scores a dataset on five independent dimensions and keeps
//! the diagnostics each dimension produces:
//!
//! | dimension     | heuristic                                              |
//! |---------------|--------------------------------------------------------|
//! | accuracy      | duplicate rate of the identifier column                |
//! | completeness  | share of non-null cells                                |
//! | timeliness    | share of records dated within the recent window        |
//! | accessibility | non-empty dataset                                      |
//! | consistency   | constant                                               |
//!
//! The overall score is the unweighted mean of the five.

mod analyzer;
mod columns;
mod dates;
mod scores;

pub use analyzer::{
    NEUTRAL_TIMELINESS_SCORE, NO_VALID_DATES_SCORE, QualityAnalyzer, SCORE_FLOOR,
    TIMELINESS_FALLBACK_SCORE,
};
pub use columns::{find_date_column, find_identifier_column};
pub use dates::{coerce_date, parse_date_str};
pub use scores::{Dimension, MAX_SCORE, MIN_SCORE, MetricsSidecar, ScoreSet, SummaryReport};
