//! Cross-country summary rows

use mood_common::table::lenient;
use serde::{Deserialize, Serialize};

/// Column order of the country summary file
pub const SUMMARY_COLUMNS: &[&str] = &[
    "country",
    "date",
    "n_chart",
    "n_matched",
    "match_rate",
    "mean",
    "median",
    "p25",
    "p75",
    "w_mean_pop",
    "w_mean_streams",
];

/// Mood statistics and coverage for one (country, date)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub country: String,
    pub date: String,
    /// Resolved-metadata rows before merging, when known
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub n_chart: Option<u64>,
    pub n_matched: u64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub match_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub mean: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub median: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub p25: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub p75: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub w_mean_pop: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub w_mean_streams: Option<f64>,
}
