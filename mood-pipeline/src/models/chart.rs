//! Chart sample rows and run keys

use mood_common::table::lenient;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order of the chart sample file
pub const SAMPLE_COLUMNS: &[&str] = &[
    "track_name",
    "artist_name",
    "track_id",
    "date",
    "country",
    "position",
    "streams",
];

/// Identifies one (country, date) run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunKey {
    pub country: String,
    pub date: String,
}

impl RunKey {
    pub fn new(country: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            date: date.into(),
        }
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.country, self.date)
    }
}

/// One row of a ranked chart sample
///
/// Produced by the chart selector and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub track_name: String,
    pub artist_name: String,
    /// Catalog track id, present only if one was found in the source URL
    #[serde(rename = "track_id", default, deserialize_with = "lenient::opt_string")]
    pub stable_id: Option<String>,
    #[serde(default)]
    pub date: String,
    /// Region code or name as written in the chart
    #[serde(rename = "country", default)]
    pub region: String,
    #[serde(rename = "position", default, deserialize_with = "lenient::opt_i64")]
    pub rank_position: Option<i64>,
    /// Daily stream count reported by the chart, if the chart had one
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub streams: Option<f64>,
}
