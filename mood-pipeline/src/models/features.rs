//! Public audio-features reference rows

use mood_common::table::lenient;
use serde::{Deserialize, Serialize};

/// Columns retained from the public audio-features table, in output order
pub const EXPECTED_FEATURE_COLUMNS: &[&str] = &[
    "track_id",
    "track_name",
    "artist_name",
    "popularity",
    "danceability",
    "energy",
    "valence",
    "tempo",
];

/// One row of the static audio-features table
///
/// Numeric cells that fail to parse are kept as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatureRecord {
    #[serde(rename = "track_id", default, deserialize_with = "lenient::opt_string")]
    pub stable_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub track_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub artist_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub popularity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub danceability: Option<f64>,
    /// 0.0-1.0
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub energy: Option<f64>,
    /// 0.0-1.0
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub valence: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub tempo: Option<f64>,
}
