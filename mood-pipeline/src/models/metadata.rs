//! Resolved catalog metadata rows

use mood_common::table::lenient;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator used when genres are flattened into one cell
pub const GENRE_SEPARATOR: &str = "; ";

/// Column order of the resolved metadata file
pub const METADATA_COLUMNS: &[&str] = &[
    "track_name_input",
    "artist_name_input",
    "track_id",
    "artist_id",
    "track_name",
    "artist_name",
    "album_name",
    "album_release_date",
    "track_popularity",
    "artist_popularity",
    "artist_followers",
    "artist_genres",
    "country",
    "date",
    "streams_chart",
];

/// One successfully resolved track
///
/// The enricher only emits rows with a `stable_id`. Rows read back from a
/// file without a `track_id` column have none, which routes them straight
/// to name-based matching in the merger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    /// Chart text that was looked up
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub track_name_input: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub artist_name_input: Option<String>,

    #[serde(rename = "track_id", default, deserialize_with = "lenient::opt_string")]
    pub stable_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub artist_id: Option<String>,

    /// Canonical names as returned by the catalog
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub track_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub artist_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub album_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub album_release_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub track_popularity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub artist_popularity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub artist_followers: Option<u64>,
    #[serde(default, with = "genre_list")]
    pub artist_genres: Vec<String>,

    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub date: String,

    /// Chart stream count carried through from the sample
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub streams_chart: Option<f64>,
}

/// Genres as one delimited cell, preserving order
pub(crate) mod genre_list {
    use super::*;

    pub fn serialize<S>(genres: &[String], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&genres.join(GENRE_SEPARATOR))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().map(split).unwrap_or_default())
    }

    pub fn split(cell: &str) -> Vec<String> {
        cell.split(GENRE_SEPARATOR.trim())
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }
}
