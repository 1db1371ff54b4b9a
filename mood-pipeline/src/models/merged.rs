//! Reconciled rows and the processed (merged) table

use super::features::AudioFeatureRecord;
use super::metadata::{genre_list, ResolvedMetadata};
use mood_common::table::lenient;
use serde::{Deserialize, Serialize};

/// Column order of the processed file
pub const PROCESSED_COLUMNS: &[&str] = &[
    "track_name",
    "artist_name",
    "country",
    "date",
    "valence",
    "energy",
    "danceability",
    "tempo",
    "mood_index",
    "track_popularity",
    "artist_popularity",
    "artist_genres",
    "streams_chart",
];

/// Mood Index: mean of valence and energy, defined only when both exist
pub fn mood_index(valence: Option<f64>, energy: Option<f64>) -> Option<f64> {
    match (valence, energy) {
        (Some(v), Some(e)) => Some((v + e) / 2.0),
        _ => None,
    }
}

/// Which join phase produced a reconciled row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Exact catalog id match
    Identifier,
    /// Normalized (track, artist) name match
    NormalizedName,
}

/// One resolved row joined with one reference row
///
/// Both sides are kept whole so every ambiguous field (names, popularity)
/// names its source: `canonical` is the catalog side, `reference` is the
/// public audio-features side.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRow {
    pub match_kind: MatchKind,
    pub canonical: ResolvedMetadata,
    pub reference: AudioFeatureRecord,
}

impl ReconciledRow {
    /// Canonical track name, falling back to the reference name
    pub fn track_name(&self) -> Option<&str> {
        self.canonical
            .track_name
            .as_deref()
            .or(self.reference.track_name.as_deref())
    }

    /// Canonical artist name, falling back to the reference name
    pub fn artist_name(&self) -> Option<&str> {
        self.canonical
            .artist_name
            .as_deref()
            .or(self.reference.artist_name.as_deref())
    }

    /// Project onto the processed column set
    pub fn into_merged(self) -> MergedRecord {
        let track_name = self.track_name().map(str::to_string);
        let artist_name = self.artist_name().map(str::to_string);
        let ReconciledRow {
            canonical,
            reference,
            ..
        } = self;

        MergedRecord {
            track_name,
            artist_name,
            country: canonical.country,
            date: canonical.date,
            valence: reference.valence,
            energy: reference.energy,
            danceability: reference.danceability,
            tempo: reference.tempo,
            mood_index: mood_index(reference.valence, reference.energy),
            track_popularity: canonical.track_popularity,
            artist_popularity: canonical.artist_popularity,
            artist_genres: canonical.artist_genres,
            streams_chart: canonical.streams_chart,
        }
    }
}

/// One row of the processed table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub track_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub valence: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub energy: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub danceability: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub tempo: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub mood_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub track_popularity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub artist_popularity: Option<i64>,
    #[serde(default, with = "genre_list")]
    pub artist_genres: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub streams_chart: Option<f64>,
}
