//! Chart Selector
//!
//! Picks the ranked Top-N sample for one country and date out of a raw
//! multi-country daily chart table.
//!
//! **Algorithm:**
//! 1. Resolve column aliases on the normalized headers
//! 2. Keep rows whose region equals the normalized country or its
//!    two-character prefix ("Spain" → {"spain", "sp"}, "ES" → {"es"})
//! 3. Keep rows whose date string equals `date` exactly
//! 4. Extract the catalog id from the URL (`track/<22>` or `track:<22>`);
//!    rows without one are dropped
//! 5. Stable sort by chart position, take `top_n`
//!
//! The prefix heuristic is not an ISO lookup: countries sharing their first
//! two letters can match each other's region codes. Several rows sharing
//! one position are not detected either; both are kept in table order.

use crate::models::ChartEntry;
use mood_common::table::lenient;
use mood_common::{RawTable, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static TRACK_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(track/|track:)([0-9A-Za-z]{22})").expect("valid track id pattern")
});

const TRACK_COLUMNS: &[&str] = &["track name", "trackname", "track"];
const ARTIST_COLUMNS: &[&str] = &["artist", "artist name", "artists"];
const URL_COLUMN: &str = "url";
const DATE_COLUMN: &str = "date";
const REGION_COLUMN: &str = "region";
const POSITION_COLUMN: &str = "position";
const STREAMS_COLUMN: &str = "streams";

/// Column positions resolved once per table
struct ChartColumns {
    track: usize,
    artist: usize,
    url: usize,
    date: usize,
    region: usize,
    position: usize,
    streams: Option<usize>,
}

impl ChartColumns {
    fn resolve(table: &RawTable) -> Result<Self> {
        let mut missing = Vec::new();
        let mut find = |candidates: &[&str]| {
            let found = table.first_column(candidates);
            if found.is_none() {
                missing.push(candidates.join("|"));
            }
            found.unwrap_or_default()
        };

        let columns = Self {
            track: find(TRACK_COLUMNS),
            artist: find(ARTIST_COLUMNS),
            url: find(&[URL_COLUMN]),
            date: find(&[DATE_COLUMN]),
            region: find(&[REGION_COLUMN]),
            position: find(&[POSITION_COLUMN]),
            streams: table.column_index(STREAMS_COLUMN),
        };

        if missing.is_empty() {
            Ok(columns)
        } else {
            Err(mood_common::Error::missing_columns(&missing))
        }
    }
}

/// Extract the 22-character catalog track id from a URL or URI
pub fn extract_track_id(url: &str) -> Option<String> {
    TRACK_ID.captures(url).map(|caps| caps[2].to_string())
}

/// Canonical form of a country or region string
pub fn normalize_country(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Select the Top-N chart entries for `country` on `date`
///
/// Returns an empty vector when nothing matches; the caller decides whether
/// that is fatal. Missing required columns are a configuration error.
pub fn select(table: &RawTable, country: &str, date: &str, top_n: usize) -> Result<Vec<ChartEntry>> {
    let cols = ChartColumns::resolve(table)?;

    let country_norm = normalize_country(country);
    let prefix: String = country_norm.chars().take(2).collect();

    let mut candidates: Vec<(i64, ChartEntry)> = Vec::new();
    for row in table.rows() {
        let field = move |i: usize| row.get(i).unwrap_or_default();

        let region = normalize_country(field(cols.region));
        if region != country_norm && region != prefix {
            continue;
        }
        if field(cols.date) != date {
            continue;
        }

        let Some(stable_id) = extract_track_id(field(cols.url)) else {
            debug!(
                track = field(cols.track),
                url = field(cols.url),
                "No track id in chart URL, skipping row"
            );
            continue;
        };
        let Some(position) = lenient::parse_i64(field(cols.position)) else {
            debug!(
                track = field(cols.track),
                position = field(cols.position),
                "Unparseable chart position, skipping row"
            );
            continue;
        };

        candidates.push((
            position,
            ChartEntry {
                track_name: field(cols.track).to_string(),
                artist_name: field(cols.artist).to_string(),
                stable_id: Some(stable_id),
                date: field(cols.date).to_string(),
                region: field(cols.region).to_string(),
                rank_position: Some(position),
                streams: cols.streams.and_then(|i| lenient::parse_f64(field(i))),
            },
        ));
    }

    // Vec::sort_by_key is stable: ties keep table order
    candidates.sort_by_key(|(position, _)| *position);

    let sample: Vec<ChartEntry> = candidates
        .into_iter()
        .take(top_n)
        .map(|(_, entry)| entry)
        .collect();

    debug!(
        country = %country,
        date = %date,
        top_n = top_n,
        selected = sample.len(),
        "Chart sample selected"
    );

    Ok(sample)
}
