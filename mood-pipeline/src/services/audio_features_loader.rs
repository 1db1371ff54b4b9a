//! Audio-features table cleaning
//!
//! Keeps exactly the expected columns of the public reference table, coerces
//! numeric cells leniently and drops duplicate track ids (first one wins).

use crate::models::{AudioFeatureRecord, EXPECTED_FEATURE_COLUMNS};
use mood_common::{RawTable, Result};
use std::collections::HashSet;
use tracing::{debug, info};

/// Load and clean the audio-features reference table
///
/// Fails with a configuration error naming every missing expected column.
pub fn load_audio_features(table: &RawTable) -> Result<Vec<AudioFeatureRecord>> {
    table.require_columns(EXPECTED_FEATURE_COLUMNS)?;

    let records: Vec<AudioFeatureRecord> = table.deserialize()?;
    let total = records.len();
    let records = dedupe_by_id(records);

    info!(
        rows = total,
        kept = records.len(),
        duplicates = total - records.len(),
        "Audio features loaded"
    );

    Ok(records)
}

/// Drop rows whose `stable_id` was already seen, keeping the first
///
/// Rows without an id share the missing key, so only the first of them
/// survives, matching a keep-first drop on the id column.
pub fn dedupe_by_id(records: Vec<AudioFeatureRecord>) -> Vec<AudioFeatureRecord> {
    let mut seen: HashSet<Option<String>> = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let first = seen.insert(record.stable_id.clone());
            if !first {
                debug!(
                    track_id = record.stable_id.as_deref().unwrap_or(""),
                    "Dropping duplicate audio-features row"
                );
            }
            first
        })
        .collect()
}
