//! Reconciliation of resolved metadata against the audio-features table
//!
//! **Algorithm:**
//! 1. Phase A: join on `stable_id`; the first feature row per id wins
//! 2. Phase B: resolved rows left unmatched by Phase A are joined on
//!    (normalized track name, normalized artist name) against the full
//!    features table; every matching feature row yields a joined row
//! 3. Union A then B, drop exact duplicates (keep first, order preserved)
//! 4. Project onto the processed columns, canonical names preferred
//!
//! Rows whose normalized track or artist is empty never take part in
//! Phase B: two non-Latin titles that both normalize to "" are not a match.
//! This deliberately narrows a plain inner join on the normalized pair,
//! which would pair every such resolved row with every such feature row.
//! Phase B does not check country or date.

use super::text_normalizer::normalize_opt;
use crate::models::{AudioFeatureRecord, MatchKind, MergedRecord, ReconciledRow, ResolvedMetadata};
use std::collections::HashMap;
use tracing::{debug, info};

type NameKey = (String, String);

fn name_key(track: Option<&str>, artist: Option<&str>) -> Option<NameKey> {
    let track = normalize_opt(track);
    let artist = normalize_opt(artist);
    if track.is_empty() || artist.is_empty() {
        None
    } else {
        Some((track, artist))
    }
}

/// Join both tables, keeping each side of every match
pub fn reconcile(resolved: &[ResolvedMetadata], features: &[AudioFeatureRecord]) -> Vec<ReconciledRow> {
    if resolved.is_empty() || features.is_empty() {
        return Vec::new();
    }

    // Phase A
    let mut by_id: HashMap<&str, &AudioFeatureRecord> = HashMap::new();
    for feature in features {
        if let Some(id) = feature.stable_id.as_deref() {
            by_id.entry(id).or_insert(feature);
        }
    }

    let mut joined = Vec::new();
    let mut unmatched = Vec::new();
    for row in resolved {
        match row.stable_id.as_deref().and_then(|id| by_id.get(id)) {
            Some(feature) => joined.push(ReconciledRow {
                match_kind: MatchKind::Identifier,
                canonical: row.clone(),
                reference: (*feature).clone(),
            }),
            None => unmatched.push(row),
        }
    }
    let phase_a = joined.len();

    // Phase B
    if !unmatched.is_empty() {
        let mut by_name: HashMap<NameKey, Vec<&AudioFeatureRecord>> = HashMap::new();
        for feature in features {
            if let Some(key) = name_key(feature.track_name.as_deref(), feature.artist_name.as_deref()) {
                by_name.entry(key).or_default().push(feature);
            }
        }

        for row in unmatched {
            let Some(key) = name_key(row.track_name.as_deref(), row.artist_name.as_deref()) else {
                debug!(
                    track = row.track_name.as_deref().unwrap_or(""),
                    "Empty normalized name, no name-based match"
                );
                continue;
            };
            for feature in by_name.get(&key).into_iter().flatten() {
                joined.push(ReconciledRow {
                    match_kind: MatchKind::NormalizedName,
                    canonical: row.clone(),
                    reference: (*feature).clone(),
                });
            }
        }
    }
    let phase_b = joined.len() - phase_a;

    let deduped = dedupe(joined);

    info!(
        resolved = resolved.len(),
        features = features.len(),
        id_matches = phase_a,
        name_matches = phase_b,
        merged = deduped.len(),
        "Reconciliation complete"
    );

    deduped
}

/// Drop rows identical on every joined field, keeping the first
///
/// The match kind is not a joined field: the same pair found by both
/// phases counts as one row.
fn dedupe(rows: Vec<ReconciledRow>) -> Vec<ReconciledRow> {
    let mut kept: Vec<ReconciledRow> = Vec::with_capacity(rows.len());
    for row in rows {
        let duplicate = kept
            .iter()
            .any(|k| k.canonical == row.canonical && k.reference == row.reference);
        if !duplicate {
            kept.push(row);
        }
    }
    kept
}

/// Merge resolved metadata with audio features into processed rows
pub fn merge(resolved: &[ResolvedMetadata], features: &[AudioFeatureRecord]) -> Vec<MergedRecord> {
    reconcile(resolved, features)
        .into_iter()
        .map(ReconciledRow::into_merged)
        .collect()
}
