//! Batch metadata resolution over a chart sample
//!
//! Resolves entries one at a time against a [`MetadataResolver`]:
//! 1. Entry has a stable id → fetch that track directly
//! 2. No id, or the direct fetch says not-found → search by (track, artist),
//!    then fetch the track found (the single fallback path)
//! 3. Fetch the track's main artist
//!
//! Any other failure skips only that entry. Rows carry the run's country
//! and date (the full country name), not the chart's region code.

use super::metadata_resolver::{MetadataResolver, ResolverError, TrackInfo};
use crate::models::{ChartEntry, ResolvedMetadata};
use tracing::{debug, info, warn};

/// Outcome of one enrichment batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    /// Resolved rows in sample order
    pub rows: Vec<ResolvedMetadata>,
    pub attempted: usize,
    pub resolved: usize,
    pub skipped: usize,
}

/// Why one entry was skipped
#[derive(Debug)]
enum SkipReason {
    NoSearchMatch,
    NoArtist,
    Resolver(ResolverError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoSearchMatch => write!(f, "no search match"),
            SkipReason::NoArtist => write!(f, "track lists no artist"),
            SkipReason::Resolver(e) => write!(f, "{}", e),
        }
    }
}

impl From<ResolverError> for SkipReason {
    fn from(e: ResolverError) -> Self {
        SkipReason::Resolver(e)
    }
}

/// Drives a resolver over a chart sample
pub struct MetadataEnricher<'a> {
    resolver: &'a dyn MetadataResolver,
}

impl<'a> MetadataEnricher<'a> {
    pub fn new(resolver: &'a dyn MetadataResolver) -> Self {
        Self { resolver }
    }

    /// Resolve every entry, skipping the ones that fail
    pub async fn enrich(&self, entries: &[ChartEntry], country: &str, date: &str) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();

        for entry in entries {
            report.attempted += 1;

            match self.resolve_entry(entry, country, date).await {
                Ok(row) => {
                    debug!(
                        track = %entry.track_name,
                        artist = %entry.artist_name,
                        track_id = row.stable_id.as_deref().unwrap_or(""),
                        "Resolved chart entry"
                    );
                    report.resolved += 1;
                    report.rows.push(row);
                }
                Err(reason) => {
                    warn!(
                        track = %entry.track_name,
                        artist = %entry.artist_name,
                        reason = %reason,
                        "Skipping unresolved chart entry"
                    );
                    report.skipped += 1;
                }
            }
        }

        info!(
            country = %country,
            date = %date,
            attempted = report.attempted,
            resolved = report.resolved,
            skipped = report.skipped,
            "Metadata enrichment complete"
        );

        report
    }

    async fn resolve_entry(
        &self,
        entry: &ChartEntry,
        country: &str,
        date: &str,
    ) -> Result<ResolvedMetadata, SkipReason> {
        let track = self.fetch_track_for(entry).await?;
        let artist_ref = track.artist.clone().ok_or(SkipReason::NoArtist)?;
        let artist = self.resolver.fetch_artist(&artist_ref).await?;

        Ok(ResolvedMetadata {
            track_name_input: Some(entry.track_name.clone()),
            artist_name_input: Some(entry.artist_name.clone()),
            stable_id: Some(track.id),
            artist_id: Some(artist_ref.id),
            track_name: track.name,
            artist_name: artist.name.or(artist_ref.name),
            album_name: track.album_name,
            album_release_date: track.album_release_date,
            track_popularity: track.popularity,
            artist_popularity: artist.popularity,
            artist_followers: artist.follower_count,
            artist_genres: artist.genres,
            country: country.to_string(),
            date: date.to_string(),
            streams_chart: entry.streams,
        })
    }

    async fn fetch_track_for(&self, entry: &ChartEntry) -> Result<TrackInfo, SkipReason> {
        if let Some(id) = entry.stable_id.as_deref() {
            match self.resolver.fetch_track(id).await {
                Ok(track) => return Ok(track),
                Err(e) if e.is_not_found() => {
                    debug!(track_id = %id, "Track id not found, falling back to search");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let id = self
            .resolver
            .resolve_id(&entry.track_name, &entry.artist_name)
            .await?
            .ok_or(SkipReason::NoSearchMatch)?;

        Ok(self.resolver.fetch_track(&id).await?)
    }
}
