//! Metadata resolver capability
//!
//! The enricher only needs three catalog operations: resolve a (track,
//! artist) pair to a stable id, fetch track attributes by id and fetch
//! artist attributes by reference. [`SpotifyClient`](super::SpotifyClient)
//! implements them over HTTPS; tests plug in an in-memory resolver.

use async_trait::async_trait;
use thiserror::Error;

/// Catalog call errors
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ResolverError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolverError::NotFound(_))
    }
}

/// Reference to the main (first credited) artist of a track
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: String,
    pub name: Option<String>,
}

/// Track attributes returned by a lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    pub id: String,
    pub name: Option<String>,
    pub album_name: Option<String>,
    pub album_release_date: Option<String>,
    /// 0-100
    pub popularity: Option<i64>,
    /// `None` when the catalog lists no artist
    pub artist: Option<ArtistRef>,
}

/// Artist attributes returned by a lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistInfo {
    pub id: String,
    pub name: Option<String>,
    /// 0-100
    pub popularity: Option<i64>,
    pub follower_count: Option<u64>,
    /// Catalog order preserved
    pub genres: Vec<String>,
}

/// Catalog lookups needed to resolve a chart entry
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Search for a track by name and artist; `Ok(None)` when nothing matches
    async fn resolve_id(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> Result<Option<String>, ResolverError>;

    /// Fetch track attributes by stable id
    async fn fetch_track(&self, stable_id: &str) -> Result<TrackInfo, ResolverError>;

    /// Fetch artist attributes by reference
    async fn fetch_artist(&self, artist: &ArtistRef) -> Result<ArtistInfo, ResolverError>;
}
