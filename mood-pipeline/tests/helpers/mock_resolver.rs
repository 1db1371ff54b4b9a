//! In-memory catalog for resolver-dependent tests

use async_trait::async_trait;
use mood_pipeline::services::{ArtistInfo, ArtistRef, MetadataResolver, ResolverError, TrackInfo};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Catalog backed by maps, recording every call it receives
#[derive(Default)]
pub struct MockResolver {
    tracks: HashMap<String, TrackInfo>,
    artists: HashMap<String, ArtistInfo>,
    /// (track name, artist name) → track id
    search: HashMap<(String, String), String>,
    /// Track ids whose lookup fails with a network error
    broken_tracks: HashSet<String>,
    /// Artist ids whose lookup fails with a network error
    broken_artists: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a track and its main artist
    pub fn with_track(
        mut self,
        id: &str,
        name: &str,
        artist_id: &str,
        artist_name: &str,
        popularity: i64,
    ) -> Self {
        self.tracks.insert(
            id.to_string(),
            TrackInfo {
                id: id.to_string(),
                name: Some(name.to_string()),
                album_name: Some(format!("{} (album)", name)),
                album_release_date: Some("2017-01-13".to_string()),
                popularity: Some(popularity),
                artist: Some(ArtistRef {
                    id: artist_id.to_string(),
                    name: Some(artist_name.to_string()),
                }),
            },
        );
        self.artists.entry(artist_id.to_string()).or_insert(ArtistInfo {
            id: artist_id.to_string(),
            name: Some(artist_name.to_string()),
            popularity: Some(80),
            follower_count: Some(1_000),
            genres: vec!["pop".to_string(), "latin".to_string()],
        });
        self
    }

    /// Register a track the catalog lists without any artist
    pub fn with_artistless_track(mut self, id: &str, name: &str) -> Self {
        self.tracks.insert(
            id.to_string(),
            TrackInfo {
                id: id.to_string(),
                name: Some(name.to_string()),
                ..Default::default()
            },
        );
        self
    }

    /// Make a (track, artist) search return `id`
    pub fn with_search(mut self, track: &str, artist: &str, id: &str) -> Self {
        self.search
            .insert((track.to_string(), artist.to_string()), id.to_string());
        self
    }

    pub fn with_broken_track(mut self, id: &str) -> Self {
        self.broken_tracks.insert(id.to_string());
        self
    }

    pub fn with_broken_artist(mut self, id: &str) -> Self {
        self.broken_artists.insert(id.to_string());
        self
    }

    /// Calls received so far, e.g. `"track:abc"`, `"search:Song|Artist"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MetadataResolver for MockResolver {
    async fn resolve_id(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> Result<Option<String>, ResolverError> {
        self.record(format!("search:{}|{}", track_name, artist_name));
        Ok(self
            .search
            .get(&(track_name.to_string(), artist_name.to_string()))
            .cloned())
    }

    async fn fetch_track(&self, stable_id: &str) -> Result<TrackInfo, ResolverError> {
        self.record(format!("track:{}", stable_id));
        if self.broken_tracks.contains(stable_id) {
            return Err(ResolverError::Network("connection reset".to_string()));
        }
        self.tracks
            .get(stable_id)
            .cloned()
            .ok_or_else(|| ResolverError::NotFound(stable_id.to_string()))
    }

    async fn fetch_artist(&self, artist: &ArtistRef) -> Result<ArtistInfo, ResolverError> {
        self.record(format!("artist:{}", artist.id));
        if self.broken_artists.contains(&artist.id) {
            return Err(ResolverError::Network("timeout".to_string()));
        }
        self.artists
            .get(&artist.id)
            .cloned()
            .ok_or_else(|| ResolverError::NotFound(artist.id.clone()))
    }
}
