//! Spotify Web API client
//!
//! Implements [`MetadataResolver`] with the client-credentials flow:
//! - Access token requested with HTTP basic auth (`base64(id:secret)`)
//!   and cached until shortly before it expires
//! - Search: `q="track:<t> artist:<a>"`, `type=track`, `limit=1`
//! - Track and artist lookup by id
//!
//! Every HTTP call (token requests included) waits on one shared rate
//! limiter, so consecutive calls are at least `request_interval_ms` apart.

use super::metadata_resolver::{ArtistInfo, ArtistRef, MetadataResolver, ResolverError, TrackInfo};
use crate::config::ClientCredentials;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use governor::{Quota, RateLimiter};
use mood_common::config::ResolverConfig;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Refresh the token this long before the catalog says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

type DirectRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    id: String,
    name: Option<String>,
    popularity: Option<i64>,
    album: Option<AlbumObject>,
    #[serde(default)]
    artists: Vec<SimpleArtistObject>,
}

#[derive(Debug, Deserialize)]
struct AlbumObject {
    name: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SimpleArtistObject {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    id: String,
    name: Option<String>,
    popularity: Option<i64>,
    followers: Option<Followers>,
    #[serde(default)]
    genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Followers {
    total: Option<u64>,
}

impl From<TrackObject> for TrackInfo {
    fn from(track: TrackObject) -> Self {
        let (album_name, album_release_date) = match track.album {
            Some(album) => (album.name, album.release_date),
            None => (None, None),
        };
        let artist = track.artists.into_iter().next().and_then(|a| {
            a.id.map(|id| ArtistRef { id, name: a.name })
        });

        Self {
            id: track.id,
            name: track.name,
            album_name,
            album_release_date,
            popularity: track.popularity,
            artist,
        }
    }
}

impl From<ArtistObject> for ArtistInfo {
    fn from(artist: ArtistObject) -> Self {
        Self {
            id: artist.id,
            name: artist.name,
            popularity: artist.popularity,
            follower_count: artist.followers.and_then(|f| f.total),
            genres: artist.genres,
        }
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Spotify catalog client
pub struct SpotifyClient {
    http_client: Client,
    api_base_url: String,
    auth_url: String,
    credentials: ClientCredentials,
    token: Mutex<Option<CachedToken>>,
    /// `None` when the configured interval is zero
    rate_limiter: Option<DirectRateLimiter>,
}

impl SpotifyClient {
    pub fn new(config: &ResolverConfig, credentials: ClientCredentials) -> Result<Self, ResolverError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ResolverError::Network(e.to_string()))?;

        let rate_limiter = Quota::with_period(Duration::from_millis(config.request_interval_ms))
            .map(RateLimiter::direct);

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.clone(),
            credentials,
            token: Mutex::new(None),
            rate_limiter,
        })
    }

    async fn throttle(&self) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
    }

    /// Current access token, requesting a new one when the cache is stale
    async fn access_token(&self) -> Result<String, ResolverError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        self.throttle().await;
        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        ));

        tracing::debug!(url = %self.auth_url, "Requesting access token");

        let response = self
            .http_client
            .post(&self.auth_url)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", basic))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ResolverError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ResolverError::Auth(body)
                }
                StatusCode::TOO_MANY_REQUESTS => ResolverError::RateLimited,
                _ => ResolverError::Api(status.as_u16(), body),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ResolverError::Parse(e.to_string()))?;

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });

        tracing::debug!(expires_in = token.expires_in, "Access token cached");
        Ok(access_token)
    }

    /// Send an authorized GET and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, ResolverError> {
        let token = self.access_token().await?;
        self.throttle().await;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ResolverError::Network(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(ResolverError::NotFound(what.to_string())),
            StatusCode::TOO_MANY_REQUESTS => return Err(ResolverError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                // Drop the token so the next call re-authenticates
                *self.token.lock().await = None;
                let body = response.text().await.unwrap_or_default();
                return Err(ResolverError::Auth(body));
            }
            _ => {}
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResolverError::Api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ResolverError::Parse(e.to_string()))
    }
}

/// Search query for a (track, artist) pair
pub fn search_query(track_name: &str, artist_name: &str) -> String {
    format!("track:{} artist:{}", track_name, artist_name)
}

#[async_trait]
impl MetadataResolver for SpotifyClient {
    async fn resolve_id(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> Result<Option<String>, ResolverError> {
        let q = search_query(track_name, artist_name);
        let url = format!("{}/search", self.api_base_url);

        tracing::debug!(query = %q, "Searching catalog");

        let request = self
            .http_client
            .get(&url)
            .query(&[("q", q.as_str()), ("type", "track"), ("limit", "1")]);
        let response: SearchResponse = self.get_json(request, &q).await?;

        Ok(response
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(|track| track.id))
    }

    async fn fetch_track(&self, stable_id: &str) -> Result<TrackInfo, ResolverError> {
        let url = format!("{}/tracks/{}", self.api_base_url, stable_id);
        let request = self.http_client.get(&url);
        let track: TrackObject = self.get_json(request, stable_id).await?;
        Ok(track.into())
    }

    async fn fetch_artist(&self, artist: &ArtistRef) -> Result<ArtistInfo, ResolverError> {
        let url = format!("{}/artists/{}", self.api_base_url, artist.id);
        let request = self.http_client.get(&url);
        let info: ArtistObject = self.get_json(request, &artist.id).await?;
        Ok(info.into())
    }
}
