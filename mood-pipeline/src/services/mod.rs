//! Service modules for the mood index pipeline
//!
//! Pure table transforms (normalizer, selector, loader, merger, statistics,
//! summarizer) plus the catalog boundary (resolver trait, HTTP client and
//! the batch enricher driving it).

pub mod audio_features_loader;
pub mod chart_selector;
pub mod country_summarizer;
pub mod metadata_enricher;
pub mod metadata_resolver;
pub mod mood_statistics;
pub mod reconciliation_merger;
pub mod spotify_client;
pub mod text_normalizer;

pub use audio_features_loader::load_audio_features;
pub use chart_selector::select;
pub use country_summarizer::summarize;
pub use metadata_enricher::{EnrichmentReport, MetadataEnricher};
pub use metadata_resolver::{ArtistInfo, ArtistRef, MetadataResolver, ResolverError, TrackInfo};
pub use reconciliation_merger::{merge, reconcile};
pub use spotify_client::SpotifyClient;
pub use text_normalizer::normalize;
