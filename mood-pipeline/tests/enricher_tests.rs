//! Metadata enricher tests against an in-memory catalog

mod helpers;

use helpers::{capture_logs, MockResolver};
use mood_pipeline::models::ChartEntry;
use mood_pipeline::services::MetadataEnricher;
use tracing::Level;

fn entry(track: &str, artist: &str, id: Option<&str>, streams: Option<f64>) -> ChartEntry {
    ChartEntry {
        track_name: track.to_string(),
        artist_name: artist.to_string(),
        stable_id: id.map(str::to_string),
        date: "2017-08-01".to_string(),
        region: "es".to_string(),
        rank_position: Some(1),
        streams,
    }
}

#[tokio::test]
async fn test_direct_id_lookup_builds_full_row() {
    let resolver = MockResolver::new().with_track("T1", "Despacito - Remix", "A1", "Luis Fonsi", 81);
    let entries = vec![entry("Despacito - Remix", "Luis Fonsi", Some("T1"), Some(3000.0))];

    let report = MetadataEnricher::new(&resolver)
        .enrich(&entries, "Spain", "2017-08-01")
        .await;

    assert_eq!((report.attempted, report.resolved, report.skipped), (1, 1, 0));
    let row = &report.rows[0];
    assert_eq!(row.stable_id.as_deref(), Some("T1"));
    assert_eq!(row.artist_id.as_deref(), Some("A1"));
    assert_eq!(row.track_name_input.as_deref(), Some("Despacito - Remix"));
    assert_eq!(row.track_popularity, Some(81));
    assert_eq!(row.artist_popularity, Some(80));
    assert_eq!(row.artist_followers, Some(1_000));
    assert_eq!(row.artist_genres, vec!["pop", "latin"]);
    assert_eq!(row.album_release_date.as_deref(), Some("2017-01-13"));
    assert_eq!(row.streams_chart, Some(3000.0));
    // Run values, not the chart region code
    assert_eq!(row.country, "Spain");
    assert_eq!(row.date, "2017-08-01");

    assert_eq!(resolver.calls(), vec!["track:T1", "artist:A1"]);
}

#[tokio::test]
async fn test_not_found_id_falls_back_to_search() {
    let resolver = MockResolver::new()
        .with_track("T2", "Mi Gente", "A2", "J Balvin", 90)
        .with_search("Mi Gente", "J Balvin", "T2");
    let entries = vec![entry("Mi Gente", "J Balvin", Some("STALE"), None)];

    let report = MetadataEnricher::new(&resolver)
        .enrich(&entries, "Spain", "2017-08-01")
        .await;

    assert_eq!(report.resolved, 1);
    assert_eq!(report.rows[0].stable_id.as_deref(), Some("T2"));
    assert_eq!(
        resolver.calls(),
        vec!["track:STALE", "search:Mi Gente|J Balvin", "track:T2", "artist:A2"]
    );
}

#[tokio::test]
async fn test_entry_without_id_uses_search() {
    let resolver = MockResolver::new()
        .with_track("T3", "Shape of You", "A3", "Ed Sheeran", 95)
        .with_search("Shape of You", "Ed Sheeran", "T3");
    let entries = vec![entry("Shape of You", "Ed Sheeran", None, None)];

    let report = MetadataEnricher::new(&resolver)
        .enrich(&entries, "France", "2017-08-01")
        .await;

    assert_eq!(report.resolved, 1);
    assert_eq!(report.rows[0].country, "France");
    assert_eq!(report.rows[0].streams_chart, None);
}

#[tokio::test]
async fn test_failures_skip_only_their_entry() {
    let resolver = MockResolver::new()
        .with_track("OK", "Good Song", "A1", "Good Artist", 50)
        .with_track("BADART", "Lonely", "A9", "Broken Artist", 50)
        .with_broken_track("NET")
        .with_broken_artist("A9")
        .with_artistless_track("NOART", "Orphan");
    let entries = vec![
        entry("Network", "Down", Some("NET"), None),
        entry("Good Song", "Good Artist", Some("OK"), None),
        entry("Unknown", "Nobody", None, None),
        entry("Orphan", "?", Some("NOART"), None),
        entry("Lonely", "Broken Artist", Some("BADART"), None),
    ];

    let report = MetadataEnricher::new(&resolver)
        .enrich(&entries, "Spain", "2017-08-01")
        .await;

    assert_eq!(report.attempted, 5);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.skipped, 4);
    assert_eq!(report.rows[0].stable_id.as_deref(), Some("OK"));

    // A network error on the direct lookup is not a not-found: no search
    assert!(!resolver.calls().contains(&"search:Network|Down".to_string()));
}

#[tokio::test]
async fn test_skipped_entries_are_logged() {
    let (logs, _guard) = capture_logs();
    let resolver = MockResolver::new();
    let entries = vec![entry("Unknown", "Nobody", None, None)];

    let report = MetadataEnricher::new(&resolver)
        .enrich(&entries, "Spain", "2017-08-01")
        .await;

    assert_eq!(report.skipped, 1);
    let warns = logs.at_level(Level::WARN);
    assert_eq!(warns.len(), 1);
    assert_eq!(warns[0].message, "Skipping unresolved chart entry");
    assert_eq!(warns[0].field("track"), Some("Unknown"));
    assert_eq!(warns[0].field("reason"), Some("no search match"));
    logs.assert_contains("Metadata enrichment complete");
}

#[tokio::test]
async fn test_empty_sample() {
    let resolver = MockResolver::new();

    let report = MetadataEnricher::new(&resolver).enrich(&[], "Spain", "2017-08-01").await;

    assert_eq!(report.attempted, 0);
    assert!(report.rows.is_empty());
    assert!(resolver.calls().is_empty());
}
