//! CSV fixtures and record builders

use mood_pipeline::models::{AudioFeatureRecord, MergedRecord, ResolvedMetadata};
use std::path::{Path, PathBuf};

/// Worldwide daily chart excerpt (Spain and France, two dates)
pub const CHARTS_CSV: &str = "\
Position,Track Name,Artist,Streams,URL,Date,Region
1,Despacito - Remix,Luis Fonsi,3000,https://open.spotify.com/track/5CtI0qwDJkDQGwXD1H1cLb,2017-08-01,es
2,Mi Gente,J Balvin,2000,https://open.spotify.com/track/7COfe3P7KgfwDds8e7QOEa,2017-08-01,es
3,Cafe,El,1000,https://open.spotify.com/track/0000000000000000000001,2017-08-01,es
1,Shape of You,Ed Sheeran,5000,https://open.spotify.com/track/7qiZfU4dY1lWllzX7mPBI3,2017-08-01,fr
1,Other Day,Someone,10,https://open.spotify.com/track/1111111111111111111111,2017-08-02,es
";

/// Raw public audio-features excerpt (extra columns, one duplicate id)
pub const FEATURES_CSV: &str = "\
artist_name,track_id,track_name,acousticness,danceability,energy,popularity,tempo,valence
Luis Fonsi,5CtI0qwDJkDQGwXD1H1cLb,Despacito - Remix,0.2,0.65,0.8,80,178.0,0.6
J Balvin,7COfe3P7KgfwDds8e7QOEa,Mi Gente,0.1,0.54,0.9,85,105.0,1.0
J Balvin,7COfe3P7KgfwDds8e7QOEa,Mi Gente (dup),0.1,0.1,0.1,1,1.0,0.1
él,zzzzzzzzzzzzzzzzzzzzzz,CAFÉ,0.5,0.4,0.3,40,90.0,0.5
Ed Sheeran,7qiZfU4dY1lWllzX7mPBI3,Shape of You,0.5,0.8,0.65,90,96.0,0.93
";

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

pub fn resolved(id: Option<&str>, track: &str, artist: &str) -> ResolvedMetadata {
    ResolvedMetadata {
        stable_id: id.map(str::to_string),
        track_name: Some(track.to_string()),
        artist_name: Some(artist.to_string()),
        country: "Spain".to_string(),
        date: "2017-08-01".to_string(),
        ..Default::default()
    }
}

pub fn feature(
    id: Option<&str>,
    track: &str,
    artist: &str,
    valence: Option<f64>,
    energy: Option<f64>,
) -> AudioFeatureRecord {
    AudioFeatureRecord {
        stable_id: id.map(str::to_string),
        track_name: Some(track.to_string()),
        artist_name: Some(artist.to_string()),
        valence,
        energy,
        ..Default::default()
    }
}

pub fn merged(country: &str, date: &str, mood: Option<f64>) -> MergedRecord {
    MergedRecord {
        country: country.to_string(),
        date: date.to_string(),
        mood_index: mood,
        ..Default::default()
    }
}

pub fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.map(|a| (a - expected).abs() < 1e-9).unwrap_or(false)
}
