//! Configuration loading and config file resolution
//!
//! Config file priority:
//! 1. Command-line argument (highest priority)
//! 2. `MOOD_CONFIG` environment variable
//! 3. `<config_dir>/mood-index/config.toml`
//! 4. Compiled defaults (fallback)
//!
//! A missing default config file is not an error: the pipeline logs a
//! warning and runs with compiled defaults. An explicitly named file that
//! cannot be read or parsed is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MOOD_CONFIG";

/// Default Top-N when a task does not specify one
pub const DEFAULT_TOP_N: usize = 50;

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input/output file locations
    pub paths: PathsConfig,
    /// Catalog resolver settings
    pub resolver: ResolverConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Country/date runs executed by the batch command
    pub tasks: Vec<RunTask>,
}

/// File and directory locations used by the stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Raw worldwide daily chart table
    pub charts: PathBuf,
    /// Raw public audio-features table
    pub features_raw: PathBuf,
    /// Cleaned audio-features table
    pub features_clean: PathBuf,
    /// Directory for chart samples
    pub raw_dir: PathBuf,
    /// Directory for resolved metadata tables
    pub interim_dir: PathBuf,
    /// Directory for processed (merged) tables
    pub processed_dir: PathBuf,
    /// Cross-country summary output
    pub summary: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            charts: PathBuf::from("data/raw/worldwide_daily_song_ranking.csv"),
            features_raw: PathBuf::from("data/raw/SpotifyAudioFeaturesApril2019.csv"),
            features_clean: PathBuf::from("data/interim/audio_features_clean.csv"),
            raw_dir: PathBuf::from("data/raw"),
            interim_dir: PathBuf::from("data/interim"),
            processed_dir: PathBuf::from("data/processed"),
            summary: PathBuf::from("data/processed/country_summary.csv"),
        }
    }
}

/// Catalog resolver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// OAuth client id (environment variable takes precedence)
    pub client_id: Option<String>,
    /// OAuth client secret (environment variable takes precedence)
    pub client_secret: Option<String>,
    /// Catalog web API base URL
    pub api_base_url: String,
    /// Token endpoint for the client-credentials flow
    pub auth_url: String,
    /// Minimum interval between two catalog calls (milliseconds)
    pub request_interval_ms: u64,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: "https://api.spotify.com/v1".to_string(),
            auth_url: "https://accounts.spotify.com/api/token".to_string(),
            request_interval_ms: 250,
            timeout_secs: 20,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// One country/date run of the batch command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTask {
    /// Two-letter code used for chart region filtering and file names
    pub cc: String,
    /// Full country name stored on resolved metadata rows
    pub country: String,
    /// Chart date (YYYY-MM-DD)
    pub date: String,
    /// Top-N chart positions to sample
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    DEFAULT_TOP_N
}

/// Resolve which config file to read, if any
///
/// Returns `(path, explicit)`: `explicit` is true when the path came from
/// the command line or the environment, so a missing file is an error.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<(PathBuf, bool)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some((path.to_path_buf(), true));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some((PathBuf::from(path), true));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().map(|p| (p, false))
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mood-index").join("config.toml"))
}

/// Load configuration following the priority order
pub fn load_config(cli_arg: Option<&Path>) -> Result<PipelineConfig> {
    match resolve_config_path(cli_arg) {
        Some((path, true)) => load_config_file(&path),
        Some((path, false)) if path.exists() => load_config_file(&path),
        Some((path, false)) => {
            warn!(
                path = %path.display(),
                "No config file found, using compiled defaults"
            );
            Ok(PipelineConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using compiled defaults");
            Ok(PipelineConfig::default())
        }
    }
}

/// Read and parse a TOML config file
pub fn load_config_file(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: PipelineConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!(
        path = %path.display(),
        tasks = config.tasks.len(),
        "Loaded pipeline configuration"
    );
    Ok(config)
}
