//! mood-pipeline - Mood Index pipeline CLI
//!
//! One subcommand per stage plus a batch `run` over the configured tasks:
//!
//! ```bash
//! mood-pipeline select --country ES --date 2017-08-01 --top 50 --out data/raw/ES_sample_2017-08-01.csv
//! mood-pipeline fetch --input data/raw/ES_sample_2017-08-01.csv --country Spain --date 2017-08-01 --out data/interim/ES_metadata_2017-08-01.csv
//! mood-pipeline load-features
//! mood-pipeline process --meta data/interim/ES_metadata_2017-08-01.csv --out data/processed/ES_mood_2017-08-01.csv
//! mood-pipeline summarize
//! mood-pipeline run --summarize
//! ```
//!
//! Exit codes: 0 success, 1 failure, 2 configuration or usage error,
//! 3 empty result (nothing written).

use anyhow::Context;
use clap::{Parser, Subcommand};
use mood_common::config::{load_config, PipelineConfig, DEFAULT_TOP_N};
use mood_common::logging::init_tracing;
use mood_pipeline::config::resolve_client_credentials;
use mood_pipeline::error::EXIT_CONFIG;
use mood_pipeline::services::SpotifyClient;
use mood_pipeline::workflow::paths::validate_date;
use mood_pipeline::workflow::{
    run_batch, run_fetch, run_load_features, run_process, run_select, run_summarize,
};
use mood_pipeline::{StageError, StageResult};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "mood-pipeline")]
#[command(about = "Mood Index pipeline: chart sampling, catalog enrichment, audio-feature merge and country summaries")]
#[command(version)]
struct Cli {
    /// Config file (overrides MOOD_CONFIG and the platform default)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select the Top-N chart sample for one country and date
    Select {
        /// Worldwide daily chart table (default: [paths] charts)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Country name or region code (e.g. Spain or ES)
        #[arg(long)]
        country: String,
        /// Chart date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
        #[arg(long)]
        out: PathBuf,
    },

    /// Resolve a chart sample against the catalog
    Fetch {
        /// Chart sample produced by `select`
        #[arg(long)]
        input: PathBuf,
        /// Full country name stored on every row
        #[arg(long)]
        country: String,
        /// Run date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long)]
        out: PathBuf,
    },

    /// Clean the public audio-features table
    LoadFeatures {
        /// Raw table (default: [paths] features_raw)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Cleaned table (default: [paths] features_clean)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Merge resolved metadata with audio features and compute the Mood Index
    Process {
        /// Resolved metadata produced by `fetch`
        #[arg(long)]
        meta: PathBuf,
        /// Cleaned audio features (default: [paths] features_clean)
        #[arg(long)]
        features: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },

    /// Recompute the cross-country summary from every processed file
    Summarize {
        /// Directory of processed files (default: [paths] processed_dir)
        #[arg(long)]
        processed_dir: Option<PathBuf>,
        /// Directory of metadata files (default: [paths] interim_dir)
        #[arg(long)]
        interim_dir: Option<PathBuf>,
        /// Summary output (default: [paths] summary)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run select → fetch → process for every configured task
    Run {
        /// Recompute the summary after the tasks
        #[arg(long)]
        summarize: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    init_tracing(&config.logging);
    info!("mood-pipeline {}", env!("CARGO_PKG_VERSION"));

    match execute(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(exit_code = e.exit_code(), "{}", e);
            e.into()
        }
    }
}

async fn execute(command: Command, config: &PipelineConfig) -> StageResult<()> {
    let paths = &config.paths;

    match command {
        Command::Select {
            input,
            country,
            date,
            top,
            out,
        } => {
            validate_date(&date)?;
            let input = input.unwrap_or_else(|| paths.charts.clone());
            run_select(&input, &country, &date, top, &out)?;
        }

        Command::Fetch {
            input,
            country,
            date,
            out,
        } => {
            validate_date(&date)?;
            let client = build_client(config)?;
            run_fetch(&client, &input, &country, &date, &out).await?;
        }

        Command::LoadFeatures { input, out } => {
            let input = input.unwrap_or_else(|| paths.features_raw.clone());
            let out = out.unwrap_or_else(|| paths.features_clean.clone());
            run_load_features(&input, &out)?;
        }

        Command::Process {
            meta,
            features,
            out,
        } => {
            let features = features.unwrap_or_else(|| paths.features_clean.clone());
            run_process(&meta, &features, &out)?;
        }

        Command::Summarize {
            processed_dir,
            interim_dir,
            out,
        } => {
            let processed_dir = processed_dir.unwrap_or_else(|| paths.processed_dir.clone());
            let interim_dir = interim_dir.unwrap_or_else(|| paths.interim_dir.clone());
            let out = out.unwrap_or_else(|| paths.summary.clone());
            run_summarize(&processed_dir, &interim_dir, &out)?;
        }

        Command::Run { summarize } => {
            if config.tasks.is_empty() {
                return Err(mood_common::Error::InvalidInput(
                    "No [[tasks]] configured for the batch run".to_string(),
                )
                .into());
            }

            let client = build_client(config)?;
            let report = run_batch(&client, paths, &config.tasks, summarize).await;

            if !report.is_success() {
                let failed: Vec<String> = report
                    .failed
                    .iter()
                    .map(|f| format!("{}/{}", f.task.cc, f.task.date))
                    .collect();
                return Err(StageError::Other(anyhow::anyhow!(
                    "{} of {} tasks failed [{}]{}",
                    failed.len(),
                    config.tasks.len(),
                    failed.join(", "),
                    if report.summary_error.is_some() { ", summary failed" } else { "" }
                )));
            }
        }
    }

    Ok(())
}

/// Resolve credentials and build the catalog client
///
/// Runs before any stage output is written, so missing credentials abort
/// cleanly.
fn build_client(config: &PipelineConfig) -> StageResult<SpotifyClient> {
    let credentials = resolve_client_credentials(&config.resolver)?;
    let client = SpotifyClient::new(&config.resolver, credentials)
        .context("Failed to build catalog HTTP client")?;
    Ok(client)
}
