//! Stage runners
//!
//! Each runner reads its inputs, computes its full output table, and only
//! then writes it. A runner whose result is empty logs a warning, writes
//! nothing and returns [`StageError::Empty`].

use super::paths::infer_metadata_path;
use crate::error::{StageError, StageResult};
use crate::models::{
    ChartEntry, MergedRecord, ResolvedMetadata, RunKey, METADATA_COLUMNS, PROCESSED_COLUMNS,
    SAMPLE_COLUMNS, SUMMARY_COLUMNS,
};
use crate::services::{
    load_audio_features, merge, select, summarize, MetadataEnricher, MetadataResolver,
};
use mood_common::table::write_records;
use mood_common::RawTable;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Columns a processed file needs to take part in the summary
const SUMMARY_INPUT_COLUMNS: &[&str] = &["country", "date", "mood_index"];

/// Output of a completed stage
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub output: PathBuf,
    pub rows: usize,
}

/// Output of a completed fetch stage, with per-track accounting
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub output: PathBuf,
    pub attempted: usize,
    pub resolved: usize,
    pub skipped: usize,
}

fn empty(what: String) -> StageError {
    warn!("{}", what);
    StageError::Empty(what)
}

/// Select the Top-N sample for one country and date from the chart table
pub fn run_select(
    charts: &Path,
    country: &str,
    date: &str,
    top_n: usize,
    out: &Path,
) -> StageResult<StageReport> {
    let table = RawTable::from_path(charts)?;
    let sample = select(&table, country, date, top_n)?;

    if sample.is_empty() {
        return Err(empty(format!(
            "No chart rows with a track id for country '{}' on {}",
            country, date
        )));
    }

    write_records(out, SAMPLE_COLUMNS, &sample)?;
    info!(output = %out.display(), rows = sample.len(), "Saved chart sample");

    Ok(StageReport {
        output: out.to_path_buf(),
        rows: sample.len(),
    })
}

/// Resolve every sample entry against the catalog
///
/// `country` is the full country name stamped on every output row.
pub async fn run_fetch(
    resolver: &dyn MetadataResolver,
    sample: &Path,
    country: &str,
    date: &str,
    out: &Path,
) -> StageResult<FetchReport> {
    let table = RawTable::from_path(sample)?;
    table.require_columns(&["track_name", "artist_name"])?;
    let entries: Vec<ChartEntry> = table.deserialize()?;

    if entries.is_empty() {
        return Err(empty(format!("Sample {} has no rows", sample.display())));
    }

    let report = MetadataEnricher::new(resolver)
        .enrich(&entries, country, date)
        .await;

    if report.rows.is_empty() {
        return Err(empty(format!(
            "No tracks could be resolved from {} ({} attempted)",
            sample.display(),
            report.attempted
        )));
    }

    write_records(out, METADATA_COLUMNS, &report.rows)?;
    info!(
        output = %out.display(),
        rows = report.rows.len(),
        skipped = report.skipped,
        "Saved resolved metadata"
    );

    Ok(FetchReport {
        output: out.to_path_buf(),
        attempted: report.attempted,
        resolved: report.resolved,
        skipped: report.skipped,
    })
}

/// Clean the public audio-features table
pub fn run_load_features(raw: &Path, out: &Path) -> StageResult<StageReport> {
    let table = RawTable::from_path(raw)?;
    let features = load_audio_features(&table)?;

    if features.is_empty() {
        return Err(empty(format!("Audio-features table {} has no rows", raw.display())));
    }

    write_records(out, crate::models::EXPECTED_FEATURE_COLUMNS, &features)?;
    info!(output = %out.display(), rows = features.len(), "Saved cleaned audio features");

    Ok(StageReport {
        output: out.to_path_buf(),
        rows: features.len(),
    })
}

/// Merge resolved metadata with the cleaned audio features
pub fn run_process(metadata: &Path, features: &Path, out: &Path) -> StageResult<StageReport> {
    let resolved: Vec<ResolvedMetadata> = RawTable::from_path(metadata)?.deserialize()?;
    let features = load_audio_features(&RawTable::from_path(features)?)?;

    info!(
        metadata_rows = resolved.len(),
        feature_rows = features.len(),
        "Loaded merge inputs"
    );

    let merged = merge(&resolved, &features);
    if merged.is_empty() {
        return Err(empty(format!(
            "No matching tracks between {} and the audio features",
            metadata.display()
        )));
    }

    write_records(out, PROCESSED_COLUMNS, &merged)?;
    info!(output = %out.display(), rows = merged.len(), "Saved processed data");

    Ok(StageReport {
        output: out.to_path_buf(),
        rows: merged.len(),
    })
}

/// Processed files directly inside `processed_dir`, sorted by name
pub fn find_processed_files(processed_dir: &Path) -> StageResult<Vec<PathBuf>> {
    if !processed_dir.is_dir() {
        return Err(mood_common::Error::NotFound(format!("{}", processed_dir.display())).into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(processed_dir).min_depth(1).max_depth(1) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_processed_name(&entry.file_name().to_string_lossy()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => warn!("Error accessing entry: {}", e),
        }
    }

    files.sort();
    Ok(files)
}

/// `*_mood_*.csv`
fn is_processed_name(name: &str) -> bool {
    name.contains("_mood_") && name.ends_with(".csv")
}

/// Processed rows grouped by run, plus the resolved-metadata row counts
#[derive(Debug, Default)]
pub struct SummaryInputs {
    pub groups: BTreeMap<RunKey, Vec<MergedRecord>>,
    pub chart_population: HashMap<RunKey, u64>,
}

/// Read every usable processed file and its metadata file
pub fn collect_summary_inputs(files: &[PathBuf], interim_dir: &Path) -> SummaryInputs {
    let mut inputs = SummaryInputs::default();
    let mut counted_metadata: HashSet<PathBuf> = HashSet::new();

    for path in files {
        let table = match RawTable::from_path(path) {
            Ok(table) => table,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable processed file");
                continue;
            }
        };
        if table.is_empty() {
            debug!(path = %path.display(), "Skipping empty processed file");
            continue;
        }
        if let Err(e) = table.require_columns(SUMMARY_INPUT_COLUMNS) {
            warn!(path = %path.display(), error = %e, "Skipping processed file");
            continue;
        }
        let records: Vec<MergedRecord> = match table.deserialize() {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping malformed processed file");
                continue;
            }
        };

        for record in records {
            let key = RunKey::new(record.country.clone(), record.date.clone());
            inputs.groups.entry(key).or_default().push(record);
        }

        match infer_metadata_path(path, interim_dir) {
            Some(meta) if counted_metadata.insert(meta.clone()) => {
                count_metadata_rows(&meta, &mut inputs.chart_population);
            }
            Some(_) => {}
            None => debug!(path = %path.display(), "No metadata file, coverage unknown"),
        }
    }

    inputs
}

fn count_metadata_rows(path: &Path, population: &mut HashMap<RunKey, u64>) {
    let rows: Vec<ResolvedMetadata> = match RawTable::from_path(path).and_then(|t| t.deserialize()) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable metadata file, coverage unknown");
            return;
        }
    };

    for row in rows {
        *population.entry(RunKey::new(row.country, row.date)).or_default() += 1;
    }
}

/// Recompute the cross-country summary from every processed file
pub fn run_summarize(processed_dir: &Path, interim_dir: &Path, out: &Path) -> StageResult<StageReport> {
    let files = find_processed_files(processed_dir)?;
    debug!(dir = %processed_dir.display(), files = files.len(), "Found processed files");

    let inputs = collect_summary_inputs(&files, interim_dir);
    let summary = summarize(&inputs.groups, &inputs.chart_population);

    if summary.is_empty() {
        return Err(empty(format!(
            "No processed files with data in {}",
            processed_dir.display()
        )));
    }

    write_records(out, SUMMARY_COLUMNS, &summary)?;
    info!(output = %out.display(), rows = summary.len(), "Saved summary");

    Ok(StageReport {
        output: out.to_path_buf(),
        rows: summary.len(),
    })
}
