//! Per-run file naming
//!
//! A run is identified by a two-letter country code and a date:
//! - `raw_dir/{CC}_sample_{date}.csv`
//! - `interim_dir/{CC}_metadata_{date}.csv`
//! - `processed_dir/{CC}_mood_{date}.csv`

use chrono::NaiveDate;
use mood_common::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static PROCESSED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{2})_mood_(\d{4}-\d{2}-\d{2})\.csv$").expect("valid processed name pattern")
});

pub fn sample_path(raw_dir: &Path, cc: &str, date: &str) -> PathBuf {
    raw_dir.join(format!("{}_sample_{}.csv", cc.to_uppercase(), date))
}

pub fn metadata_path(interim_dir: &Path, cc: &str, date: &str) -> PathBuf {
    interim_dir.join(format!("{}_metadata_{}.csv", cc.to_uppercase(), date))
}

pub fn processed_path(processed_dir: &Path, cc: &str, date: &str) -> PathBuf {
    processed_dir.join(format!("{}_mood_{}.csv", cc.to_uppercase(), date))
}

/// Country code (uppercased) and date of a processed file name
pub fn parse_processed_name(path: &Path) -> Option<(String, String)> {
    let name = path.file_name()?.to_str()?;
    let caps = PROCESSED_NAME.captures(name)?;
    Some((caps[1].to_uppercase(), caps[2].to_string()))
}

/// Metadata file of the run that produced `processed`, if it exists
pub fn infer_metadata_path(processed: &Path, interim_dir: &Path) -> Option<PathBuf> {
    let (cc, date) = parse_processed_name(processed)?;
    let candidate = metadata_path(interim_dir, &cc, &date);
    candidate.is_file().then_some(candidate)
}

/// Validate a `YYYY-MM-DD` date
pub fn validate_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("Invalid date '{}' (expected YYYY-MM-DD): {}", date, e)))
}

/// Validate a two-letter country code
pub fn validate_country_code(cc: &str) -> Result<()> {
    if cc.len() == 2 && cc.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Invalid country code '{}' (expected two letters)",
            cc
        )))
    }
}
