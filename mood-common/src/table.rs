//! Flat-file tabular I/O
//!
//! All pipeline tables are comma-separated UTF-8 files with a header row.
//! Column names are trimmed and lowercased on read so header variants
//! ("Track Name", " track name") resolve to the same column.
//!
//! Writes go to a process-unique temporary file next to the target and are
//! renamed into place once every row has been serialized, so a failed or
//! concurrent run never leaves a partial output file behind.

use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Canonical form of a column header (trim + lowercase)
pub fn normalize_column_name(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// A fully materialized CSV table with normalized column names
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<StringRecord>,
}

impl RawTable {
    /// Read a table from a CSV file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("{}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        let table = Self::from_reader(file)?;

        debug!(
            path = %path.display(),
            columns = table.columns.len(),
            rows = table.rows.len(),
            "Loaded table"
        );
        Ok(table)
    }

    /// Read a table from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let columns = rdr
            .headers()?
            .iter()
            .map(normalize_column_name)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in rdr.records() {
            rows.push(record?);
        }

        Ok(Self { columns, rows })
    }

    /// Normalized column names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows (header excluded)
    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a (normalized) column is present
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column, matched after normalization
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_column_name(name);
        self.columns.iter().position(|c| *c == wanted)
    }

    /// Position of the first column present among `candidates`
    pub fn first_column(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|c| self.column_index(c))
    }

    /// Fail with a configuration error listing every absent column
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.has_column(n))
            .map(|n| n.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::missing_columns(&missing))
        }
    }

    /// Deserialize every row into `T`, matching fields by normalized name
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let headers = StringRecord::from(self.columns.clone());
        self.rows
            .iter()
            .map(|row| row.deserialize(Some(&headers)).map_err(Error::from))
            .collect()
    }
}

/// Write records to `path` with an explicit header row
///
/// `columns` must list the header names in the same order as the fields
/// `T` serializes. Parent directories are created as needed.
pub fn write_records<T: Serialize>(path: &Path, columns: &[&str], records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path_for(path);
    let written = write_to(&tmp, columns, records);
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), rows = records.len(), "Wrote table");
    Ok(())
}

fn write_to<T: Serialize>(path: &Path, columns: &[&str], records: &[T]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(columns)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table.csv".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

/// Lenient field parsers for `#[serde(deserialize_with = ...)]`
///
/// Unparseable values become `None` instead of failing the row, the same
/// way a numeric coercion treats bad cells as missing.
pub mod lenient {
    use serde::{Deserialize, Deserializer};

    /// Parse a finite float; anything else is missing
    pub fn parse_f64(s: &str) -> Option<f64> {
        s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Parse an integer, accepting integral floats such as "80.0"
    pub fn parse_i64(s: &str) -> Option<i64> {
        let t = s.trim();
        t.parse::<i64>().ok().or_else(|| {
            parse_f64(t)
                .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
                .map(|v| v as i64)
        })
    }

    fn opt_raw<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(d)?;
        Ok(value.filter(|s| !s.trim().is_empty()))
    }

    pub fn opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        opt_raw(d)
    }

    pub fn opt_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_raw(d)?.as_deref().and_then(parse_f64))
    }

    pub fn opt_i64<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_raw(d)?.as_deref().and_then(parse_i64))
    }

    pub fn opt_u64<'de, D>(d: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_raw(d)?
            .as_deref()
            .and_then(parse_i64)
            .and_then(|v| u64::try_from(v).ok()))
    }
}
