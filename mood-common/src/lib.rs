//! # Mood Index Common Library
//!
//! Shared code for the mood index pipeline crates:
//! - Error types
//! - Configuration loading (TOML + environment)
//! - Logging initialisation
//! - Flat-file tabular I/O (CSV with normalised headers, atomic writes)

pub mod config;
pub mod error;
pub mod logging;
pub mod table;

pub use error::{Error, Result};
pub use table::RawTable;
