//! Data models for the mood index pipeline
//!
//! One module per table the stages exchange. Every table is fully
//! materialized by the stage that produces it before the next stage reads it.

pub mod chart;
pub mod features;
pub mod merged;
pub mod metadata;
pub mod summary;

pub use chart::{ChartEntry, RunKey, SAMPLE_COLUMNS};
pub use features::{AudioFeatureRecord, EXPECTED_FEATURE_COLUMNS};
pub use merged::{mood_index, MatchKind, MergedRecord, ReconciledRow, PROCESSED_COLUMNS};
pub use metadata::{ResolvedMetadata, GENRE_SEPARATOR, METADATA_COLUMNS};
pub use summary::{CountrySummary, SUMMARY_COLUMNS};
