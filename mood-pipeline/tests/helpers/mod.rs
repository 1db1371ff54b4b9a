//! Test Helper Utilities
//!
//! Shared utilities for testing mood-pipeline

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod log_capture;
pub mod mock_resolver;

// Re-export commonly used items
pub use fixtures::{approx, feature, merged, resolved, write_file, CHARTS_CSV, FEATURES_CSV};
pub use log_capture::{capture_logs, LogCapture};
pub use mock_resolver::MockResolver;
