//! mood-pipeline library interface
//!
//! Exposes the pipeline stages and services for the CLI and for
//! integration testing.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{StageError, StageResult};
