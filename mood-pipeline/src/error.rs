//! Error types for mood-pipeline stages
//!
//! Every stage returns [`StageError`]; the CLI turns it into a diagnostic
//! and a process exit code.

use crate::services::ResolverError;
use std::process::ExitCode;
use thiserror::Error;

/// Exit code for configuration and usage errors
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when a stage produced nothing to write
pub const EXIT_EMPTY: u8 = 3;
/// Exit code for every other failure
pub const EXIT_FAILURE: u8 = 1;

/// Stage error type
#[derive(Debug, Error)]
pub enum StageError {
    /// The stage's result was empty; nothing was written
    #[error("Empty result: {0}")]
    Empty(String),

    /// Catalog error that aborted the stage (per-track errors never do)
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    /// mood-common error
    #[error(transparent)]
    Common(#[from] mood_common::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    pub fn exit_code(&self) -> u8 {
        match self {
            StageError::Empty(_) => EXIT_EMPTY,
            StageError::Common(mood_common::Error::EmptyResult(_)) => EXIT_EMPTY,
            StageError::Common(mood_common::Error::Config(_))
            | StageError::Common(mood_common::Error::InvalidInput(_)) => EXIT_CONFIG,
            StageError::Resolver(ResolverError::Auth(_)) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}

impl From<StageError> for ExitCode {
    fn from(err: StageError) -> Self {
        ExitCode::from(err.exit_code())
    }
}

impl From<std::io::Error> for StageError {
    fn from(err: std::io::Error) -> Self {
        StageError::Common(mood_common::Error::Io(err))
    }
}

/// Result type for stage runners
pub type StageResult<T> = Result<T, StageError>;
