//! Multi-country batch run
//!
//! Runs select → fetch → process for every configured task in order. A
//! failing task is logged and the batch moves on to the next one; the
//! caller decides how to report failures.

use super::paths::{metadata_path, processed_path, sample_path, validate_country_code, validate_date};
use super::stages::{run_fetch, run_process, run_select, run_summarize, StageReport};
use crate::error::{StageError, StageResult};
use crate::services::MetadataResolver;
use mood_common::config::{PathsConfig, RunTask};
use tracing::{error, info};

/// One task that did not complete
#[derive(Debug)]
pub struct TaskFailure {
    pub task: RunTask,
    pub error: StageError,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Processed outputs of the tasks that completed, in task order
    pub completed: Vec<StageReport>,
    pub failed: Vec<TaskFailure>,
    /// Present when summarization was requested and succeeded
    pub summary: Option<StageReport>,
    /// Present when summarization was requested and failed
    pub summary_error: Option<StageError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.summary_error.is_none()
    }
}

/// Run one task end to end
pub async fn run_task(
    resolver: &dyn MetadataResolver,
    paths: &PathsConfig,
    task: &RunTask,
) -> StageResult<StageReport> {
    validate_country_code(&task.cc)?;
    validate_date(&task.date)?;

    let sample = sample_path(&paths.raw_dir, &task.cc, &task.date);
    let metadata = metadata_path(&paths.interim_dir, &task.cc, &task.date);
    let processed = processed_path(&paths.processed_dir, &task.cc, &task.date);

    run_select(&paths.charts, &task.cc, &task.date, task.top, &sample)?;
    run_fetch(resolver, &sample, &task.country, &task.date, &metadata).await?;
    run_process(&metadata, &paths.features_clean, &processed)
}

/// Run every task, then optionally recompute the summary
pub async fn run_batch(
    resolver: &dyn MetadataResolver,
    paths: &PathsConfig,
    tasks: &[RunTask],
    summarize: bool,
) -> BatchReport {
    let mut report = BatchReport::default();

    for task in tasks {
        info!(cc = %task.cc, country = %task.country, date = %task.date, top = task.top, "Starting task");

        match run_task(resolver, paths, task).await {
            Ok(stage) => {
                info!(cc = %task.cc, date = %task.date, rows = stage.rows, "Task complete");
                report.completed.push(stage);
            }
            Err(e) => {
                error!(cc = %task.cc, date = %task.date, error = %e, "Task failed");
                report.failed.push(TaskFailure {
                    task: task.clone(),
                    error: e,
                });
            }
        }
    }

    if summarize {
        match run_summarize(&paths.processed_dir, &paths.interim_dir, &paths.summary) {
            Ok(stage) => report.summary = Some(stage),
            Err(e) => {
                error!(error = %e, "Summary failed");
                report.summary_error = Some(e);
            }
        }
    }

    info!(
        tasks = tasks.len(),
        completed = report.completed.len(),
        failed = report.failed.len(),
        "Batch run complete"
    );

    report
}
