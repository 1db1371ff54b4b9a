//! Stage orchestration
//!
//! - `paths`: per-run file naming and CLI value validation
//! - `stages`: one runner per pipeline stage, each writing one table
//! - `batch`: multi-country runs over the configured task list

pub mod batch;
pub mod paths;
pub mod stages;

pub use batch::{run_batch, run_task, BatchReport, TaskFailure};
pub use stages::{
    run_fetch, run_load_features, run_process, run_select, run_summarize, FetchReport, StageReport,
};
