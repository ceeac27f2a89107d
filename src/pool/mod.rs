pub mod futures_pool;
pub mod static_pool;

use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use log::error;

use crate::processing::pipeline;
use crate::processing::task::{ImageTask, TaskResult};
use crate::processing::TaskError;

/// A policy for distributing tasks across workers and collecting results.
/// Both implementations guarantee exactly one `TaskResult` per submitted
/// task, in input order, and tear their workers down before returning.
pub trait PoolStrategy {
    fn name(&self) -> &'static str;

    fn run(
        &self,
        tasks: &[ImageTask],
        out_dir: &Path,
        worker_count: usize,
    ) -> Result<Vec<TaskResult>, PoolError>;
}

/// Fatal to a single strategy run; the other strategy still proceeds.
#[derive(Debug, Clone)]
pub enum PoolError {
    PoolStart(String),
}

impl Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::PoolStart(message) => write!(f, "worker pool failed to start: {}", message),
        }
    }
}

impl std::error::Error for PoolError {}

pub fn default_worker_count() -> usize {
    num_cpus::get().max(1)
}

/// Runs one task with panic isolation: a crashed worker body becomes a
/// `Failure` result for that task instead of taking the whole run down.
pub(crate) fn run_task_isolated(task: &ImageTask, out_dir: &Path) -> TaskResult {
    match catch_unwind(AssertUnwindSafe(|| pipeline::run_task(task, out_dir))) {
        Ok(result) => result,
        Err(_) => {
            error!("worker crashed while processing {}", task.source_path.display());
            TaskResult::failure(
                task.source_path.clone(),
                0.0,
                TaskError::WorkerCrash("worker panicked mid-task".into()).to_string(),
            )
        }
    }
}
