pub mod data_loader;
pub mod file_loader;
pub mod filter;
pub mod pipeline;
pub mod task;

use std::fmt::Display;

/// Per-task error taxonomy. All of these are caught inside the worker and
/// converted into a `Failure` result - they never abort a batch.
#[derive(Debug, Clone)]
pub enum TaskError {
    Decode(String),
    Filter(String),
    Write(String),
    WorkerCrash(String),
}

impl Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::Decode(message) => write!(f, "decode error: {}", message),
            TaskError::Filter(message) => write!(f, "filter error: {}", message),
            TaskError::Write(message) => write!(f, "write error: {}", message),
            TaskError::WorkerCrash(message) => write!(f, "worker crash: {}", message),
        }
    }
}

impl std::error::Error for TaskError {}
