use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use super::filter::FilterKind;

/// One unit of work: a source image plus the filters to apply to it.
/// Built once by the benchmark runner, consumed exactly once by a worker.
#[derive(Debug, Clone)]
pub struct ImageTask {
    pub source_path: PathBuf,
    pub filters: Vec<FilterKind>,
}

impl ImageTask {
    pub fn new(source_path: impl Into<PathBuf>, filters: Vec<FilterKind>) -> Self {
        Self {
            source_path: source_path.into(),
            filters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TaskStatus {
    Success,
    Failure(String),
}

/// What a worker reports back for one task. `duration_seconds` covers the
/// decode + filter + write span only, never pool startup.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub source_path: PathBuf,
    pub output_paths: BTreeMap<FilterKind, PathBuf>,
    pub duration_seconds: f64,
    pub status: TaskStatus,
}

impl TaskResult {
    pub fn failure(source_path: PathBuf, duration_seconds: f64, message: String) -> Self {
        Self {
            source_path,
            output_paths: BTreeMap::new(),
            duration_seconds,
            status: TaskStatus::Failure(message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Success
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            TaskStatus::Success => None,
            TaskStatus::Failure(message) => Some(message),
        }
    }
}
