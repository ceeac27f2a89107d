use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::warn;

use super::data_loader;
use super::filter::FilterKind;
use super::task::{ImageTask, TaskResult, TaskStatus};
use super::TaskError;

/// Output artifact path for one (source, filter) pair, e.g. `dir/cat_gray.jpg`.
pub fn output_path(out_dir: &Path, source: &Path, kind: FilterKind) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());

    out_dir.join(format!("{}_{}.jpg", stem, kind.suffix()))
}

/// Runs the whole pipeline for one task: decode once, render every filter off
/// the original decode, write every artifact. Any error marks the task as a
/// `Failure` and removes artifacts that were already written, so a task never
/// leaves partial output behind.
pub fn run_task(task: &ImageTask, out_dir: &Path) -> TaskResult {
    let started = Instant::now();

    match apply_filters(task, out_dir) {
        Ok(output_paths) => TaskResult {
            source_path: task.source_path.clone(),
            output_paths,
            duration_seconds: started.elapsed().as_secs_f64(),
            status: TaskStatus::Success,
        },
        Err(error) => {
            warn!("task {} failed: {}", task.source_path.display(), error);
            cleanup_partial_outputs(task, out_dir);
            TaskResult::failure(
                task.source_path.clone(),
                started.elapsed().as_secs_f64(),
                error.to_string(),
            )
        }
    }
}

fn apply_filters(
    task: &ImageTask,
    out_dir: &Path,
) -> Result<BTreeMap<FilterKind, PathBuf>, TaskError> {
    let source = data_loader::load_image(&task.source_path)
        .map_err(|error| TaskError::Decode(error.to_string()))?;

    let mut output_paths = BTreeMap::new();

    for &kind in &task.filters {
        let rendered = catch_unwind(AssertUnwindSafe(|| kind.apply(&source)))
            .map_err(|_| TaskError::Filter(format!("{} panicked", kind)))?;

        let path = output_path(out_dir, &task.source_path, kind);
        data_loader::save_image(&path, &rendered)
            .map_err(|error| TaskError::Write(error.to_string()))?;

        output_paths.insert(kind, path);
    }

    Ok(output_paths)
}

fn cleanup_partial_outputs(task: &ImageTask, out_dir: &Path) {
    for &kind in &task.filters {
        let path = output_path(out_dir, &task.source_path, kind);
        if path.exists() {
            if let Err(error) = std::fs::remove_file(&path) {
                warn!("could not remove partial output {}: {}", path.display(), error);
            }
        }
    }
}
