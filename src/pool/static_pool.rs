use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, warn};

use super::{run_task_isolated, PoolError, PoolStrategy};
use crate::processing::task::{ImageTask, TaskResult};

/// Fixed-size pool with static task mapping: the task list is split into
/// contiguous chunks, one chunk per worker thread, and the blocking run
/// returns results in input order. Each worker sends `(index, result)`
/// records back over an mpsc channel; slots a dead thread never reported
/// are surfaced as failures, so no task is lost or hangs the collection.
pub struct StaticPool;

impl PoolStrategy for StaticPool {
    fn name(&self) -> &'static str {
        "static-pool"
    }

    fn run(
        &self,
        tasks: &[ImageTask],
        out_dir: &Path,
        worker_count: usize,
    ) -> Result<Vec<TaskResult>, PoolError> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let worker_count = worker_count.clamp(1, tasks.len());
        let chunk_size = (tasks.len() + worker_count - 1) / worker_count;

        let (tx, rx) = mpsc::channel::<(usize, TaskResult)>();
        let mut handles = Vec::with_capacity(worker_count);

        for (worker_id, chunk) in tasks.chunks(chunk_size).enumerate() {
            let tx = tx.clone();
            let out_dir = out_dir.to_path_buf();
            let chunk: Vec<(usize, ImageTask)> = chunk
                .iter()
                .cloned()
                .enumerate()
                .map(|(offset, task)| (worker_id * chunk_size + offset, task))
                .collect();

            debug!("static worker {} takes {} tasks", worker_id, chunk.len());

            let handle = thread::Builder::new()
                .name(format!("static-worker-{}", worker_id))
                .spawn(move || {
                    for (index, task) in chunk {
                        let result = run_task_isolated(&task, &out_dir);
                        if tx.send((index, result)).is_err() {
                            // coordinator is gone, nothing left to report to
                            return;
                        }
                    }
                })
                .map_err(|error| PoolError::PoolStart(error.to_string()))?;

            handles.push(handle);
        }
        drop(tx);

        let mut slots: Vec<Option<TaskResult>> = tasks.iter().map(|_| None).collect();
        for (index, result) in rx {
            slots[index] = Some(result);
        }

        for handle in handles {
            if handle.join().is_err() {
                warn!("a static pool worker thread died");
            }
        }

        Ok(slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    TaskResult::failure(
                        tasks[index].source_path.clone(),
                        0.0,
                        "worker thread terminated before reporting".into(),
                    )
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::filter::FilterKind;
    use crate::tests_common::{make_tasks, write_corrupt_image, write_sample_images, TestDir};

    #[test]
    fn one_result_per_task_in_input_order() {
        let dir = TestDir::new();
        let sources = write_sample_images(&dir.root, 6);
        let out_dir = dir.subdir("out");
        let tasks = make_tasks(&sources);

        let results = StaticPool.run(&tasks, &out_dir, 3).unwrap();

        assert_eq!(results.len(), tasks.len());
        for (task, result) in tasks.iter().zip(&results) {
            assert_eq!(task.source_path, result.source_path);
            assert!(result.is_success());
        }
    }

    #[test]
    fn corrupt_image_fails_alone() {
        let dir = TestDir::new();
        let mut sources = write_sample_images(&dir.root, 4);
        sources.insert(2, write_corrupt_image(&dir.root, "corrupt.jpg"));
        let out_dir = dir.subdir("out");
        let tasks = make_tasks(&sources);

        let results = StaticPool.run(&tasks, &out_dir, 2).unwrap();

        assert_eq!(results.iter().filter(|r| !r.is_success()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_success()).count(), 4);
        assert!(!results[2].is_success());
    }

    #[test]
    fn empty_task_list_yields_no_results() {
        let dir = TestDir::new();
        let results = StaticPool.run(&[], &dir.root, 4).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn more_workers_than_tasks_is_fine() {
        let dir = TestDir::new();
        let sources = write_sample_images(&dir.root, 2);
        let out_dir = dir.subdir("out");
        let tasks = make_tasks(&sources);

        let results = StaticPool.run(&tasks, &out_dir, 16).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn single_filter_task_only_writes_that_artifact() {
        let dir = TestDir::new();
        let sources = write_sample_images(&dir.root, 1);
        let out_dir = dir.subdir("out");
        let tasks = vec![ImageTask::new(&sources[0], vec![FilterKind::Sharpen])];

        let results = StaticPool.run(&tasks, &out_dir, 1).unwrap();

        assert_eq!(results[0].output_paths.len(), 1);
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 1);
    }
}
