use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error};
use tokio::runtime;

use super::{run_task_isolated, PoolError, PoolStrategy};
use crate::processing::task::{ImageTask, TaskResult};

/// Per-task submission onto a tokio blocking pool capped at `worker_count`
/// threads. Results are drained in completion order through a
/// `FuturesUnordered` stream, then re-keyed by source path to restore the
/// input order for reporting. A panicked task surfaces as a `JoinError` on
/// its own handle and becomes a `Failure` result; the other handles are
/// unaffected. The runtime lives only for the duration of the run, so all
/// workers are torn down before this returns.
pub struct FuturesPool;

impl PoolStrategy for FuturesPool {
    fn name(&self) -> &'static str {
        "futures-pool"
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

        // results are re-keyed by source path, so duplicates would shadow
        // each other in the collection map
        debug_assert_eq!(
            tasks
                .iter()
                .map(|task| &task.source_path)
                .collect::<std::collections::HashSet<_>>()
                .len(),
            tasks.len(),
            "duplicate source paths in task list"
        );

        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(worker_count.max(1))
            .thread_name("futures-worker")
            .build()
            .map_err(|error| PoolError::PoolStart(error.to_string()))?;

        let mut completed: HashMap<PathBuf, TaskResult> = runtime.block_on(async {
            let mut pending = FuturesUnordered::new();

            for task in tasks {
                let source_path = task.source_path.clone();
                let task = task.clone();
                let out_dir = out_dir.to_path_buf();
                let handle =
                    tokio::task::spawn_blocking(move || run_task_isolated(&task, &out_dir));
                pending.push(async move { (source_path, handle.await) });
            }

            let mut completed = HashMap::with_capacity(tasks.len());
            while let Some((source_path, joined)) = pending.next().await {
                let result = match joined {
                    Ok(result) => result,
                    Err(join_error) => {
                        error!("worker for {} crashed: {}", source_path.display(), join_error);
                        TaskResult::failure(
                            source_path.clone(),
                            0.0,
                            format!("worker crash: {}", join_error),
                        )
                    }
                };
                debug!("collected {}", source_path.display());
                completed.insert(source_path, result);
            }
            completed
        });

        Ok(tasks
            .iter()
            .map(|task| {
                completed.remove(&task.source_path).unwrap_or_else(|| {
                    TaskResult::failure(
                        task.source_path.clone(),
                        0.0,
                        "task was never collected from the pool".into(),
                    )
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::static_pool::StaticPool;
    use crate::tests_common::{make_tasks, write_corrupt_image, write_sample_images, TestDir};

    #[test]
    fn one_result_per_task_rekeyed_to_input_order() {
        let dir = TestDir::new();
        let sources = write_sample_images(&dir.root, 5);
        let out_dir = dir.subdir("out");
        let tasks = make_tasks(&sources);

        let results = FuturesPool.run(&tasks, &out_dir, 3).unwrap();

        assert_eq!(results.len(), tasks.len());
        for (task, result) in tasks.iter().zip(&results) {
            assert_eq!(task.source_path, result.source_path);
        }
    }

    #[test]
    fn corrupt_image_fails_alone() {
        let dir = TestDir::new();
        let mut sources = write_sample_images(&dir.root, 3);
        sources.push(write_corrupt_image(&dir.root, "zz_corrupt.jpg"));
        let out_dir = dir.subdir("out");
        let tasks = make_tasks(&sources);

        let results = FuturesPool.run(&tasks, &out_dir, 2).unwrap();

        assert_eq!(results.iter().filter(|r| !r.is_success()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_success()).count(), 3);
    }

    #[test]
    fn empty_task_list_yields_no_results() {
        let dir = TestDir::new();
        let results = FuturesPool.run(&[], &dir.root, 4).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    #[should_panic(expected = "duplicate source paths")]
    fn duplicate_source_paths_are_rejected() {
        let dir = TestDir::new();
        let sources = write_sample_images(&dir.root, 1);
        let duplicated = vec![sources[0].clone(), sources[0].clone()];
        let tasks = make_tasks(&duplicated);

        let _ = FuturesPool.run(&tasks, &dir.subdir("out"), 2);
    }

    #[test]
    fn matches_static_pool_outcome_per_source() {
        let dir = TestDir::new();
        let mut sources = write_sample_images(&dir.root, 4);
        sources.insert(1, write_corrupt_image(&dir.root, "bad.jpg"));
        let tasks = make_tasks(&sources);

        let static_results = StaticPool.run(&tasks, &dir.subdir("static"), 2).unwrap();
        let futures_results = FuturesPool.run(&tasks, &dir.subdir("futures"), 2).unwrap();

        for (a, b) in static_results.iter().zip(&futures_results) {
            assert_eq!(a.source_path, b.source_path);
            assert_eq!(a.is_success(), b.is_success());
        }
    }
}
