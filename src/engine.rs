use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{error, info};
use serde::Serialize;

use crate::pool::futures_pool::FuturesPool;
use crate::pool::static_pool::StaticPool;
use crate::pool::{PoolError, PoolStrategy};
use crate::processing::filter::FilterKind;
use crate::processing::task::{ImageTask, TaskResult};

/// Everything the benchmark runner needs for one invocation.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub worker_count: usize,
    pub filters: Vec<FilterKind>,
    pub image_list: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

/// Aggregated timing and outcome statistics of one finalized strategy run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub strategy_name: String,
    pub total_wall_seconds: f64,
    pub per_task_durations: Vec<f64>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl RunStats {
    fn from_results(strategy_name: &str, total_wall_seconds: f64, results: &[TaskResult]) -> Self {
        Self {
            strategy_name: strategy_name.to_string(),
            total_wall_seconds,
            per_task_durations: results.iter().map(|r| r.duration_seconds).collect(),
            success_count: results.iter().filter(|r| r.is_success()).count(),
            failure_count: results.iter().filter(|r| !r.is_success()).count(),
        }
    }

    /// Sum of the per-task processing spans, i.e. the work the pool hid
    /// behind parallelism.
    pub fn processing_seconds_total(&self) -> f64 {
        self.per_task_durations.iter().sum()
    }

    pub fn average_task_seconds(&self) -> f64 {
        if self.per_task_durations.is_empty() {
            0.0
        } else {
            self.processing_seconds_total() / self.per_task_durations.len() as f64
        }
    }
}

/// Wall-clock comparison of two finalized runs.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub baseline: String,
    pub contender: String,
    /// baseline wall time divided by contender wall time; > 1.0 means the
    /// contender was faster.
    pub speedup: f64,
}

/// One finalized strategy run: the stats plus every collected result.
#[derive(Debug)]
pub struct StrategyRun {
    pub stats: RunStats,
    pub results: Vec<TaskResult>,
}

#[derive(Debug)]
pub struct BenchReport {
    pub runs: Vec<StrategyRun>,
    pub failed_runs: Vec<(String, PoolError)>,
    pub comparison: Option<Comparison>,
}

/// One worker count of a scalability sweep, with the full report it produced.
#[derive(Debug)]
pub struct SweepEntry {
    pub worker_count: usize,
    pub report: BenchReport,
}

/// Pause between sweep entries so one entry's pool teardown does not bleed
/// into the next entry's timing.
const SETTLE_DELAY: Duration = Duration::from_millis(250);

/// The scalability experiment: runs the whole benchmark once per worker
/// count, same task list, one `BenchReport` per count.
pub fn run_sweep(config: &BenchConfig, worker_counts: &[usize]) -> Vec<SweepEntry> {
    let mut entries = Vec::with_capacity(worker_counts.len());

    for (position, &worker_count) in worker_counts.iter().enumerate() {
        if position > 0 {
            std::thread::sleep(SETTLE_DELAY);
        }

        info!("sweep entry: {} workers", worker_count);
        let run_config = BenchConfig {
            worker_count,
            ..config.clone()
        };
        entries.push(SweepEntry {
            worker_count,
            report: run_benchmark(&run_config),
        });
    }

    entries
}

/// Runs the full task list under both strategies, one after the other so
/// neither pool's resource usage skews the other's timing. A strategy whose
/// pool cannot start is recorded in `failed_runs`; the other strategy still
/// runs and keeps its stats.
pub fn run_benchmark(config: &BenchConfig) -> BenchReport {
    let tasks: Vec<ImageTask> = config
        .image_list
        .iter()
        .map(|path| ImageTask::new(path.clone(), config.filters.clone()))
        .collect();

    let strategies: [Box<dyn PoolStrategy>; 2] = [Box::new(StaticPool), Box::new(FuturesPool)];

    let mut runs = Vec::new();
    let mut failed_runs = Vec::new();

    for strategy in &strategies {
        match run_strategy(strategy.as_ref(), &tasks, config) {
            Ok(run) => runs.push(run),
            Err(pool_error) => {
                error!("{} run aborted: {}", strategy.name(), pool_error);
                failed_runs.push((strategy.name().to_string(), pool_error));
            }
        }
    }

    let comparison = match runs.as_slice() {
        [baseline, contender] => Some(Comparison {
            baseline: baseline.stats.strategy_name.clone(),
            contender: contender.stats.strategy_name.clone(),
            speedup: baseline.stats.total_wall_seconds / contender.stats.total_wall_seconds,
        }),
        _ => None,
    };

    BenchReport {
        runs,
        failed_runs,
        comparison,
    }
}

fn run_strategy(
    strategy: &dyn PoolStrategy,
    tasks: &[ImageTask],
    config: &BenchConfig,
) -> Result<StrategyRun, PoolError> {
    info!(
        "dispatching {} tasks to {} with {} workers",
        tasks.len(),
        strategy.name(),
        config.worker_count
    );

    let started = Instant::now();
    let results = strategy.run(tasks, &config.output_dir, config.worker_count)?;
    let total_wall_seconds = started.elapsed().as_secs_f64();

    debug_assert_eq!(results.len(), tasks.len());

    let stats = RunStats::from_results(strategy.name(), total_wall_seconds, &results);
    info!(
        "{} finalized: {:.2}s wall, {} ok, {} failed",
        stats.strategy_name, stats.total_wall_seconds, stats.success_count, stats.failure_count
    );

    Ok(StrategyRun { stats, results })
}
