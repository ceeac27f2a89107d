use std::fmt::Display;
use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;

use crate::engine::{BenchConfig, Comparison, RunStats, SweepEntry};

#[derive(Debug)]
pub enum ReportError {
    Io(String),
    Serialization,
}

impl Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(message) => write!(f, "report io error: {}", message),
            ReportError::Serialization => write!(f, "report serialization error"),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<std::io::Error> for ReportError {
    fn from(error: std::io::Error) -> Self {
        ReportError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(_: serde_json::Error) -> Self {
        ReportError::Serialization
    }
}

#[derive(Debug, Serialize)]
struct FailureRecord<'a> {
    source_path: &'a Path,
    error: &'a str,
}

#[derive(Debug, Serialize)]
struct StrategyRecord<'a> {
    #[serde(flatten)]
    stats: &'a RunStats,
    failures: Vec<FailureRecord<'a>>,
}

/// One swept worker count: the per-strategy stats plus the comparison.
#[derive(Debug, Serialize)]
struct SweepRecord<'a> {
    worker_count: usize,
    strategies: Vec<StrategyRecord<'a>>,
    aborted_strategies: Vec<String>,
    comparison: &'a Option<Comparison>,
}

/// The machine-readable performance record written next to the output
/// images. A thin wrapper around the core's `RunStats` and comparisons,
/// keyed by worker count.
#[derive(Debug, Serialize)]
struct PerformanceRecord<'a> {
    generated_at_unix: u64,
    image_count: usize,
    runs: Vec<SweepRecord<'a>>,
}

fn sweep_record(entry: &SweepEntry) -> SweepRecord<'_> {
    let report = &entry.report;
    SweepRecord {
        worker_count: entry.worker_count,
        strategies: report
            .runs
            .iter()
            .map(|run| StrategyRecord {
                stats: &run.stats,
                failures: run
                    .results
                    .iter()
                    .filter_map(|result| {
                        result.error_message().map(|error| FailureRecord {
                            source_path: &result.source_path,
                            error,
                        })
                    })
                    .collect(),
            })
            .collect(),
        aborted_strategies: report
            .failed_runs
            .iter()
            .map(|(name, _)| name.clone())
            .collect(),
        comparison: &report.comparison,
    }
}

pub fn write_json(
    path: &Path,
    entries: &[SweepEntry],
    config: &BenchConfig,
) -> Result<(), ReportError> {
    let record = PerformanceRecord {
        generated_at_unix: SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
        image_count: config.image_list.len(),
        runs: entries.iter().map(sweep_record).collect(),
    };

    std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

/// Human-readable sweep summary, modeled on the per-strategy console report
/// of the original experiment driver.
pub fn print_summary(entries: &[SweepEntry], config: &BenchConfig) {
    for entry in entries {
        if entries.len() > 1 {
            println!("{}", "=".repeat(50));
            println!("worker count: {}", entry.worker_count);
            println!("{}", "=".repeat(50));
        }
        print_entry(entry, config);
    }
}

fn print_entry(entry: &SweepEntry, config: &BenchConfig) {
    let report = &entry.report;
    for run in &report.runs {
        let stats = &run.stats;
        println!("=== {} ===", stats.strategy_name);
        println!("workers:                 {}", entry.worker_count);
        println!("images processed:        {}", config.image_list.len());
        println!("wall-clock time:         {:.2}s", stats.total_wall_seconds);
        println!(
            "processing time (sum):   {:.2}s",
            stats.processing_seconds_total()
        );
        println!(
            "average time per image:  {:.2}s",
            stats.average_task_seconds()
        );
        println!(
            "outcome:                 {} ok, {} failed",
            stats.success_count, stats.failure_count
        );

        for result in &run.results {
            if let Some(error) = result.error_message() {
                println!("  FAILED {}: {}", result.source_path.display(), error);
            }
        }
        println!();
    }

    for (name, pool_error) in &report.failed_runs {
        println!("=== {} ===", name);
        println!("run aborted: {}", pool_error);
        println!();
    }

    if let Some(comparison) = &report.comparison {
        println!(
            "{} vs {}: speedup {:.2}x",
            comparison.contender, comparison.baseline, comparison.speedup
        );
    }
}
