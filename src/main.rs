use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::error;

mod engine;
mod pool;
mod processing;
mod report;
mod results;
#[cfg(test)]
mod tests_common;

use engine::BenchConfig;
use processing::filter::FilterKind;

#[derive(Parser, Debug)]
#[command(about = "Benchmarks two worker-pool strategies over a fixed image filter pipeline")]
struct Args {
    /// Directory with the source images
    #[clap(short, long)]
    input: String,

    /// Results directory (defaults to FILTERBENCH_RESULTS or "results")
    #[clap(short, long)]
    output: Option<String>,

    /// Worker pool sizes to benchmark; a comma-separated list (e.g. 1,2,4,8)
    /// sweeps the whole benchmark once per count. Defaults to the CPU count.
    #[clap(short, long, value_delimiter = ',')]
    workers: Vec<usize>,

    /// Filters to apply, defaults to all five
    #[clap(short, long, value_enum, value_delimiter = ',')]
    filters: Vec<FilterKind>,

    /// Skip writing the JSON performance record
    #[clap(long, default_value_t = false)]
    no_json: bool,
}

fn main() -> ExitCode {
    // init .env
    dotenvy::dotenv().ok();
    dotenvy::from_filename(".env.local").ok();

    // init logger
    env_logger::init();

    // init cli
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(reason) => {
            error!("{}", reason);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let results_root = args
        .output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&*results::RESULTS_DIR));
    let layout = results::setup_results_dirs(&results_root)?;

    let image_list = processing::file_loader::list_images(Path::new(&args.input))?;
    let filters = if args.filters.is_empty() {
        FilterKind::ALL.to_vec()
    } else {
        args.filters
    };

    let worker_counts = if args.workers.is_empty() {
        vec![pool::default_worker_count()]
    } else {
        args.workers
    };

    let config = BenchConfig {
        worker_count: worker_counts[0],
        filters,
        image_list,
        output_dir: layout.output_images.clone(),
    };

    let entries = engine::run_sweep(&config, &worker_counts);

    report::print_summary(&entries, &config);
    if !args.no_json {
        let json_path = layout.performance_data.join("benchmark.json");
        report::write_json(&json_path, &entries, &config)?;
    }

    // individual task failures are reported, not fatal; an aborted strategy
    // run is what makes the whole invocation fail
    let aborted: usize = entries
        .iter()
        .map(|entry| entry.report.failed_runs.len())
        .sum();
    if aborted == 0 {
        Ok(())
    } else {
        Err(format!("{} strategy run(s) could not start", aborted).into())
    }
}
