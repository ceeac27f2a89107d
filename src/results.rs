use std::io;
use std::path::{Path, PathBuf};

use log::info;

lazy_static::lazy_static! {
    /// Default results directory, overridable through the environment
    /// (a `.env` file is loaded before this is first read).
    pub static ref RESULTS_DIR: String =
        std::env::var("FILTERBENCH_RESULTS").unwrap_or_else(|_| "results".into());
}

/// On-disk layout of one benchmark run.
pub struct ResultsLayout {
    pub output_images: PathBuf,
    pub performance_data: PathBuf,
}

/// Wipes stale results and recreates the `output_images/` and
/// `performance_data/` subdirectories.
pub fn setup_results_dirs(root: &Path) -> Result<ResultsLayout, io::Error> {
    if root.exists() {
        std::fs::remove_dir_all(root)?;
    }

    let layout = ResultsLayout {
        output_images: root.join("output_images"),
        performance_data: root.join("performance_data"),
    };
    std::fs::create_dir_all(&layout.output_images)?;
    std::fs::create_dir_all(&layout.performance_data)?;

    info!("results directory ready at {}", root.display());
    Ok(layout)
}
