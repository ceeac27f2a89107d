use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::processing::filter::FilterKind;
use crate::processing::task::ImageTask;

/// Unique scratch directory, removed again on drop.
pub struct TestDir {
    pub root: PathBuf,
}

#[allow(unused)]
impl TestDir {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("filterbench-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn subdir(&self, name: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::create_dir_all(&path).unwrap();
        path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Seeded noise image, so fixtures are reproducible.
#[allow(unused)]
pub fn noise_image(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| {
        Rgb([rng.gen(), rng.gen(), rng.gen()])
    })
}

#[allow(unused)]
pub fn write_sample_images(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("sample_{:02}.jpg", i));
            noise_image(32, 24, i as u64).save(&path).unwrap();
            path
        })
        .collect()
}

#[allow(unused)]
pub fn write_corrupt_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not an image").unwrap();
    path
}

#[allow(unused)]
pub fn make_tasks(sources: &[PathBuf]) -> Vec<ImageTask> {
    sources
        .iter()
        .map(|path| ImageTask::new(path.clone(), FilterKind::ALL.to_vec()))
        .collect()
}
