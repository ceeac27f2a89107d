use std::path::Path;

use image::{DynamicImage, ImageError, RgbImage};
use log::debug;

pub fn load_image(path: &Path) -> Result<RgbImage, ImageError> {
    debug!("loading {}", path.display());
    Ok(image::open(path)?.to_rgb8())
}

pub fn save_image(path: &Path, image: &DynamicImage) -> Result<(), ImageError> {
    debug!("saving {}", path.display());
    image.save(path)?;
    Ok(())
}
