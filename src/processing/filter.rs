use clap::ValueEnum;
use image::{imageops, DynamicImage, GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};

/// Sigma of the gaussian smoothing kernel.
pub const BLUR_SIGMA: f32 = 1.0;
/// Additive per-channel brightness delta, saturating at 255.
pub const BRIGHTEN_DELTA: i32 = 40;
/// Classic 3x3 sharpening convolution kernel.
pub const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// The closed set of filters the benchmark applies. Every variant is a pure,
/// deterministic transform over the decoded source buffer with fixed
/// parameters - there is no per-task filter configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum FilterKind {
    Grayscale,
    GaussianBlur,
    EdgeDetection,
    Sharpen,
    BrightnessAdjust,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Grayscale,
        FilterKind::GaussianBlur,
        FilterKind::EdgeDetection,
        FilterKind::Sharpen,
        FilterKind::BrightnessAdjust,
    ];

    /// Filename suffix of the output artifact, e.g. `<stem>_gray.jpg`.
    pub fn suffix(self) -> &'static str {
        match self {
            FilterKind::Grayscale => "gray",
            FilterKind::GaussianBlur => "blurred",
            FilterKind::EdgeDetection => "edges",
            FilterKind::Sharpen => "sharpened",
            FilterKind::BrightnessAdjust => "brightened",
        }
    }

    /// Applies the transform to the decoded source buffer. Filters never see
    /// another filter's output, only the original decode.
    pub fn apply(self, source: &RgbImage) -> DynamicImage {
        match self {
            FilterKind::Grayscale => DynamicImage::ImageLuma8(imageops::grayscale(source)),
            FilterKind::GaussianBlur => {
                DynamicImage::ImageRgb8(imageops::blur(source, BLUR_SIGMA))
            }
            FilterKind::EdgeDetection => {
                DynamicImage::ImageLuma8(sobel_magnitude(&imageops::grayscale(source)))
            }
            FilterKind::Sharpen => {
                DynamicImage::ImageRgb8(imageops::filter3x3(source, &SHARPEN_KERNEL))
            }
            FilterKind::BrightnessAdjust => {
                DynamicImage::ImageRgb8(imageops::colorops::brighten(source, BRIGHTEN_DELTA))
            }
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterKind::Grayscale => write!(f, "grayscale"),
            FilterKind::GaussianBlur => write!(f, "gaussian-blur"),
            FilterKind::EdgeDetection => write!(f, "edge-detection"),
            FilterKind::Sharpen => write!(f, "sharpen"),
            FilterKind::BrightnessAdjust => write!(f, "brightness-adjust"),
        }
    }
}

/// Sobel gradient magnitude over the luma plane, clamped to u8. Border pixels
/// sample the clamped neighborhood.
fn sobel_magnitude(luma: &GrayImage) -> GrayImage {
    let (width, height) = luma.dimensions();
    let mut out = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let sample = |dx: i64, dy: i64| -> f32 {
                let sx = (x as i64 + dx).clamp(0, width as i64 - 1) as u32;
                let sy = (y as i64 + dy).clamp(0, height as i64 - 1) as u32;
                luma.get_pixel(sx, sy).0[0] as f32
            };

            let gx = sample(1, -1) + 2.0 * sample(1, 0) + sample(1, 1)
                - sample(-1, -1)
                - 2.0 * sample(-1, 0)
                - sample(-1, 1);
            let gy = sample(-1, 1) + 2.0 * sample(0, 1) + sample(1, 1)
                - sample(-1, -1)
                - 2.0 * sample(0, -1)
                - sample(1, -1);

            let magnitude = (gx * gx + gy * gy).sqrt().min(255.0);
            out.put_pixel(x, y, Luma([magnitude as u8]));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_common::noise_image;

    #[test]
    fn suffixes_are_distinct() {
        let mut suffixes: Vec<_> = FilterKind::ALL.iter().map(|f| f.suffix()).collect();
        suffixes.sort();
        suffixes.dedup();
        assert_eq!(suffixes.len(), FilterKind::ALL.len());
    }

    #[test]
    fn filters_are_deterministic() {
        let source = noise_image(48, 32, 7);
        for kind in FilterKind::ALL {
            let first = kind.apply(&source);
            let second = kind.apply(&source);
            assert_eq!(
                first.as_bytes(),
                second.as_bytes(),
                "{} produced different pixels on identical input",
                kind
            );
        }
    }

    #[test]
    fn grayscale_outputs_single_channel() {
        let source = noise_image(16, 16, 1);
        let gray = FilterKind::Grayscale.apply(&source);
        assert!(matches!(gray, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn brighten_never_darkens() {
        let source = noise_image(16, 16, 2);
        let brightened = match FilterKind::BrightnessAdjust.apply(&source) {
            DynamicImage::ImageRgb8(img) => img,
            other => panic!("unexpected output format: {:?}", other.color()),
        };

        for (src, out) in source.pixels().zip(brightened.pixels()) {
            for channel in 0..3 {
                assert!(out.0[channel] >= src.0[channel]);
            }
        }
    }

    #[test]
    fn sobel_flat_image_has_no_edges() {
        let flat = GrayImage::from_pixel(24, 24, Luma([128]));
        let edges = sobel_magnitude(&flat);
        assert!(edges.pixels().all(|p| p.0[0] == 0));
    }
}
