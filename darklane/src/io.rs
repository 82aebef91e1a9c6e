//! File-level entry points: image loading, metrics JSON and mask PNG output.
//!
//! None of this runs inside the pipeline itself; it wraps
//! [`DarkLaneDetector`] for callers working with files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use log::info;
use ndarray::{Array2, ArrayView2};

use crate::error::Result;
use crate::image_proc::{DistanceTransform, Watershed};
use crate::image_size::ImageSize;
use crate::pipeline::{DarkLaneDetector, DarkLaneResult, ResultMetrics};

/// File name of the metrics document written next to each result
pub const METRICS_FILE_NAME: &str = "improved_dark_detection.json";

/// Default file name of the rendered combined mask
pub const MASK_FILE_NAME: &str = "dark_lane_mask.png";

/// Decode an image file of any supported format as 8-bit luma.
///
/// # Returns
/// Samples as `f64` indexed `[row, col]`, and the image size
pub fn load_image_gray(path: &Path) -> Result<(Array2<f64>, ImageSize)> {
    let gray = image::open(path)?.to_luma8();
    let size = ImageSize::from_width_height(gray.width() as usize, gray.height() as usize);
    let samples = Array2::from_shape_fn(size.shape(), |(row, col)| {
        f64::from(gray.get_pixel(col as u32, row as u32)[0])
    });
    Ok((samples, size))
}

/// Render a mask as an 8-bit image, `true` → 255.
///
/// Array indices `[y, x]` map to pixel coordinates `(x, y)`.
pub fn mask_to_gray_image(mask: ArrayView2<bool>) -> GrayImage {
    let (height, width) = mask.dim();
    let mut img = GrayImage::new(width as u32, height as u32);
    for ((y, x), &on) in mask.indexed_iter() {
        img.put_pixel(x as u32, y as u32, Luma([if on { 255 } else { 0 }]));
    }
    img
}

/// Write a mask as a PNG (format chosen from the path extension).
pub fn save_mask_png(mask: ArrayView2<bool>, path: &Path) -> Result<()> {
    mask_to_gray_image(mask).save(path)?;
    Ok(())
}

/// Write pretty-printed metrics to `<dir>/improved_dark_detection.json`,
/// creating `dir` if needed.
pub fn write_metrics_json(metrics: &ResultMetrics, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(METRICS_FILE_NAME);
    fs::write(&path, serde_json::to_string_pretty(metrics)?)?;
    Ok(path)
}

/// Load `path`, run `detector` on it and optionally persist the metrics.
pub fn detect_dark_lanes_from_file<D: DistanceTransform, W: Watershed>(
    path: &Path,
    out_dir: Option<&Path>,
    detector: &DarkLaneDetector<D, W>,
) -> Result<DarkLaneResult> {
    let (raster, size) = load_image_gray(path)?;
    info!("loaded {} ({size})", path.display());

    let result = detector.detect_f64(raster.view())?;

    if let Some(dir) = out_dir {
        let written = write_metrics_json(&result.metrics, dir)?;
        info!("wrote {}", written.display());
    }

    Ok(result)
}
