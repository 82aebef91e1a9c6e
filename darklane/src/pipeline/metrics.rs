//! Shape, skeleton and fractal measurements of a finished segmentation.

use log::debug;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::config::{BoxCountSchedule, DarkLaneConfig};
use crate::error::{ensure_same_shape, Result};
use crate::fractal::{box_count_mask, FractalCurve};
use crate::image_proc::{region_properties, skeletonize, RegionRecord};
use crate::image_size::ImageSize;

/// Flat summary document written as `improved_dark_detection.json`.
///
/// Optional fields serialize as `null` when there is nothing to measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetrics {
    pub image_size: ImageSize,
    /// Mean of the combined mask over all pixels
    pub dark_area_fraction: f64,
    pub num_dark_components: usize,
    /// Pixel counts per region, written as JSON integers
    pub component_areas: Vec<usize>,
    pub mean_eccentricity: Option<f64>,
    pub mean_elongation: Option<f64>,
    pub watershed_seeds: usize,
    pub fractal_dimension_dark_mask: Option<f64>,
    pub fractal_dimension_skeleton: Option<f64>,
    pub fractal_boxcount_mask: FractalCurve,
    pub fractal_boxcount_skeleton: FractalCurve,
    pub config: DarkLaneConfig,
}

/// Everything [`collect_metrics`] derives from the mask and label field.
#[derive(Debug, Clone)]
pub struct Measurements {
    pub metrics: ResultMetrics,
    pub regions: Vec<RegionRecord>,
    pub skeleton: Array2<bool>,
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = values.len();
    (n > 0).then(|| values.sum::<f64>() / n as f64)
}

/// Measure regions, skeletonize the mask and box-count both.
pub fn collect_metrics(
    mask: ArrayView2<bool>,
    labels: ArrayView2<u32>,
    seed_count: usize,
    config: &DarkLaneConfig,
    schedule: &BoxCountSchedule,
) -> Result<Measurements> {
    ensure_same_shape(mask.dim(), labels.dim())?;

    let regions = region_properties(labels);
    let skeleton = skeletonize(mask);
    let mask_fractal = box_count_mask(mask, schedule)?;
    let skeleton_fractal = box_count_mask(skeleton.view(), schedule)?;

    let dark_pixels = mask.iter().filter(|&&v| v).count();
    let dark_area_fraction = if mask.is_empty() {
        0.0
    } else {
        dark_pixels as f64 / mask.len() as f64
    };

    debug!(
        "{} regions, {} skeleton pixels, fractal dims {:?} / {:?}",
        regions.len(),
        skeleton.iter().filter(|&&v| v).count(),
        mask_fractal.dimension,
        skeleton_fractal.dimension
    );

    let metrics = ResultMetrics {
        image_size: ImageSize::from_shape(mask.dim()),
        dark_area_fraction,
        num_dark_components: regions.len(),
        component_areas: regions.iter().map(|r| r.area).collect(),
        mean_eccentricity: mean(regions.iter().map(|r| r.eccentricity)),
        mean_elongation: mean(regions.iter().map(|r| r.elongation)),
        watershed_seeds: seed_count,
        fractal_dimension_dark_mask: mask_fractal.dimension,
        fractal_dimension_skeleton: skeleton_fractal.dimension,
        fractal_boxcount_mask: mask_fractal.curve,
        fractal_boxcount_skeleton: skeleton_fractal.curve,
        config: config.clone(),
    };

    Ok(Measurements {
        metrics,
        regions,
        skeleton,
    })
}
