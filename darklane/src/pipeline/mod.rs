//! The dark-lane detection pipeline.
//!
//! Stages run strictly in order, each consuming the previous stage's output:
//!
//! 1. [`preprocess::enhance`]: invert and flatten the background
//! 2. [`mask_fusion::fuse_masks`]: threshold ladder union
//! 3. [`seeds::select_seeds`]: farthest-first seeds on the distance field
//! 4. [`segment::segment`]: watershed from those seeds inside the mask
//! 5. [`metrics::collect_metrics`]: region shapes, skeleton, fractal dims
//!
//! [`DarkLaneDetector`] wires them together. The distance transform and the
//! watershed are pluggable through [`DistanceTransform`] and [`Watershed`].

pub mod mask_fusion;
pub mod metrics;
pub mod preprocess;
pub mod seeds;
pub mod segment;

use log::{debug, info, warn};
use ndarray::{Array2, ArrayView2, ArrayViewD, Ix2};
use num_traits::ToPrimitive;

use crate::config::{BoxCountSchedule, DarkLaneConfig};
use crate::error::{DarkLaneError, Result};
use crate::image_proc::{
    DistanceTransform, ExactEuclideanDistance, PriorityFloodWatershed, RegionRecord, Watershed,
};

pub use metrics::ResultMetrics;

/// Everything produced for one raster.
#[derive(Debug, Clone)]
pub struct DarkLaneResult {
    /// Union of the cleaned threshold masks
    pub combined_mask: Array2<bool>,
    /// Watershed regions; 0 is background
    pub labels: Array2<u32>,
    /// One-pixel-wide thinning of `combined_mask`
    pub skeleton: Array2<bool>,
    /// Accepted seeds as `(row, col)`, deepest first
    pub seeds: Vec<(usize, usize)>,
    pub regions: Vec<RegionRecord>,
    pub metrics: ResultMetrics,
}

/// Configured dark-lane detector.
///
/// Construction validates the configuration, so a detector that exists can
/// only fail on bad input rasters.
///
/// # Example
/// ```
/// use darklane::{DarkLaneConfig, DarkLaneDetector};
/// use ndarray::Array2;
///
/// let detector = DarkLaneDetector::new(DarkLaneConfig::default()).unwrap();
/// let flat = Array2::<u8>::from_elem((64, 64), 200);
/// let result = detector.detect(flat.view()).unwrap();
/// assert_eq!(result.metrics.num_dark_components, 0);
/// ```
#[derive(Debug, Clone)]
pub struct DarkLaneDetector<D = ExactEuclideanDistance, W = PriorityFloodWatershed> {
    config: DarkLaneConfig,
    schedule: BoxCountSchedule,
    distance: D,
    watershed: W,
}

impl DarkLaneDetector {
    /// Detector with the built-in distance transform and watershed.
    pub fn new(config: DarkLaneConfig) -> Result<Self> {
        Self::with_backends(config, ExactEuclideanDistance, PriorityFloodWatershed)
    }
}

impl<D: DistanceTransform, W: Watershed> DarkLaneDetector<D, W> {
    pub fn with_backends(config: DarkLaneConfig, distance: D, watershed: W) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            schedule: BoxCountSchedule::default(),
            distance,
            watershed,
        })
    }

    /// Replace the default box-count schedule.
    pub fn with_box_count_schedule(mut self, schedule: BoxCountSchedule) -> Result<Self> {
        schedule.validate()?;
        self.schedule = schedule;
        Ok(self)
    }

    pub fn config(&self) -> &DarkLaneConfig {
        &self.config
    }

    pub fn box_count_schedule(&self) -> &BoxCountSchedule {
        &self.schedule
    }

    /// Run the pipeline on any numeric raster.
    ///
    /// Samples that cannot be represented as `f64` are treated as NaN and
    /// rejected.
    pub fn detect<T: ToPrimitive>(&self, raster: ArrayView2<T>) -> Result<DarkLaneResult> {
        let samples = raster.map(|v| v.to_f64().unwrap_or(f64::NAN));
        self.detect_f64(samples.view())
    }

    /// Run the pipeline on a raster of unknown dimensionality.
    ///
    /// # Errors
    /// [`DarkLaneError::NotTwoDimensional`] unless `raster` is 2-D.
    pub fn detect_dyn(&self, raster: ArrayViewD<f64>) -> Result<DarkLaneResult> {
        let ndim = raster.ndim();
        let raster = raster
            .into_dimensionality::<Ix2>()
            .map_err(|_| DarkLaneError::NotTwoDimensional(ndim))?;
        self.detect_f64(raster)
    }

    /// Run the pipeline on an `f64` raster.
    ///
    /// # Errors
    /// * [`DarkLaneError::EmptyRaster`] if either axis has length 0
    /// * [`DarkLaneError::NonFiniteInput`] if any sample is NaN
    pub fn detect_f64(&self, raster: ArrayView2<f64>) -> Result<DarkLaneResult> {
        let shape = raster.dim();
        if raster.is_empty() {
            return Err(DarkLaneError::EmptyRaster(shape));
        }
        if let Some(((row, col), _)) = raster.indexed_iter().find(|(_, v)| v.is_nan()) {
            return Err(DarkLaneError::NonFiniteInput(format!(
                "NaN sample at ({row}, {col})"
            )));
        }

        let enhanced = preprocess::enhance(raster, &self.config);
        let combined_mask = mask_fusion::fuse_masks(enhanced.view(), &self.config)?;
        let dark_pixels = combined_mask.iter().filter(|&&v| v).count();
        if dark_pixels == 0 {
            warn!("combined mask is empty for {}x{} raster", shape.1, shape.0);
        }

        let distance = self.distance.transform(combined_mask.view());
        let seeds = seeds::select_seeds(distance.view(), &self.config);
        let seed_mask = seeds::seed_raster(shape, &seeds);
        debug!("{dark_pixels} dark pixels, {} seeds", seeds.len());

        let segmentation = segment::segment(
            &self.watershed,
            distance.view(),
            seed_mask.view(),
            combined_mask.view(),
        )?;

        let measurements = metrics::collect_metrics(
            combined_mask.view(),
            segmentation.labels.view(),
            seeds.len(),
            &self.config,
            &self.schedule,
        )?;

        info!(
            "dark lanes: {:.2}% of {}x{} pixels, {} components, {} seeds",
            100.0 * measurements.metrics.dark_area_fraction,
            shape.1,
            shape.0,
            measurements.metrics.num_dark_components,
            seeds.len()
        );

        Ok(DarkLaneResult {
            combined_mask,
            labels: segmentation.labels,
            skeleton: measurements.skeleton,
            seeds,
            regions: measurements.regions,
            metrics: measurements.metrics,
        })
    }
}
