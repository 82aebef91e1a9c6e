//! Dark-lane detection and morphology for wide-field astrophotography.
//!
//! Finds the dark, elongated structures threaded through bright diffuse light
//! (dust lanes across the Milky Way, for instance) and characterises them:
//!
//! * multi-scale background suppression ([`pipeline::preprocess`])
//! * a fused threshold ladder with morphological cleanup ([`pipeline::mask_fusion`])
//! * distance-transform seeds and watershed regions ([`pipeline::seeds`], [`pipeline::segment`])
//! * per-region ellipse statistics, skeleton and box-counting fractal dimension
//!   ([`pipeline::metrics`], [`fractal`])
//!
//! Every stage is a deterministic, single-threaded function of its inputs;
//! batch callers are free to run independent images in parallel.

pub mod config;
pub mod error;
pub mod fractal;
pub mod image_proc;
pub mod image_size;
pub mod io;
pub mod pipeline;

pub use config::{BoxCountSchedule, DarkLaneConfig};
pub use error::{DarkLaneError, Result};
pub use fractal::{box_count_mask, box_count_points, FractalCurve, FractalEstimate};
pub use image_proc::{
    DistanceTransform, ExactEuclideanDistance, PriorityFloodWatershed, RegionRecord, Watershed,
};
pub use image_size::ImageSize;
pub use pipeline::{DarkLaneDetector, DarkLaneResult, ResultMetrics};
