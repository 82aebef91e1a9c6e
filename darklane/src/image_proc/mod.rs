//! Raster primitives used by the dark-lane pipeline
//!
//! Everything here is a pure function over `ndarray` grids indexed `[row, col]`:
//! normalization, Gaussian smoothing, binary morphology, connected components,
//! distance transforms, watershed flooding, thinning and region moments.

pub mod components;
pub mod distance;
pub mod gaussian;
pub mod morphology;
pub mod normalize;
pub mod region;
pub mod skeleton;
pub mod watershed;

// Re-export key functionality for easier access
pub use components::{apply_threshold, connected_components, label_sizes, remove_small_objects};
pub use distance::{DistanceTransform, ExactEuclideanDistance};
pub use gaussian::{gaussian_filter, gaussian_kernel_1d};
pub use morphology::{closing, dilate, erode, opening, StructuringElement};
pub use normalize::to_unit;
pub use region::{region_properties, RegionRecord};
pub use skeleton::skeletonize;
pub use watershed::{PriorityFloodWatershed, Watershed};
