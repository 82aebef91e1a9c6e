//! Linear rescaling of rasters onto the unit interval.

use ndarray::{Array2, ArrayView2};

/// Rescale `image` onto [0, 1] via `(x - min) / (max - min)`.
///
/// A zero or non-finite range (flat image, infinite samples, empty raster)
/// yields an all-zero raster of the same shape.
pub fn to_unit(image: ArrayView2<f64>) -> Array2<f64> {
    let min_val = image.iter().copied().fold(f64::INFINITY, f64::min);
    let max_val = image.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max_val - min_val;

    if !span.is_finite() || span == 0.0 {
        return Array2::zeros(image.raw_dim());
    }

    image.mapv(|x| (x - min_val) / span)
}
