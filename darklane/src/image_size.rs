//! Raster dimensions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of the analysed raster.
///
/// Arrays in this crate are indexed `[row, col]`, so an array's `dim()` is
/// `(height, width)`; use [`ImageSize::from_shape`] rather than `From` when
/// starting from an array shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
}

impl ImageSize {
    pub fn from_width_height(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Build from an ndarray `(rows, cols)` shape.
    pub fn from_shape((height, width): (usize, usize)) -> Self {
        Self { width, height }
    }

    /// ndarray shape `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

impl From<(usize, usize)> for ImageSize {
    /// `(width, height)` tuple
    fn from((width, height): (usize, usize)) -> Self {
        Self::from_width_height(width, height)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
