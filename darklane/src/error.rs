//! Error types shared by every stage of the dark-lane pipeline.

use thiserror::Error;

/// Errors raised by dark-lane detection.
///
/// Degenerate outcomes such as an empty combined mask are not errors; they
/// surface as `None` metrics and zero-filled curves instead.
#[derive(Debug, Error)]
pub enum DarkLaneError {
    /// Two rasters passed together disagree on (height, width).
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    InvalidShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Input has a zero-length axis.
    #[error("Raster has no pixels (shape {0:?})")]
    EmptyRaster((usize, usize)),

    /// Input is not a 2-D raster.
    #[error("Expected a 2-D raster, got {0} dimensions")]
    NotTwoDimensional(usize),

    /// Configuration rejected before any pixel was touched.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// NaN raster sample or non-finite point coordinate.
    #[error("Non-finite input: {0}")]
    NonFiniteInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode/encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Standard Result type for dark-lane operations.
pub type Result<T> = std::result::Result<T, DarkLaneError>;

/// Fail with [`DarkLaneError::InvalidShape`] unless both shapes agree.
pub(crate) fn ensure_same_shape(expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected != found {
        return Err(DarkLaneError::InvalidShape { expected, found });
    }
    Ok(())
}
