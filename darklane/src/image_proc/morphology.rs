//! Binary morphology over boolean rasters.
//!
//! Footprint samples that fall outside the raster are ignored. For a
//! symmetric flat footprint this gives the same answer as mirrored borders:
//! a blob touching the edge is neither eroded nor grown by the edge itself.

use ndarray::{Array2, ArrayView2};

use crate::error::{DarkLaneError, Result};

/// Flat structuring element described by its (dr, dc) offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuringElement {
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// Disk of the given radius: every offset with `dr² + dc² <= radius²`.
    pub fn disk(radius: usize) -> Result<Self> {
        if radius == 0 {
            return Err(DarkLaneError::Configuration(
                "structuring element radius must be at least 1".to_string(),
            ));
        }
        let r = radius as isize;
        let r2 = r * r;
        let offsets = (-r..=r)
            .flat_map(|dr| (-r..=r).map(move |dc| (dr, dc)))
            .filter(|(dr, dc)| dr * dr + dc * dc <= r2)
            .collect();
        Ok(Self { offsets })
    }

    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }
}

/// Visit every in-bounds footprint neighbour of (row, col); stop early when
/// `visit` returns true and report whether it did.
fn any_neighbor(
    mask: &ArrayView2<bool>,
    element: &StructuringElement,
    row: usize,
    col: usize,
    mut visit: impl FnMut(bool) -> bool,
) -> bool {
    let (rows, cols) = mask.dim();
    element.offsets().iter().any(|&(dr, dc)| {
        let nr = row as isize + dr;
        let nc = col as isize + dc;
        if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
            return false;
        }
        visit(mask[[nr as usize, nc as usize]])
    })
}

/// A pixel survives erosion only if its whole in-bounds footprint is set.
pub fn erode(mask: ArrayView2<bool>, element: &StructuringElement) -> Array2<bool> {
    Array2::from_shape_fn(mask.dim(), |(row, col)| {
        mask[[row, col]] && !any_neighbor(&mask, element, row, col, |v| !v)
    })
}

/// A pixel is set after dilation if any in-bounds footprint neighbour is set.
pub fn dilate(mask: ArrayView2<bool>, element: &StructuringElement) -> Array2<bool> {
    Array2::from_shape_fn(mask.dim(), |(row, col)| {
        mask[[row, col]] || any_neighbor(&mask, element, row, col, |v| v)
    })
}

/// Erosion then dilation: removes specks and thin spurs narrower than the disk.
pub fn opening(mask: ArrayView2<bool>, element: &StructuringElement) -> Array2<bool> {
    let eroded = erode(mask, element);
    dilate(eroded.view(), element)
}

/// Dilation then erosion: fills pinholes and gaps narrower than the disk.
pub fn closing(mask: ArrayView2<bool>, element: &StructuringElement) -> Array2<bool> {
    let dilated = dilate(mask, element);
    erode(dilated.view(), element)
}
