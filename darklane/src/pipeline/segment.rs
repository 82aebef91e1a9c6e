//! Seeded watershed segmentation of the combined mask.

use ndarray::{Array2, ArrayView2};

use crate::error::{ensure_same_shape, Result};
use crate::image_proc::{connected_components, Watershed};

/// Label field produced by [`segment`].
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// 0 outside the mask, `1..=num_markers` inside
    pub labels: Array2<u32>,
    /// Distinct marker ids after labelling the seed raster
    pub num_markers: u32,
}

/// Flood the negated distance field from the seeds, confined to `mask`.
///
/// Touching seeds are merged into one marker by 8-connected labelling, so
/// `num_markers` can be smaller than the seed count.
pub fn segment<W: Watershed + ?Sized>(
    watershed: &W,
    distance: ArrayView2<f64>,
    seeds: ArrayView2<bool>,
    mask: ArrayView2<bool>,
) -> Result<Segmentation> {
    ensure_same_shape(mask.dim(), distance.dim())?;
    ensure_same_shape(mask.dim(), seeds.dim())?;

    let (markers, num_markers) = connected_components(seeds);
    let relief = distance.mapv(|d| -d);
    let labels = watershed.flood(relief.view(), markers.view(), mask)?;

    Ok(Segmentation {
        labels,
        num_markers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DarkLaneError;
    use crate::image_proc::{DistanceTransform, ExactEuclideanDistance, PriorityFloodWatershed};
    use crate::pipeline::seeds::seed_raster;

    fn two_disks() -> Array2<bool> {
        Array2::from_shape_fn((40, 70), |(r, c)| {
            let d1 = (r as f64 - 20.0).powi(2) + (c as f64 - 20.0).powi(2);
            let d2 = (r as f64 - 20.0).powi(2) + (c as f64 - 40.0).powi(2);
            d1 <= 144.0 || d2 <= 144.0
        })
    }

    #[test]
    fn test_overlapping_disks_split_between_seeds() {
        let mask = two_disks();
        let distance = ExactEuclideanDistance.transform(mask.view());
        let seeds = seed_raster(mask.dim(), &[(20, 20), (20, 40)]);

        let seg = segment(
            &PriorityFloodWatershed,
            distance.view(),
            seeds.view(),
            mask.view(),
        )
        .unwrap();
        assert_eq!(seg.num_markers, 2);
        assert_eq!(seg.labels[[20, 10]], 1);
        assert_eq!(seg.labels[[20, 50]], 2);
        for ((r, c), &on) in mask.indexed_iter() {
            assert_eq!(on, seg.labels[[r, c]] > 0, "pixel ({r}, {c})");
        }
    }

    #[test]
    fn test_adjacent_seeds_share_a_marker() {
        let mask = Array2::from_elem((10, 10), true);
        let distance = Array2::from_elem((10, 10), 1.0);
        let seeds = seed_raster((10, 10), &[(4, 4), (5, 5)]);
        let seg = segment(
            &PriorityFloodWatershed,
            distance.view(),
            seeds.view(),
            mask.view(),
        )
        .unwrap();
        assert_eq!(seg.num_markers, 1);
        assert!(seg.labels.iter().all(|&l| l == 1));
    }

    #[test]
    fn test_mismatched_seed_shape_rejected() {
        let mask = Array2::from_elem((8, 8), true);
        let distance = Array2::zeros((8, 8));
        let seeds = Array2::from_elem((8, 9), false);
        let result = segment(
            &PriorityFloodWatershed,
            distance.view(),
            seeds.view(),
            mask.view(),
        );
        assert!(matches!(result, Err(DarkLaneError::InvalidShape { .. })));
    }
}
