//! Marker-controlled watershed flooding.
//!
//! Floods a relief surface from labelled markers in order of increasing
//! relief; each pixel joins the first flood that reaches it, so region
//! boundaries fall where two floods meet.

use ndarray::{Array2, ArrayView2};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::components::NEIGHBORS_8;
use crate::error::{ensure_same_shape, Result};

/// Capability: watershed of `relief` seeded by `markers`, confined to `mask`.
///
/// Implementations must return 0 for every pixel outside `mask` and must
/// reject rasters whose shapes disagree.
pub trait Watershed {
    fn flood(
        &self,
        relief: ArrayView2<f64>,
        markers: ArrayView2<u32>,
        mask: ArrayView2<bool>,
    ) -> Result<Array2<u32>>;
}

/// A queued pixel, ordered so that `BinaryHeap` pops the lowest relief first
/// and, among equal relief, the pixel queued earliest.
#[derive(Debug, Clone, Copy)]
struct FloodCell {
    relief: f64,
    age: u64,
    row: usize,
    col: usize,
}

impl PartialEq for FloodCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloodCell {}

impl PartialOrd for FloodCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloodCell {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .relief
            .total_cmp(&self.relief)
            .then_with(|| other.age.cmp(&self.age))
    }
}

/// Priority-queue flood over 8-connected neighbours.
///
/// Marker pixels lying outside the mask are discarded. Mask pixels not
/// reachable from any marker keep label 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityFloodWatershed;

impl Watershed for PriorityFloodWatershed {
    fn flood(
        &self,
        relief: ArrayView2<f64>,
        markers: ArrayView2<u32>,
        mask: ArrayView2<bool>,
    ) -> Result<Array2<u32>> {
        ensure_same_shape(relief.dim(), markers.dim())?;
        ensure_same_shape(relief.dim(), mask.dim())?;

        let (rows, cols) = relief.dim();
        let mut labels = Array2::<u32>::zeros((rows, cols));
        let mut heap = BinaryHeap::new();
        let mut age = 0u64;

        for ((row, col), &marker) in markers.indexed_iter() {
            if marker == 0 || !mask[[row, col]] {
                continue;
            }
            labels[[row, col]] = marker;
            heap.push(FloodCell {
                relief: relief[[row, col]],
                age,
                row,
                col,
            });
            age += 1;
        }

        while let Some(cell) = heap.pop() {
            let label = labels[[cell.row, cell.col]];
            for &(dr, dc) in &NEIGHBORS_8 {
                let nr = cell.row as isize + dr;
                let nc = cell.col as isize + dc;
                if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                    continue;
                }
                let (nr, nc) = (nr as usize, nc as usize);
                if !mask[[nr, nc]] || labels[[nr, nc]] != 0 {
                    continue;
                }
                labels[[nr, nc]] = label;
                heap.push(FloodCell {
                    relief: relief[[nr, nc]],
                    age,
                    row: nr,
                    col: nc,
                });
                age += 1;
            }
        }

        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DarkLaneError;

    #[test]
    fn test_two_basins_split_at_ridge() {
        // Relief with minima at columns 2 and 12 and a ridge at column 7
        let relief = Array2::from_shape_fn((5, 15), |(_, c)| {
            let a = (c as f64 - 2.0).abs();
            let b = (c as f64 - 12.0).abs();
            a.min(b)
        });
        let mut markers = Array2::zeros((5, 15));
        markers[[2, 2]] = 1;
        markers[[2, 12]] = 2;
        let mask = Array2::from_elem((5, 15), true);

        let labels = PriorityFloodWatershed
            .flood(relief.view(), markers.view(), mask.view())
            .unwrap();

        for r in 0..5 {
            assert_eq!(labels[[r, 0]], 1);
            assert_eq!(labels[[r, 5]], 1);
            assert_eq!(labels[[r, 9]], 2);
            assert_eq!(labels[[r, 14]], 2);
        }
    }

    #[test]
    fn test_mask_bounds_flood() {
        let relief = Array2::zeros((6, 6));
        let mut markers = Array2::zeros((6, 6));
        markers[[1, 1]] = 1;
        markers[[5, 5]] = 2; // outside the mask, dropped
        let mask = Array2::from_shape_fn((6, 6), |(r, c)| r < 3 && c < 3);

        let labels = PriorityFloodWatershed
            .flood(relief.view(), markers.view(), mask.view())
            .unwrap();

        for ((r, c), &label) in labels.indexed_iter() {
            if mask[[r, c]] {
                assert_eq!(label, 1);
            } else {
                assert_eq!(label, 0);
            }
        }
    }

    #[test]
    fn test_unseeded_component_stays_background() {
        let relief = Array2::zeros((3, 7));
        let mut markers = Array2::zeros((3, 7));
        markers[[1, 0]] = 1;
        let mask = Array2::from_shape_fn((3, 7), |(_, c)| c != 3);

        let labels = PriorityFloodWatershed
            .flood(relief.view(), markers.view(), mask.view())
            .unwrap();

        assert_eq!(labels[[1, 2]], 1);
        assert_eq!(labels[[1, 5]], 0);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let relief = Array2::zeros((4, 4));
        let markers = Array2::zeros((4, 5));
        let mask = Array2::from_elem((4, 4), true);
        assert!(matches!(
            PriorityFloodWatershed.flood(relief.view(), markers.view(), mask.view()),
            Err(DarkLaneError::InvalidShape { .. })
        ));
    }
}
