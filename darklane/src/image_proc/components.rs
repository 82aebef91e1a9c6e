//! Thresholding and connected-component utilities for boolean rasters.

use ndarray::{Array2, ArrayView2};

/// 8-connectivity neighbouring offsets
#[rustfmt::skip]
pub(crate) const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Binary mask of pixels strictly above `threshold`.
pub fn apply_threshold(image: ArrayView2<f64>, threshold: f64) -> Array2<bool> {
    image.mapv(|v| v > threshold)
}

/// Label 8-connected components of a binary mask.
///
/// Labels start at 1 and are assigned in raster-scan order of each
/// component's first pixel; background stays 0.
///
/// # Returns
/// The label raster and the number of components found
pub fn connected_components(mask: ArrayView2<bool>) -> (Array2<u32>, u32) {
    let (rows, cols) = mask.dim();
    let mut labels = Array2::zeros((rows, cols));
    let mut label_counter = 0;
    let mut stack = Vec::new();

    for i in 0..rows {
        for j in 0..cols {
            if !mask[[i, j]] || labels[[i, j]] != 0 {
                continue;
            }
            label_counter += 1;
            labels[[i, j]] = label_counter;
            stack.push((i, j));

            while let Some((y, x)) = stack.pop() {
                for &(dy, dx) in &NEIGHBORS_8 {
                    let ny = y as isize + dy;
                    let nx = x as isize + dx;
                    if ny < 0 || ny >= rows as isize || nx < 0 || nx >= cols as isize {
                        continue;
                    }
                    let (ny, nx) = (ny as usize, nx as usize);
                    if mask[[ny, nx]] && labels[[ny, nx]] == 0 {
                        labels[[ny, nx]] = label_counter;
                        stack.push((ny, nx));
                    }
                }
            }
        }
    }

    (labels, label_counter)
}

/// Pixel count per label; index 0 holds the background count.
pub fn label_sizes(labels: ArrayView2<u32>, num_labels: u32) -> Vec<usize> {
    let mut sizes = vec![0usize; num_labels as usize + 1];
    for &label in labels.iter() {
        sizes[label as usize] += 1;
    }
    sizes
}

/// Drop 8-connected components with fewer than `min_size` pixels.
pub fn remove_small_objects(mask: ArrayView2<bool>, min_size: usize) -> Array2<bool> {
    let (labels, num_labels) = connected_components(mask);
    let sizes = label_sizes(labels.view(), num_labels);
    labels.mapv(|label| label != 0 && sizes[label as usize] >= min_size)
}
