//! Separable Gaussian smoothing with half-sample symmetric borders.
//!
//! The kernel is truncated at four standard deviations. Samples beyond the
//! raster edge are mirrored (`d c b a | a b c d`) and the mirroring repeats
//! periodically, so a kernel wider than the raster is still well defined.
//! This is what lets the 100 px background scale run on small test frames.

use ndarray::{Array2, ArrayView2, Axis};

/// Standard deviations covered by the kernel on each side
const TRUNCATE: f64 = 4.0;

/// Normalized 1-D Gaussian weights of length `2 * radius + 1`.
pub fn gaussian_kernel_1d(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as usize;
    let two_sigma2 = 2.0 * sigma * sigma;
    let r = radius as isize;
    let mut weights: Vec<f64> = (-r..=r)
        .map(|x| (-((x * x) as f64) / two_sigma2).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.iter_mut().for_each(|w| *w /= total);
    weights
}

/// Map a possibly out-of-range index onto `0..n` by symmetric reflection.
fn reflect_index(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Correlate every lane of `data` along `axis` with `kernel`.
fn smooth_axis(data: &Array2<f64>, kernel: &[f64], axis: Axis) -> Array2<f64> {
    let n = data.len_of(axis);
    let radius = kernel.len() / 2;
    let source_index: Vec<usize> = (0..n + 2 * radius)
        .map(|i| reflect_index(i as isize - radius as isize, n))
        .collect();

    let mut output = Array2::zeros(data.raw_dim());
    let mut line = vec![0.0; n];
    for (lane_in, mut lane_out) in data
        .lanes(axis)
        .into_iter()
        .zip(output.lanes_mut(axis))
    {
        line.iter_mut()
            .zip(lane_in.iter())
            .for_each(|(dst, &src)| *dst = src);

        for (i, out) in lane_out.iter_mut().enumerate() {
            *out = kernel
                .iter()
                .zip(&source_index[i..i + kernel.len()])
                .map(|(w, &j)| w * line[j])
                .sum();
        }
    }
    output
}

/// Gaussian-smooth `image` with standard deviation `sigma` (pixels).
///
/// A non-positive sigma returns an unchanged copy.
pub fn gaussian_filter(image: ArrayView2<f64>, sigma: f64) -> Array2<f64> {
    if sigma <= 0.0 || image.is_empty() {
        return image.to_owned();
    }
    let kernel = gaussian_kernel_1d(sigma);
    let smoothed_rows = smooth_axis(&image.to_owned(), &kernel, Axis(0));
    smooth_axis(&smoothed_rows, &kernel, Axis(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let kernel = gaussian_kernel_1d(2.0);
        assert_eq!(kernel.len(), 17);
        assert_relative_eq!(kernel.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        for i in 0..kernel.len() / 2 {
            assert_relative_eq!(kernel[i], kernel[kernel.len() - 1 - i]);
        }
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(9, 4), 1);
        assert_eq!(reflect_index(-9, 4), 0);
    }

    #[test]
    fn test_constant_image_unchanged() {
        let image = Array2::from_elem((12, 9), 0.6);
        let smoothed = gaussian_filter(image.view(), 3.0);
        for &v in smoothed.iter() {
            assert_relative_eq!(v, 0.6, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_wide_kernel_on_small_raster() {
        let mut image = Array2::zeros((8, 8));
        image[[4, 4]] = 64.0;
        let smoothed = gaussian_filter(image.view(), 100.0);
        // Reflection conserves mass, so a huge kernel spreads it evenly.
        assert_relative_eq!(smoothed.sum(), 64.0, epsilon = 1e-9);
        for &v in smoothed.iter() {
            assert_relative_eq!(v, 1.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_smoothing_preserves_mass_and_spreads_peak() {
        let mut image = Array2::zeros((31, 31));
        image[[15, 15]] = 1.0;
        let smoothed = gaussian_filter(image.view(), 1.5);
        assert_relative_eq!(smoothed.sum(), 1.0, epsilon = 1e-9);
        assert!(smoothed[[15, 15]] < 1.0);
        assert!(smoothed[[15, 16]] > 0.0);
        assert_relative_eq!(smoothed[[14, 15]], smoothed[[16, 15]], epsilon = 1e-15);
    }
}
