//! Euclidean distance transform of boolean masks.
//!
//! For every set pixel, the distance to the nearest unset pixel; unset
//! pixels map to 0. The default backend is the exact separable algorithm of
//! Felzenszwalb & Huttenlocher (2012): a 1-D lower envelope of parabolas run
//! down each column, then along each row of the squared column result.

use ndarray::{Array2, ArrayView2, Axis};

/// Stand-in for "no background on this line yet"; kept finite so the
/// parabola intersections stay well defined.
const FAR: f64 = 1e20;

/// Capability: distance transform of a boolean mask.
pub trait DistanceTransform {
    /// Distance of each `true` pixel to the nearest `false` pixel, 0 elsewhere.
    fn transform(&self, mask: ArrayView2<bool>) -> Array2<f64>;
}

/// Exact Euclidean distance transform.
///
/// A mask with no `false` pixel at all maps every pixel to `f64::INFINITY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactEuclideanDistance;

impl DistanceTransform for ExactEuclideanDistance {
    fn transform(&self, mask: ArrayView2<bool>) -> Array2<f64> {
        let mut squared = mask.mapv(|set| if set { FAR } else { 0.0 });
        squared_distance_pass(&mut squared, Axis(0));
        squared_distance_pass(&mut squared, Axis(1));
        squared.mapv(|d2| if d2 >= FAR { f64::INFINITY } else { d2.sqrt() })
    }
}

/// Replace every lane along `axis` with its 1-D squared distance transform.
fn squared_distance_pass(grid: &mut Array2<f64>, axis: Axis) {
    let n = grid.len_of(axis);
    let mut f = vec![0.0; n];
    let mut d = vec![0.0; n];
    let mut v = vec![0usize; n];
    let mut z = vec![0.0; n + 1];

    for mut lane in grid.lanes_mut(axis) {
        f.iter_mut().zip(lane.iter()).for_each(|(dst, &src)| *dst = src);
        lower_envelope(&f, &mut d, &mut v, &mut z);
        lane.iter_mut().zip(&d).for_each(|(dst, &src)| *dst = src.min(FAR));
    }
}

/// 1-D squared distance transform of sampled function `f` into `d`.
fn lower_envelope(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    if n == 0 {
        return;
    }
    let intersect = |q: usize, p: usize| -> f64 {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
    };

    let mut k = 0usize;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;
    for q in 1..n {
        let mut s = intersect(q, v[k]);
        while s <= z[k] {
            k -= 1;
            s = intersect(q, v[k]);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, out) in d.iter_mut().enumerate() {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let dq = q as f64 - v[k] as f64;
        *out = dq * dq + f[v[k]];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Reference: scan every background pixel.
    fn brute_force(mask: &Array2<bool>) -> Array2<f64> {
        let background: Vec<(usize, usize)> = mask
            .indexed_iter()
            .filter(|(_, &set)| !set)
            .map(|(idx, _)| idx)
            .collect();
        Array2::from_shape_fn(mask.dim(), |(r, c)| {
            if !mask[[r, c]] {
                return 0.0;
            }
            background
                .iter()
                .map(|&(br, bc)| {
                    let dr = r as f64 - br as f64;
                    let dc = c as f64 - bc as f64;
                    (dr * dr + dc * dc).sqrt()
                })
                .fold(f64::INFINITY, f64::min)
        })
    }

    #[test]
    fn test_matches_brute_force() {
        let mask = Array2::from_shape_fn((17, 23), |(r, c)| {
            let dr = r as f64 - 8.0;
            let dc = c as f64 - 11.0;
            (dr * dr / 40.0 + dc * dc / 90.0) < 1.0 || (r + 2 * c) % 11 == 0
        });
        let fast = ExactEuclideanDistance.transform(mask.view());
        let slow = brute_force(&mask);
        for (a, b) in fast.iter().zip(slow.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_background_is_zero() {
        let mask = Array2::from_shape_fn((5, 5), |(r, _)| r == 2);
        let dist = ExactEuclideanDistance.transform(mask.view());
        assert_eq!(dist[[0, 0]], 0.0);
        assert_relative_eq!(dist[[2, 3]], 1.0);
    }

    #[test]
    fn test_stripe_depth() {
        let mask = Array2::from_shape_fn((40, 30), |(r, _)| (10..30).contains(&r));
        let dist = ExactEuclideanDistance.transform(mask.view());
        assert_relative_eq!(dist[[10, 15]], 1.0);
        assert_relative_eq!(dist[[19, 15]], 10.0);
        assert_relative_eq!(dist[[20, 15]], 10.0);
    }

    #[test]
    fn test_full_mask_is_infinite() {
        let mask = Array2::from_elem((4, 6), true);
        let dist = ExactEuclideanDistance.transform(mask.view());
        assert!(dist.iter().all(|d| d.is_infinite()));
    }
}
