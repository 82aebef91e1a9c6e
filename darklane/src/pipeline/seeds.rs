//! Greedy farthest-first seed selection on a distance field.

use ndarray::{Array2, ArrayView2};

use crate::config::DarkLaneConfig;

/// Pick watershed seeds from the deepest points of `distance`.
///
/// Candidates are pixels with distance strictly greater than `min_seed_peak`,
/// visited from deepest to shallowest (ties by raster order). A candidate is
/// accepted when it lies at least `min_seed_distance_px` from every seed
/// accepted so far; the scan stops after `max_seeds` acceptances.
///
/// # Returns
/// Accepted `(row, col)` coordinates in acceptance order
pub fn select_seeds(distance: ArrayView2<f64>, config: &DarkLaneConfig) -> Vec<(usize, usize)> {
    let mut candidates: Vec<(f64, usize, usize)> = distance
        .indexed_iter()
        .filter(|(_, &d)| d > config.min_seed_peak)
        .map(|((row, col), &d)| (d, row, col))
        .collect();

    // indexed_iter walks in raster order, so a stable sort keeps ties in it
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

    let min_dist2 = config.min_seed_distance_px * config.min_seed_distance_px;
    let mut seeds: Vec<(usize, usize)> = Vec::new();

    for (_, row, col) in candidates {
        if seeds.len() >= config.max_seeds {
            break;
        }
        let far_enough = seeds.iter().all(|&(sr, sc)| {
            let dr = row as f64 - sr as f64;
            let dc = col as f64 - sc as f64;
            dr * dr + dc * dc >= min_dist2
        });
        if far_enough {
            seeds.push((row, col));
        }
    }

    seeds
}

/// Boolean raster with `true` at each seed.
pub fn seed_raster(shape: (usize, usize), seeds: &[(usize, usize)]) -> Array2<bool> {
    let mut raster = Array2::from_elem(shape, false);
    for &(row, col) in seeds {
        raster[[row, col]] = true;
    }
    raster
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn config(min_dist: f64, min_peak: f64, max_seeds: usize) -> DarkLaneConfig {
        DarkLaneConfig {
            min_seed_distance_px: min_dist,
            min_seed_peak: min_peak,
            max_seeds,
            ..Default::default()
        }
    }

    #[test]
    fn test_deepest_point_first() {
        let mut distance = Array2::zeros((20, 20));
        distance[[3, 3]] = 8.0;
        distance[[15, 15]] = 12.0;
        let seeds = select_seeds(distance.view(), &config(5.0, 1.0, 10));
        assert_eq!(seeds, vec![(15, 15), (3, 3)]);
    }

    #[test]
    fn test_ties_break_in_raster_order() {
        let distance = Array2::from_elem((4, 4), 9.0);
        let seeds = select_seeds(distance.view(), &config(2.0, 1.0, 3));
        assert_eq!(seeds, vec![(0, 0), (0, 2), (2, 0)]);
    }

    #[test]
    fn test_peak_floor_is_strict() {
        let distance = Array2::from_elem((6, 6), 5.0);
        assert!(select_seeds(distance.view(), &config(1.0, 5.0, 10)).is_empty());
    }

    #[test]
    fn test_close_candidates_suppressed() {
        let mut distance = Array2::zeros((10, 30));
        distance[[5, 5]] = 10.0;
        distance[[5, 8]] = 9.0;
        distance[[5, 20]] = 7.0;
        let seeds = select_seeds(distance.view(), &config(10.0, 0.0, 10));
        assert_eq!(seeds, vec![(5, 5), (5, 20)]);
    }

    #[test]
    fn test_infinite_distances_are_candidates() {
        let distance = Array2::from_elem((5, 5), f64::INFINITY);
        let seeds = select_seeds(distance.view(), &config(50.0, 5.0, 10));
        assert_eq!(seeds, vec![(0, 0)]);
    }

    #[test]
    fn test_separation_and_cap_hold_on_random_fields() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for trial in 0..20 {
            let distance = Array2::from_shape_fn((48, 64), |_| rng.random_range(0.0..20.0));
            let min_dist = rng.random_range(1.0..15.0);
            let max_seeds = rng.random_range(1..30);
            let cfg = config(min_dist, 3.0, max_seeds);
            let seeds = select_seeds(distance.view(), &cfg);

            assert!(seeds.len() <= max_seeds, "trial {trial}");
            for (i, &(r1, c1)) in seeds.iter().enumerate() {
                assert!(distance[[r1, c1]] > 3.0);
                for &(r2, c2) in &seeds[i + 1..] {
                    let d2 = (r1 as f64 - r2 as f64).powi(2) + (c1 as f64 - c2 as f64).powi(2);
                    assert!(d2 >= min_dist * min_dist, "trial {trial}: seeds {} apart", d2.sqrt());
                }
            }
        }
    }

    #[test]
    fn test_seed_raster_marks_seeds() {
        let raster = seed_raster((4, 5), &[(0, 0), (3, 4)]);
        assert!(raster[[0, 0]] && raster[[3, 4]]);
        assert_eq!(raster.iter().filter(|&&v| v).count(), 2);
    }
}
