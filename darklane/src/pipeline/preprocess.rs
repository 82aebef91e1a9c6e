//! Multi-scale background suppression.

use ndarray::{Array2, ArrayView2};

use crate::config::DarkLaneConfig;
use crate::image_proc::{gaussian_filter, to_unit};

/// Turn dark lanes into bright peaks on a flattened background.
///
/// The raster is scaled to [0, 1] and inverted. For each background scale in
/// ascending order, the *current* working raster is Gaussian-smoothed and
/// `background_weight` times that estimate is subtracted, so later scales act
/// on what earlier scales left behind. Negative values are clipped and the
/// result is rescaled to [0, 1].
pub fn enhance(raster: ArrayView2<f64>, config: &DarkLaneConfig) -> Array2<f64> {
    let mut working = to_unit(raster).mapv(|v| 1.0 - v);

    for &sigma in &config.background_scales {
        let background = gaussian_filter(working.view(), sigma);
        working.scaled_add(-config.background_weight, &background);
    }

    working.mapv_inplace(|v| v.max(0.0));
    to_unit(working.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_raster_enhances_to_zero() {
        let raster = Array2::from_elem((24, 24), 0.8);
        let enhanced = enhance(raster.view(), &DarkLaneConfig::default());
        assert!(enhanced.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_dark_stripe_becomes_brightest() {
        let raster = Array2::from_shape_fn((64, 64), |(r, c)| {
            let base = 0.6 + 0.2 * c as f64 / 63.0;
            if (28..36).contains(&r) {
                base * 0.3
            } else {
                base
            }
        });
        let enhanced = enhance(raster.view(), &DarkLaneConfig::default());

        let max = enhanced.iter().copied().fold(f64::MIN, f64::max);
        let min = enhanced.iter().copied().fold(f64::MAX, f64::min);
        assert_relative_eq!(max, 1.0, epsilon = 1e-12);
        assert_relative_eq!(min, 0.0, epsilon = 1e-12);

        let stripe = enhanced[[32, 32]];
        let field = enhanced[[5, 32]];
        assert!(stripe > 0.5 && stripe > field + 0.3, "stripe {stripe}, field {field}");
    }

    #[test]
    fn test_output_is_unit_ranged() {
        let raster =
            Array2::from_shape_fn((30, 40), |(r, c)| ((r * 13 + c * 7) % 17) as f64 * 250.0);
        let enhanced = enhance(raster.view(), &DarkLaneConfig::default());
        assert_eq!(enhanced.dim(), (30, 40));
        assert!(enhanced.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
