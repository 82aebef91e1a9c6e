//! Threshold-ladder mask fusion.

use log::debug;
use ndarray::{Array2, ArrayView2, Zip};

use crate::config::DarkLaneConfig;
use crate::error::Result;
use crate::image_proc::{
    apply_threshold, closing, opening, remove_small_objects, StructuringElement,
};

/// Union of cleaned binary masks over the threshold ladder.
///
/// Level `i` (0-based) keeps `enhanced > thresholds[i]`, opens then closes it
/// with a disk of `morph_radius`, and drops 8-connected components smaller
/// than `min_size_base * (i + 1)` pixels before OR-ing into the result.
pub fn fuse_masks(enhanced: ArrayView2<f64>, config: &DarkLaneConfig) -> Result<Array2<bool>> {
    let element = StructuringElement::disk(config.morph_radius)?;
    let mut combined = Array2::from_elem(enhanced.raw_dim(), false);

    for (level, &threshold) in config.thresholds.iter().enumerate() {
        let binary = apply_threshold(enhanced, threshold);
        let cleaned = closing(opening(binary.view(), &element).view(), &element);
        let min_size = config.min_size_base * (level + 1);
        let kept = remove_small_objects(cleaned.view(), min_size);

        debug!(
            "threshold {threshold:.3}: {} pixels kept (min size {min_size})",
            kept.iter().filter(|&&v| v).count()
        );

        Zip::from(&mut combined)
            .and(&kept)
            .for_each(|acc, &on| *acc |= on);
    }

    Ok(combined)
}
