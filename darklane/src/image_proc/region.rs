//! Per-label shape statistics from second-order moments.
//!
//! Each pixel is treated as a unit square, so a region's covariance is the
//! covariance of its pixel centres plus 1/12 on each diagonal term. With
//! covariance eigenvalues λ₁ ≥ λ₂, the equivalent ellipse has
//! `major = 4√λ₁`, `minor = 4√λ₂`, eccentricity `√(1 − λ₂/λ₁)` and
//! elongation `major / minor`. The square-pixel term keeps λ₂ > 0, so
//! eccentricity stays below 1 even for one-pixel-wide regions.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Variance of a uniform distribution over one pixel
const PIXEL_VARIANCE: f64 = 1.0 / 12.0;

/// Shape summary of one labelled region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub label: u32,
    /// Pixel count
    pub area: usize,
    /// Mean (row, col) of the region's pixels
    pub centroid: (f64, f64),
    pub major_axis_length: f64,
    pub minor_axis_length: f64,
    /// In [0, 1); 0 for a circle
    pub eccentricity: f64,
    /// Major / minor axis ratio, 1.0 when the minor axis is 0
    pub elongation: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct MomentSums {
    n: usize,
    r: f64,
    c: f64,
    rr: f64,
    cc: f64,
    rc: f64,
}

impl MomentSums {
    fn add(&mut self, row: usize, col: usize) {
        let (r, c) = (row as f64, col as f64);
        self.n += 1;
        self.r += r;
        self.c += c;
        self.rr += r * r;
        self.cc += c * c;
        self.rc += r * c;
    }

    fn to_record(self, label: u32) -> RegionRecord {
        let n = self.n as f64;
        let mean_r = self.r / n;
        let mean_c = self.c / n;
        let var_r = (self.rr / n - mean_r * mean_r).max(0.0) + PIXEL_VARIANCE;
        let var_c = (self.cc / n - mean_c * mean_c).max(0.0) + PIXEL_VARIANCE;
        let cov = self.rc / n - mean_r * mean_c;

        let half_trace = 0.5 * (var_r + var_c);
        let spread = (0.25 * (var_r - var_c).powi(2) + cov * cov).sqrt();
        let lambda1 = half_trace + spread;
        let lambda2 = (half_trace - spread).max(0.0);

        let major_axis_length = 4.0 * lambda1.sqrt();
        let minor_axis_length = 4.0 * lambda2.sqrt();
        let eccentricity = if lambda1 > 0.0 {
            (1.0 - lambda2 / lambda1).max(0.0).sqrt()
        } else {
            0.0
        };
        let elongation = if minor_axis_length > 0.0 {
            major_axis_length / minor_axis_length
        } else {
            1.0
        };

        RegionRecord {
            label,
            area: self.n,
            centroid: (mean_r, mean_c),
            major_axis_length,
            minor_axis_length,
            eccentricity,
            elongation,
        }
    }
}

/// Shape records for every positive label present, in ascending label order.
pub fn region_properties(labels: ArrayView2<u32>) -> Vec<RegionRecord> {
    let max_label = labels.iter().copied().max().unwrap_or(0) as usize;
    let mut sums = vec![MomentSums::default(); max_label + 1];

    for ((row, col), &label) in labels.indexed_iter() {
        if label != 0 {
            sums[label as usize].add(row, col);
        }
    }

    sums.into_iter()
        .enumerate()
        .skip(1)
        .filter(|(_, s)| s.n > 0)
        .map(|(label, s)| s.to_record(label as u32))
        .collect()
}
