//! Box-counting fractal dimension.
//!
//! Points are rescaled per axis with `(v - min) / max(1, max - min)` and dropped
//! into a `bins × bins` grid for each ε of a [`BoxCountSchedule`], with
//! `bins = max(1, ceil(1/ε))`. The dimension is the least-squares slope of
//! `ln N(ε)` against `ln(1/ε)`.
//!
//! The estimate is not clamped to [0, 2]. Sparse or tiny masks can produce
//! values outside that range; callers should read those as measurement
//! artifacts.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::config::BoxCountSchedule;
use crate::error::{DarkLaneError, Result};

/// Offset added to every box count before taking the log
const LOG_FLOOR: f64 = 1e-9;

/// Parallel epsilon / occupied-box sequences, ε strictly decreasing.
///
/// Box counts are exact integers and serialize as JSON integers (`200`, not
/// `200.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractalCurve {
    pub eps: Vec<f64>,
    pub box_counts: Vec<usize>,
}

/// Result of one box-counting run.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalEstimate {
    /// `None` when there were no points to count
    pub dimension: Option<f64>,
    pub curve: FractalCurve,
}

/// Box-count the true pixels of a mask, using `(row, col)` as coordinates.
pub fn box_count_mask(
    mask: ArrayView2<bool>,
    schedule: &BoxCountSchedule,
) -> Result<FractalEstimate> {
    let points: Vec<(f64, f64)> = mask
        .indexed_iter()
        .filter(|(_, &on)| on)
        .map(|((row, col), _)| (row as f64, col as f64))
        .collect();
    box_count_points(&points, schedule)
}

/// Box-count an arbitrary 2-D point set.
///
/// # Errors
/// [`DarkLaneError::Configuration`] for an invalid schedule and
/// [`DarkLaneError::NonFiniteInput`] if any coordinate is NaN or infinite.
pub fn box_count_points(
    points: &[(f64, f64)],
    schedule: &BoxCountSchedule,
) -> Result<FractalEstimate> {
    schedule.validate()?;
    let eps = schedule.epsilons();

    if let Some(p) = points.iter().find(|(a, b)| !a.is_finite() || !b.is_finite()) {
        return Err(DarkLaneError::NonFiniteInput(format!("box-count point {p:?}")));
    }

    if points.is_empty() {
        let box_counts = vec![0; eps.len()];
        return Ok(FractalEstimate {
            dimension: None,
            curve: FractalCurve { eps, box_counts },
        });
    }

    let normalized = normalize_points(points);
    let box_counts: Vec<usize> = eps
        .iter()
        .map(|&e| occupied_boxes(&normalized, e))
        .collect();

    let x: Vec<f64> = eps.iter().map(|e| (1.0 / e).ln()).collect();
    let y: Vec<f64> = box_counts
        .iter()
        .map(|&n| (n as f64 + LOG_FLOOR).ln())
        .collect();

    Ok(FractalEstimate {
        dimension: least_squares_slope(&x, &y),
        curve: FractalCurve { eps, box_counts },
    })
}

fn normalize_points(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let axis_range = |select: fn(&(f64, f64)) -> f64| {
        points.iter().map(select).fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
    };
    let (min_a, max_a) = axis_range(|p| p.0);
    let (min_b, max_b) = axis_range(|p| p.1);
    let span_a = (max_a - min_a).max(1.0);
    let span_b = (max_b - min_b).max(1.0);

    points
        .iter()
        .map(|&(a, b)| ((a - min_a) / span_a, (b - min_b) / span_b))
        .collect()
}

fn occupied_boxes(normalized: &[(f64, f64)], epsilon: f64) -> usize {
    let bins = ((1.0 / epsilon).ceil() as usize).max(1);
    let cell = |v: f64| ((v * bins as f64).floor() as usize).min(bins - 1);

    // Deep schedules reach bins near 1e10, so cells are keyed by pair
    let mut keys: Vec<(usize, usize)> = normalized
        .iter()
        .map(|&(a, b)| (cell(a), cell(b)))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}

/// Slope of the ordinary least-squares line through `(x, y)`.
fn least_squares_slope(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (sxy, sxx) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
            let dx = xi - mean_x;
            (sxy + dx * (yi - mean_y), sxx + dx * dx)
        });

    (sxx > 0.0).then(|| sxy / sxx)
}
