//! Configuration for dark-lane mask generation.
//!
//! The pipeline is: invert -> multi-scale background subtraction ->
//! multi-threshold fusion -> morphology -> watershed. Every field is validated
//! eagerly by [`DarkLaneConfig::validate`] before any pixel is processed.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DarkLaneError, Result};

/// Tunable parameters of the dark-lane pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkLaneConfig {
    /// Gaussian sigmas (pixels) for background suppression, strictly ascending
    pub background_scales: Vec<f64>,
    /// Fraction of each smoothed background removed from the working raster
    pub background_weight: f64,

    /// Threshold ladder over the enhanced raster, strictly ascending in (0, 1)
    pub thresholds: Vec<f64>,
    /// Disk radius for opening/closing
    pub morph_radius: usize,
    /// Minimum component size at the first threshold; level `i` uses `base * (i + 1)`
    pub min_size_base: usize,

    /// Minimum pixel separation between accepted watershed seeds
    pub min_seed_distance_px: f64,
    /// Seeds must sit strictly deeper than this distance-transform value
    pub min_seed_peak: f64,
    /// Upper bound on accepted seeds
    pub max_seeds: usize,
}

impl Default for DarkLaneConfig {
    fn default() -> Self {
        Self {
            background_scales: vec![20.0, 50.0, 100.0],
            background_weight: 0.3,
            thresholds: vec![0.15, 0.25, 0.35, 0.45],
            morph_radius: 2,
            min_size_base: 100,
            min_seed_distance_px: 50.0,
            min_seed_peak: 5.0,
            max_seeds: 50,
        }
    }
}

fn config_error(msg: impl Into<String>) -> DarkLaneError {
    DarkLaneError::Configuration(msg.into())
}

fn ensure_strictly_ascending(name: &str, values: &[f64]) -> Result<()> {
    if let Some(pair) = values.windows(2).find(|w| w[1] <= w[0]) {
        return Err(config_error(format!(
            "{name} must be strictly ascending ({} is followed by {})",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

impl DarkLaneConfig {
    /// Check every field, returning the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.background_scales.is_empty() {
            return Err(config_error("background_scales must not be empty"));
        }
        if let Some(s) = self
            .background_scales
            .iter()
            .find(|s| !s.is_finite() || **s <= 0.0)
        {
            return Err(config_error(format!(
                "background_scales must be positive and finite, got {s}"
            )));
        }
        ensure_strictly_ascending("background_scales", &self.background_scales)?;

        if !self.background_weight.is_finite() {
            return Err(config_error(format!(
                "background_weight must be finite, got {}",
                self.background_weight
            )));
        }

        if self.thresholds.is_empty() {
            return Err(config_error("thresholds must not be empty"));
        }
        if let Some(t) = self
            .thresholds
            .iter()
            .find(|t| !(**t > 0.0 && **t < 1.0))
        {
            return Err(config_error(format!(
                "thresholds must lie in the open interval (0, 1), got {t}"
            )));
        }
        ensure_strictly_ascending("thresholds", &self.thresholds)?;

        if self.morph_radius == 0 {
            return Err(config_error("morph_radius must be at least 1"));
        }
        if self.min_size_base == 0 {
            return Err(config_error("min_size_base must be at least 1"));
        }

        if !self.min_seed_distance_px.is_finite() || self.min_seed_distance_px <= 0.0 {
            return Err(config_error(format!(
                "min_seed_distance_px must be positive, got {}",
                self.min_seed_distance_px
            )));
        }
        if !self.min_seed_peak.is_finite() || self.min_seed_peak < 0.0 {
            return Err(config_error(format!(
                "min_seed_peak must be non-negative, got {}",
                self.min_seed_peak
            )));
        }
        if self.max_seeds == 0 {
            return Err(config_error("max_seeds must be at least 1"));
        }

        Ok(())
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON file and validate
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Geometric epsilon schedule for box counting.
///
/// Produces `steps` values `10^e` with `e` spaced evenly from `exp_from` down to
/// `exp_to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxCountSchedule {
    pub exp_from: f64,
    pub exp_to: f64,
    pub steps: usize,
}

impl Default for BoxCountSchedule {
    fn default() -> Self {
        Self {
            exp_from: -1.0,
            exp_to: -2.2,
            steps: 10,
        }
    }
}

impl BoxCountSchedule {
    /// Require a strictly decreasing schedule with at least two points to fit.
    pub fn validate(&self) -> Result<()> {
        if self.steps < 2 {
            return Err(config_error(format!(
                "box-count steps must be at least 2, got {}",
                self.steps
            )));
        }
        if !self.exp_from.is_finite() || !self.exp_to.is_finite() {
            return Err(config_error("box-count exponents must be finite"));
        }
        if self.exp_from <= self.exp_to {
            return Err(config_error(format!(
                "box-count exp_from ({}) must exceed exp_to ({})",
                self.exp_from, self.exp_to
            )));
        }
        Ok(())
    }

    /// Epsilon values, largest first.
    pub fn epsilons(&self) -> Vec<f64> {
        let span = self.exp_to - self.exp_from;
        let last = (self.steps.max(2) - 1) as f64;
        (0..self.steps)
            .map(|i| 10f64.powf(self.exp_from + span * i as f64 / last))
            .collect()
    }
}
