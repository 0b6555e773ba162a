//! Processor configuration.

use crate::{Error, Result};
use serde::Deserialize;

/// Largest host block the processor will size its buffers for.
pub const MAX_SUPPORTED_BLOCK_SIZE: usize = 8192;

/// Configuration for the signal-conditioning path.
///
/// All durations are in milliseconds and are converted to sample counts
/// against `sample_rate` whenever the processor is prepared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub sample_rate: f64,
    pub max_block_size: usize,
    /// Length of the bypass crossfade.
    pub fade_time_ms: f32,
    /// How long the model runs silently after re-activation before it is faded in.
    pub warmup_time_ms: f32,
    /// One-pole coefficient shared by every gain ramp.
    pub smoothing_coeff: f32,
    /// Mix gain above which the wet path is dropped entirely.
    pub dry_snap_threshold: f32,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            max_block_size: 512,
            fade_time_ms: 20.0,
            warmup_time_ms: 40.0,
            smoothing_coeff: 0.001,
            dry_snap_threshold: 0.95,
        }
    }
}

impl ProcessorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate < 8000.0 || self.sample_rate > 384000.0 {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.max_block_size == 0 || self.max_block_size > MAX_SUPPORTED_BLOCK_SIZE {
            return Err(Error::InvalidBlockSize {
                frames: self.max_block_size,
                max: MAX_SUPPORTED_BLOCK_SIZE,
            });
        }
        if !(self.fade_time_ms > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "fade_time_ms must be positive, got {}",
                self.fade_time_ms
            )));
        }
        if !(self.warmup_time_ms >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "warmup_time_ms must be non-negative, got {}",
                self.warmup_time_ms
            )));
        }
        if !(self.smoothing_coeff > 0.0 && self.smoothing_coeff <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "smoothing_coeff {} out of range (0, 1]",
                self.smoothing_coeff
            )));
        }
        if !(self.dry_snap_threshold > 0.0 && self.dry_snap_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "dry_snap_threshold {} out of range (0, 1]",
                self.dry_snap_threshold
            )));
        }
        Ok(())
    }

    /// Crossfade length in samples.
    #[inline]
    pub fn fade_time_samples(&self) -> usize {
        (self.fade_time_ms as f64 * self.sample_rate / 1000.0) as usize
    }

    /// Warm-up window in samples.
    #[inline]
    pub fn warmup_samples(&self) -> usize {
        (self.warmup_time_ms as f64 * self.sample_rate / 1000.0) as usize
    }

    /// Per-sample change of the fade position.
    #[inline]
    pub fn fade_increment(&self) -> f32 {
        (1000.0 / (self.fade_time_ms as f64 * self.sample_rate)) as f32
    }
}
