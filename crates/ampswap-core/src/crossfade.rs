//! Bypass crossfade state machine.
//!
//! The fade position runs from 0 (fully processed) to 1 (fully dry). It moves
//! once per block by `fade_increment * frames`; the per-sample mix gain then
//! follows it through a [`GainSmoother`] so block-rate steps never click.
//!
//! After the effect is re-enabled the position is pinned at 1 for a warm-up
//! window. The model already processes audio during that time, so its
//! internal state has settled before it becomes audible.

use crate::config::ProcessorConfig;
use crate::smooth::GainSmoother;

/// Where the crossfade currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossfadePhase {
    /// Processing; fade position decaying toward 0.
    Active,
    /// Bypass requested; fade position rising toward 1.
    EnteringBypass,
    /// Fully dry. Hard bypass may short-circuit the block.
    Bypassed,
    /// Re-enabled but still held dry until the warm-up window elapses.
    WarmingUp,
}

/// Dry/wet weights for a single output sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixWeights {
    pub wet: f32,
    pub dry: f32,
}

impl MixWeights {
    /// Combine an already output-gained wet sample with a dry sample.
    #[inline]
    pub fn mix(self, wet: f32, dry: f32) -> f32 {
        wet * self.wet + dry * self.dry
    }
}

#[derive(Debug, Clone)]
pub struct Crossfade {
    bypassed: bool,
    position: f32,
    fade_increment: f32,
    warmup_remaining: usize,
    warmup_total: usize,
    mix: GainSmoother,
    snap_threshold: f32,
}

impl Crossfade {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            bypassed: false,
            position: 0.0,
            fade_increment: config.fade_increment(),
            warmup_remaining: 0,
            warmup_total: config.warmup_samples(),
            mix: GainSmoother::new(0.0, config.smoothing_coeff),
            snap_threshold: config.dry_snap_threshold,
        }
    }

    /// Recompute sample-rate dependent coefficients. State is kept.
    pub fn configure(&mut self, config: &ProcessorConfig) {
        self.fade_increment = config.fade_increment();
        self.warmup_total = config.warmup_samples();
        self.mix.set_coeff(config.smoothing_coeff);
        self.snap_threshold = config.dry_snap_threshold;
        self.warmup_remaining = self.warmup_remaining.min(self.warmup_total);
    }

    /// Jump to a settled state: fully dry if `bypassed`, otherwise fully wet.
    pub fn reset(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
        self.position = if bypassed { 1.0 } else { 0.0 };
        self.warmup_remaining = 0;
        self.mix.set_immediate(self.position);
    }

    /// Evaluate the transition for a block of `frames` samples.
    ///
    /// `enabled == false` requests bypass.
    pub fn advance(&mut self, enabled: bool, frames: usize) -> CrossfadePhase {
        let bypass_requested = !enabled;

        if bypass_requested != self.bypassed {
            self.bypassed = bypass_requested;
            if !bypass_requested {
                self.warmup_remaining = self.warmup_total;
            }
        }

        let step = self.fade_increment * frames as f32;

        if bypass_requested {
            if self.position < 1.0 {
                self.position = (self.position + step).min(1.0);
            }
        } else if self.position > 0.0 {
            if self.warmup_remaining > 0 {
                self.position = 1.0;
                self.warmup_remaining = self.warmup_remaining.saturating_sub(frames);
            } else {
                self.position = (self.position - step).max(0.0);
            }
        }

        self.mix.set_target(self.position);
        self.phase()
    }

    pub fn phase(&self) -> CrossfadePhase {
        if self.bypassed {
            if self.position >= 1.0 {
                CrossfadePhase::Bypassed
            } else {
                CrossfadePhase::EnteringBypass
            }
        } else if self.warmup_remaining > 0 && self.position > 0.0 {
            CrossfadePhase::WarmingUp
        } else {
            CrossfadePhase::Active
        }
    }

    /// Whether the block can skip all processing and copy input to output.
    #[inline]
    pub fn allows_hard_bypass(&self, hard_bypass_requested: bool) -> bool {
        hard_bypass_requested && self.bypassed && self.position >= 1.0
    }

    /// Advance the mix gain by one sample and return the weights to use.
    #[inline]
    pub fn next_weights(&mut self) -> MixWeights {
        let m = self.mix.next_sample();
        let wet = if m > self.snap_threshold { 0.0 } else { 1.0 - m };
        MixWeights {
            wet,
            dry: 1.0 - wet,
        }
    }

    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    #[inline]
    pub fn mix_gain(&self) -> f32 {
        self.mix.current()
    }

    #[inline]
    pub fn warmup_remaining(&self) -> usize {
        self.warmup_remaining
    }

    #[inline]
    pub fn warmup_total(&self) -> usize {
        self.warmup_total
    }

    #[inline]
    pub fn fade_increment(&self) -> f32 {
        self.fade_increment
    }

    #[inline]
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }
}
