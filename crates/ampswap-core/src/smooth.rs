//! One-pole gain smoothing for click-free level changes.
//!
//! Every sample moves the current gain a fixed fraction of the way toward its
//! target: `g += c * (t - g)`. The time constant depends only on `c`, so a
//! target that changes between host blocks never produces a step, whatever
//! the block size.
//!
//! # Example
//!
//! ```
//! use ampswap_core::{db_to_gain, GainSmoother};
//!
//! let mut gain = GainSmoother::new(1.0, 0.001);
//! gain.set_target(db_to_gain(-6.0));
//!
//! # let mut buffer = [0.5f32; 512];
//! for sample in buffer.iter_mut() {
//!     *sample *= gain.next_sample();
//! }
//! ```

/// Smoothing coefficient used when none is configured.
pub const DEFAULT_SMOOTHING_COEFF: f32 = 0.001;

/// Convert decibels to a linear amplitude factor (`10^(dB/20)`).
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db * 0.05)
}

/// Exponential ramp from a current gain to a target gain.
///
/// Used for the input gain, the output gain and the crossfade mix gain.
/// There is no clamping and no "done" state; the value approaches the target
/// asymptotically and never overshoots it.
#[derive(Debug, Clone, PartialEq)]
pub struct GainSmoother {
    current: f32,
    target: f32,
    coeff: f32,
}

impl GainSmoother {
    pub fn new(initial: f32, coeff: f32) -> Self {
        debug_assert!(coeff > 0.0 && coeff <= 1.0, "coeff must be in (0, 1]");
        Self {
            current: initial,
            target: initial,
            coeff,
        }
    }

    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value`, discarding any ramp in progress.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    /// Call once per sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_coeff(&mut self, coeff: f32) {
        debug_assert!(coeff > 0.0 && coeff <= 1.0, "coeff must be in (0, 1]");
        self.coeff = coeff;
    }

    /// Multiply every sample by the ramped gain.
    #[inline]
    pub fn apply_gain(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample *= self.next_sample();
        }
    }

    /// Number of samples needed to get within `epsilon` of the target,
    /// starting from the current value.
    pub fn samples_to_settle(&self, epsilon: f32) -> usize {
        let distance = (self.target - self.current).abs();
        if distance <= epsilon {
            return 0;
        }
        let ratio = (epsilon / distance).ln() / (1.0 - self.coeff).ln();
        ratio.ceil() as usize
    }
}

/// Unity gain with the default coefficient.
impl Default for GainSmoother {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_SMOOTHING_COEFF)
    }
}
