//! Parameter ranges for the host-facing controls.
//!
//! Hosts automate in normalized 0.0-1.0 space; the render step works in real
//! units (dB, on/off).
//!
//! # Example
//!
//! ```
//! use ampswap_core::ParameterRange;
//!
//! let level = ParameterRange::level_db();
//! assert_eq!(level.denormalize(0.5), 0.0);
//! assert_eq!(level.clamp(35.0), 20.0);
//! ```

/// How a parameter value is scaled between normalized (0-1) and real values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParameterScale {
    /// `real = min + normalized * (max - min)`
    #[default]
    Linear,

    /// On/off toggle (normalized < 0.5 = off, >= 0.5 = on)
    Toggle,
}

/// Valid range and default for a control.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub scale: ParameterScale,
}

impl ParameterRange {
    pub fn new(min: f32, max: f32, default: f32, scale: ParameterScale) -> Self {
        debug_assert!(max > min, "max must be greater than min");

        Self {
            min,
            max,
            default: default.clamp(min, max),
            scale,
        }
    }

    pub fn linear(min: f32, max: f32, default: f32) -> Self {
        Self::new(min, max, default, ParameterScale::Linear)
    }

    pub fn toggle(default_on: bool) -> Self {
        Self::new(
            0.0,
            1.0,
            if default_on { 1.0 } else { 0.0 },
            ParameterScale::Toggle,
        )
    }

    /// Input/output level: -20 dB to +20 dB, default 0 dB.
    pub fn level_db() -> Self {
        Self::linear(-20.0, 20.0, 0.0)
    }

    /// Convert a real value to normalized (0.0-1.0).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let value = value.clamp(self.min, self.max);
        let range = self.max - self.min;

        match self.scale {
            ParameterScale::Linear => (value - self.min) / range,
            ParameterScale::Toggle => {
                if value >= (self.min + self.max) / 2.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Convert a normalized value (0.0-1.0) to a real value.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);

        match self.scale {
            ParameterScale::Linear => self.min + normalized * (self.max - self.min),
            ParameterScale::Toggle => {
                if normalized >= 0.5 {
                    self.max
                } else {
                    self.min
                }
            }
        }
    }

    /// Clamp a real value to this parameter's range. NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

impl Default for ParameterRange {
    fn default() -> Self {
        Self::linear(0.0, 1.0, 0.5)
    }
}
