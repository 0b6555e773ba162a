//! Real-time signal-conditioning primitives for a neural amp effect.
//!
//! Everything here is plain state mutated from the audio thread; nothing
//! allocates, locks or blocks once constructed.
//!
//! - [`GainSmoother`]: one-pole ramp used for input, output and mix gain
//! - [`DryDelayBuffer`]: circular store for the time-aligned dry signal
//! - [`Crossfade`]: bypass crossfade with post-reactivation warm-up
//! - [`ParameterRange`], [`AtomicFloat`], [`AtomicFlag`]: control surface
//! - [`ProcessorConfig`]: sample rate, block size and timing constants

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{ProcessorConfig, MAX_SUPPORTED_BLOCK_SIZE};

pub mod smooth;
pub use smooth::{db_to_gain, GainSmoother, DEFAULT_SMOOTHING_COEFF};

mod delay_buffer;
pub use delay_buffer::DryDelayBuffer;

pub mod crossfade;
pub use crossfade::{Crossfade, CrossfadePhase, MixWeights};

pub mod parameter;
pub use parameter::{ParameterRange, ParameterScale};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};
