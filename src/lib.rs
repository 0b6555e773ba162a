//! # ampswap - Neural Amp Effect Core
//!
//! Smoothed gain staging around an interchangeable inference model, a
//! sample-accurate bypass crossfade, and model hot-swap that never blocks,
//! allocates or frees on the audio thread.
//!
//! ## Architecture
//!
//! - **ampswap-core** - Real-time primitives (gain smoother, dry delay line,
//!   crossfade state machine, parameter ranges)
//! - **ampswap-neural** - Model exchange (worker thread, swap and dispose queues)
//! - **ampswap** - Render step, controller, notifications, configuration
//!
//! ## Quick Start
//!
//! ```ignore
//! use ampswap::prelude::*;
//!
//! let (mut amp, mut control) = AmpProcessor::builder()
//!     .sample_rate(48000.0)
//!     .loader(my_loader)
//!     .build()?;
//!
//! control.set_model_path("/models/plexi.nam")?;
//! control.set_input_db(-3.0);
//!
//! amp.process(&input, &mut output);
//! ```

/// Re-export of ampswap-core for direct access
pub use ampswap_core as core;

/// Re-export of ampswap-neural for direct access
pub use ampswap_neural as neural;

mod builder;
mod config;
mod controller;
mod diagnostics;
mod error;
mod notify;
mod params;
mod processor;

pub use builder::AmpProcessorBuilder;
pub use config::AmpConfig;
pub use controller::AmpController;
pub use diagnostics::{DiagnosticsTap, RenderSnapshot};
pub use error::{Error, Result};
pub use notify::Notification;
pub use params::{AmpParams, BlockParams};
pub use processor::AmpProcessor;

pub use ampswap_core::{CrossfadePhase, ProcessorConfig};
pub use ampswap_neural::{
    AmpModel, ExchangeConfig, LoadFailurePolicy, LoadOutcome, ModelError, ModelLoader, ModelPath,
    RecommendedLevels,
};

/// Everything needed to build and drive a processor.
pub mod prelude {
    pub use crate::{
        AmpConfig, AmpController, AmpModel, AmpProcessor, LoadFailurePolicy, ModelError,
        ModelLoader, Notification, RecommendedLevels,
    };
}
