//! # ampswap-neural
//!
//! Hot-swapping of neural amp models behind a real-time audio thread.
//!
//! Models are loaded on a dedicated worker thread, handed to the audio
//! thread through a wait-free queue, swapped in at a block boundary, and
//! sent back to the worker to be destroyed. The audio thread never
//! allocates, frees, locks or touches the filesystem.
//!
//! ```ignore
//! use ampswap_neural::{ExchangeConfig, ModelExchange};
//!
//! let (loader_handle, mut rt) = ModelExchange::start(my_loader, ExchangeConfig::default())?;
//! loader_handle.submit_load("/models/plexi.nam")?;
//!
//! // audio thread, once per block
//! rt.apply_pending();
//! if let Some(model) = rt.model() {
//!     model.process(&input, &mut output);
//! }
//! ```

pub mod config;
pub mod error;
pub mod exchange;
pub mod message;
pub mod model;
pub mod path;

mod worker;

pub use config::{ExchangeConfig, LoadFailurePolicy};
pub use error::{Error, ModelError, Result};
pub use exchange::{LoadHandle, ModelExchange, RtExchange};
pub use message::{DisposeMessage, LoadOutcome, LoadRequest, SwapMessage};
pub use model::{AmpModel, ModelLoader, RecommendedLevels};
pub use path::{ModelPath, MAX_PATH_LEN};
