//! Messages exchanged between the control side, the worker and the
//! real-time thread.
//!
//! ```text
//! control ──LoadRequest──▶ worker ──SwapMessage──▶ real-time
//!                            ▲                        │
//!                            └────DisposeMessage──────┘
//! ```

use crate::model::AmpModel;
use crate::path::{ModelPath, MAX_PATH_LEN};
use std::fmt;

/// A request to change the live model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRequest {
    /// Load the model at this path.
    Load(ModelPath),
    /// Unload the live model.
    Clear,
    /// The caller supplied a path that does not fit in a message.
    Oversized { len: usize },
}

impl LoadRequest {
    pub fn from_path_str(path: &str) -> Self {
        if path.is_empty() {
            return Self::Clear;
        }
        match ModelPath::new(path) {
            Ok(p) => Self::Load(p),
            Err(_) => Self::Oversized { len: path.len() },
        }
    }
}

/// Commands consumed by the worker thread.
#[derive(Debug)]
pub(crate) enum WorkerCommand {
    Load(LoadRequest),
    SetMaxBlockSize(usize),
    /// Teardown overflow: a model the dispose ring had no room for.
    Dispose(DisposeMessage),
    Shutdown,
}

/// How a load request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A new model was built.
    Loaded,
    /// An empty path asked for the model to be removed.
    Cleared,
    /// The file does not exist. Expected, not an error.
    NotFound,
    /// The file exists but could not be turned into a model, or the path
    /// was too long to submit.
    Invalid,
}

/// Worker → real-time: the result of a load request.
pub struct SwapMessage {
    pub outcome: LoadOutcome,
    pub model: Option<Box<dyn AmpModel>>,
    pub path: ModelPath,
    /// Whether a `None` model should still replace the live one.
    pub replace_live: bool,
}

impl SwapMessage {
    pub fn loaded(model: Box<dyn AmpModel>, path: ModelPath) -> Self {
        Self {
            outcome: LoadOutcome::Loaded,
            model: Some(model),
            path,
            replace_live: true,
        }
    }

    pub fn empty(outcome: LoadOutcome, replace_live: bool) -> Self {
        Self {
            outcome,
            model: None,
            path: ModelPath::empty(),
            replace_live,
        }
    }

    /// Whether applying this message changes the live model.
    #[inline]
    pub fn replaces_live(&self) -> bool {
        self.model.is_some() || self.replace_live
    }
}

impl fmt::Debug for SwapMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapMessage")
            .field("outcome", &self.outcome)
            .field("has_model", &self.model.is_some())
            .field("path", &self.path)
            .field("replace_live", &self.replace_live)
            .finish()
    }
}

/// Real-time → worker: a displaced model to destroy.
pub struct DisposeMessage {
    pub model: Option<Box<dyn AmpModel>>,
}

impl fmt::Debug for DisposeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposeMessage")
            .field("has_model", &self.model.is_some())
            .finish()
    }
}

const _: () = assert!(MAX_PATH_LEN <= u16::MAX as usize);
