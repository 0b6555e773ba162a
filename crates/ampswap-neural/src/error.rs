//! Error types for the model exchange.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Model path is too long: {len} bytes (max {max})")]
    PathTooLong { len: usize, max: usize },

    #[error("Model path is not valid UTF-8: {0}")]
    InvalidPath(String),

    #[error("Load queue is full")]
    QueueFull,

    #[error("Failed to spawn model worker: {0}")]
    WorkerSpawn(String),

    #[error("Model worker disconnected")]
    WorkerDisconnected,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure reported by a [`ModelLoader`](crate::ModelLoader).
///
/// Stays on the worker thread; the real-time side only ever sees the
/// resulting [`LoadOutcome`](crate::LoadOutcome).
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to parse model: {0}")]
    Parse(String),

    #[error("Unsupported model: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
