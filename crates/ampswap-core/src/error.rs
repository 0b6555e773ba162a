//! Error types for ampswap-core.

use thiserror::Error;

/// Error type for ampswap-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid block size: {frames} (max {max})")]
    InvalidBlockSize { frames: usize, max: usize },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
