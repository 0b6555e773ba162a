//! Centralized error type for the ampswap umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] ampswap_core::Error),

    #[error("Model exchange: {0}")]
    Exchange(#[from] ampswap_neural::Error),

    #[error("Config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("No model loader configured")]
    MissingLoader,

    #[error("Notification capacity must be non-zero")]
    InvalidNotificationCapacity,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
