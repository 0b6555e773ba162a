//! Fixed-capacity model path.
//!
//! Paths travel inside cross-thread messages and are copied into the
//! real-time side on every swap, so they are stored inline rather than in a
//! `String`.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// Maximum path storage in bytes. Paths must be strictly shorter.
pub const MAX_PATH_LEN: usize = 1024;

/// Inline, allocation-free UTF-8 path.
#[derive(Clone, Copy)]
pub struct ModelPath {
    len: u16,
    bytes: [u8; MAX_PATH_LEN],
}

impl ModelPath {
    /// The empty path, meaning "no model".
    pub const fn empty() -> Self {
        Self {
            len: 0,
            bytes: [0; MAX_PATH_LEN],
        }
    }

    pub fn new(path: &str) -> Result<Self> {
        let len = path.len();
        if len >= MAX_PATH_LEN {
            return Err(Error::PathTooLong {
                len,
                max: MAX_PATH_LEN - 1,
            });
        }
        let mut bytes = [0; MAX_PATH_LEN];
        bytes[..len].copy_from_slice(path.as_bytes());
        Ok(Self {
            len: len as u16,
            bytes,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let s = path
            .to_str()
            .ok_or_else(|| Error::InvalidPath(path.to_string_lossy().into_owned()))?;
        Self::new(s)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // Built only from &str, truncation never happens.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }

    #[inline]
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for ModelPath {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ModelPath {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ModelPath {}

impl fmt::Debug for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelPath").field(&self.as_str()).finish()
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
