//! Error types for the espresso control core.
//!
//! All variants are `Copy` so they can be carried through the control cycle,
//! stored in the configuration status and emitted as events without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Persistence medium errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Access outside the medium's address range.
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },
    /// The medium could not be read.
    ReadFailed,
    /// The medium rejected the write.
    WriteFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                offset,
                len,
                capacity,
            } => write!(
                f,
                "access of {len} bytes at offset {offset} exceeds capacity {capacity}"
            ),
            Self::ReadFailed => write!(f, "read failed"),
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl std::error::Error for StorageError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The stored checksum does not match the one computed over the payload.
    Corrupted { stored: u32, computed: u32 },
    /// Fewer bytes than a full record were supplied.
    Truncated { len: usize },
    /// The persistence medium failed.
    Storage(StorageError),
    /// A value is outside its accepted range.
    ValidationFailed(&'static str),
    /// Nothing has been read from storage yet.
    NotLoaded,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted { stored, computed } => write!(
                f,
                "record checksum mismatch (stored {stored:#010x}, computed {computed:#010x})"
            ),
            Self::Truncated { len } => write!(f, "record truncated to {len} bytes"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::ValidationFailed(msg) => write!(f, "invalid setting: {msg}"),
            Self::NotLoaded => write!(f, "configuration not loaded yet"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
