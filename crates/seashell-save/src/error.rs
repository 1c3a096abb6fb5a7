//! Error types for the save format.

use std::fmt;
use std::io;

use seashell_core::StateError;

/// Errors that can occur while writing or reading a save.
#[derive(Debug)]
pub enum SaveError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The input does not start with the expected `b"SHEL"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the input.
        found: u8,
    },
    /// The body could not be decoded (truncated or corrupt data).
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The stored checksum does not match the body.
    ChecksumMismatch {
        /// Checksum read from the input.
        stored: u64,
        /// Checksum computed over the body.
        computed: u64,
    },
    /// The decoded state does not fit the catalog.
    State(StateError),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"SHEL\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::Malformed { detail } => write!(f, "malformed save: {detail}"),
            Self::ChecksumMismatch { stored, computed } => write!(
                f,
                "checksum mismatch: stored={stored:#018x}, computed={computed:#018x}"
            ),
            Self::State(e) => write!(f, "saved state rejected: {e}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::State(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SaveError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<StateError> for SaveError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}
