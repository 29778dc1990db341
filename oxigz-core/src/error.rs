//! Error types for OxiGz operations.
//!
//! Every failure in the decode and encode paths is reported through a single
//! [`GzError`]. Variants are grouped into the categories returned by
//! [`GzError::kind`], which the CLI uses when it needs to tell a corrupt file
//! apart from a bad invocation.

use std::fmt;
use std::io;
use thiserror::Error;

/// Broad category of a [`GzError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad command-line usage or unusable input path.
    Usage,
    /// The stream is not a conformant gzip member.
    Format,
    /// The payload decompressed but does not match the trailer.
    Integrity,
    /// An operation was invoked in the wrong state.
    State,
    /// Underlying read/write failure or short read.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Usage => "usage",
            Self::Format => "format",
            Self::Integrity => "integrity",
            Self::State => "state",
            Self::Io => "I/O",
        };
        f.write_str(name)
    }
}

/// The main error type for OxiGz operations.
#[derive(Debug, Error)]
pub enum GzError {
    /// I/O error from underlying reader/writer.
    #[error("I/O exception: {0}")]
    Io(#[from] io::Error),

    /// Invalid command-line usage.
    #[error("{message}")]
    Usage {
        /// Description of the usage problem.
        message: String,
    },

    /// The first two bytes are not the gzip magic number.
    #[error("Invalid GZIP magic number: found [{:#04x}, {:#04x}]", .found[0], .found[1])]
    BadMagic {
        /// Actual magic bytes found.
        found: [u8; 2],
    },

    /// Compression method other than DEFLATE.
    #[error("Unsupported compression method: {method}")]
    UnsupportedMethod {
        /// The method byte from the header.
        method: u8,
    },

    /// One of the three reserved flag bits is set.
    #[error("Reserved flags are set: {flags:#04x}")]
    ReservedFlagsSet {
        /// The full flags byte.
        flags: u8,
    },

    /// CRC-32 of the decompressed payload does not match the trailer.
    #[error("Decompression CRC-32 mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    CrcMismatch {
        /// CRC value from the trailer.
        expected: u32,
        /// CRC computed over the output.
        computed: u32,
    },

    /// Decompressed length (mod 2^32) does not match the trailer.
    #[error("Decompressed size mismatch: expected {expected}, got {computed}")]
    SizeMismatch {
        /// ISIZE value from the trailer.
        expected: u32,
        /// Low 32 bits of the decompressed length.
        computed: u32,
    },

    /// Operation invoked in an invalid state.
    #[error("Cannot {operation}: {state}")]
    State {
        /// The rejected operation.
        operation: &'static str,
        /// The state the object was in.
        state: String,
    },

    /// Caller-supplied buffer range does not fit the buffer.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
}

/// Result type alias for OxiGz operations.
pub type Result<T> = std::result::Result<T, GzError>;

impl GzError {
    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a bad magic error.
    pub fn bad_magic(found: [u8; 2]) -> Self {
        Self::BadMagic { found }
    }

    /// Create an unsupported method error.
    pub fn unsupported_method(method: u8) -> Self {
        Self::UnsupportedMethod { method }
    }

    /// Create a reserved flags error.
    pub fn reserved_flags(flags: u8) -> Self {
        Self::ReservedFlagsSet { flags }
    }

    /// Create a CRC mismatch error.
    pub fn crc_mismatch(expected: u32, computed: u32) -> Self {
        Self::CrcMismatch { expected, computed }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(expected: u32, computed: u32) -> Self {
        Self::SizeMismatch { expected, computed }
    }

    /// Create a state error.
    pub fn state(operation: &'static str, state: impl fmt::Display) -> Self {
        Self::State {
            operation,
            state: state.to_string(),
        }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Usage { .. } => ErrorKind::Usage,
            Self::BadMagic { .. } | Self::UnsupportedMethod { .. } | Self::ReservedFlagsSet { .. } => {
                ErrorKind::Format
            }
            Self::CrcMismatch { .. } | Self::SizeMismatch { .. } => ErrorKind::Integrity,
            Self::State { .. } => ErrorKind::State,
            Self::Io(_) | Self::BufferTooSmall { .. } => ErrorKind::Io,
        }
    }
}

impl From<GzError> for io::Error {
    fn from(err: GzError) -> Self {
        match err {
            GzError::Io(e) => e,
            GzError::BufferTooSmall { .. } => io::Error::new(io::ErrorKind::InvalidInput, err),
            other => io::Error::other(other),
        }
    }
}
