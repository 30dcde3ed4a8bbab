//! Error types for DTA file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing DTA files.
///
/// Every error is fatal to the decode or encode call that produced it. A failed
/// decode never yields a partial dataset; a failed encode may leave a partially
/// written stream that the caller must discard.
#[derive(Debug, Error)]
pub enum DtaError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Release byte does not name a supported format version.
    #[error("unsupported format version tag 0x{tag:02x} (expected version 5 or 6)")]
    UnsupportedVersion { tag: u8 },

    /// Variable storage type byte is neither a reserved code nor a string width.
    #[error("unknown type code 0x{code:02x} for variable {index}")]
    UnknownTypeCode { index: usize, code: u8 },

    /// The file violates the format's layout.
    #[error("corrupt DTA file: {message}")]
    CorruptFile { message: String },

    /// Host primitives do not match the layouts the format assumes.
    #[error("unsupported platform: {message}")]
    PlatformUnsupported { message: String },

    /// The dataset handed to the writer cannot be encoded.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for DTA operations.
pub type Result<T> = std::result::Result<T, DtaError>;

impl DtaError {
    /// Create a CorruptFile error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptFile {
            message: message.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a PlatformUnsupported error.
    pub fn platform(message: impl Into<String>) -> Self {
        Self::PlatformUnsupported {
            message: message.into(),
        }
    }

    /// Map a read failure, turning a short read into `CorruptFile`.
    pub(crate) fn from_read(err: std::io::Error, what: &str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::corrupt(format!("unexpected end of file while reading {what}"))
        } else {
            Self::Io(err)
        }
    }
}
