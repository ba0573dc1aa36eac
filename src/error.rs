//! Error types for conversion operations
//!
//! Rendering itself never fails: every structural oddity in a document has a
//! defined fallback rendering. Errors only come from the layers around the
//! renderer (decoding input bytes, reading and writing files, setting up the
//! batch worker pool).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur around HTML to Markdown conversion
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Input bytes are invalid for the detected charset, or the charset is unknown
    #[error("Encoding error: {0}")]
    EncodingError(String),
    /// Invalid input (for example a batch input path that is not a directory)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory the operation was applied to
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ConversionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConversionError::Io {
            path: path.into(),
            source,
        }
    }
}
