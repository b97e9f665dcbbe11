//! Error types for lexchunk.

use std::io;
use thiserror::Error;

/// Result type alias for lexchunk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while chunking a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading documents or writing chunk logs.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization failed for a document or record.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The layout document is structurally unusable.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A page raster could not be decoded, cropped or encoded.
    #[error("Image error: {0}")]
    Image(String),

    /// The vision model could not be reached or returned a transport-level failure.
    #[error("Vision model error: {0}")]
    Vision(String),

    /// The vision model answered, but not with the `{"flowchart": bool, "text": string}`
    /// object the figure pass relies on.
    #[error("Vision model reply for page {page}, figure {region} violates the JSON contract: {message}")]
    VisionContract {
        /// Page the figure came from (1-indexed)
        page: u32,
        /// Figure index within the page
        region: usize,
        /// Parser message
        message: String,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether retrying the same document may succeed.
    ///
    /// Vision output is not schema-enforced at the transport level, so both
    /// transport failures and contract violations are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Vision(_) | Error::VisionContract { .. })
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
