//! Error types for md2docx.

use thiserror::Error;

/// Result type for md2docx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during Markdown to DOCX conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// Error occurred during file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error occurred while writing the DOCX package.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The document model could not be serialized.
    #[error("Failed to write DOCX: {0}")]
    DocxWrite(String),

    /// A custom style definition could not be loaded.
    #[error("Invalid style definition: {0}")]
    Style(String),

    /// An image reference could not be loaded.
    ///
    /// The converter recovers from this with a placeholder; it only reaches
    /// callers that use the image resolver directly.
    #[error("Failed to load image '{url}': {reason}")]
    ImageFetch { url: String, reason: String },

    /// Error occurred during conversion or serialization.
    #[error("Conversion error: {0}")]
    Conversion(String),
}

impl Error {
    pub(crate) fn image_fetch(url: &str, reason: impl ToString) -> Self {
        Error::ImageFetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
