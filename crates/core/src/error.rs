//! Error types for PowerPoint to markdown conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file format is not supported or could not be detected.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// A part the package must contain is absent.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),
}
