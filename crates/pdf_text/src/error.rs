//! Error type for PDF text extraction.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    /// Input could not be read, or output could not be written.
    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes were read but do not form a PDF that lopdf can load.
    #[error("File is not a valid PDF: '{}': {reason}", path.display())]
    InvalidPdf { path: PathBuf, reason: String },

    /// A single page could not be extracted. Never returned from a whole-document
    /// extraction; the page contributes an empty string instead.
    #[error("Failed to extract text from page {page}: {reason}")]
    Page { page: u32, reason: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
