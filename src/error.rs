//! Error types for the conversion pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting SVG documents
#[derive(Error, Debug)]
pub enum Error {
    /// The input file is missing or unreadable
    #[error("Failed to read input {path}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The SVG markup could not be parsed
    #[error("Failed to parse SVG document: {0}")]
    DocumentParse(String),

    /// The background color is not `transparent`, `white`, `black` or `#RRGGBB`
    #[error("Invalid color format: {0}")]
    InvalidColorFormat(String),

    /// The output file could not be written
    #[error("Failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The browser render did not finish within the configured timeout
    #[error("Rendering timed out after {0}ms")]
    RenderTimeout(u64),

    /// The headless browser could not be started
    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Rendering failed after the document was accepted
    #[error("Rendering failed: {0}")]
    Render(String),

    /// No `*.svg` files in the batch directory
    #[error("No SVG files found in {0}")]
    NoInputFiles(PathBuf),

    /// The batch directory could not be listed
    #[error("Failed to search {path} for SVG files: {source}")]
    DirectorySearch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Request parameters out of range
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A preprocessor rule failed to compile
    #[error("Invalid rewrite pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A backend failed to convert the document
    #[error("Conversion failed: {0}")]
    ConversionFailed(#[source] Box<Error>),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The underlying error, looking through `ConversionFailed` wrappers.
    pub fn cause_kind(&self) -> &Error {
        match self {
            Error::ConversionFailed(inner) => inner.cause_kind(),
            other => other,
        }
    }
}
