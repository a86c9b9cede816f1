//! Error types for wpimport.
//!
//! Two tiers: [`Error`] aborts the whole run, [`ImportError`] is scoped to a
//! single attachment and never stops the batch.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for wpimport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that end an import run.
#[derive(Error, Debug)]
pub enum Error {
    /// The export file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O error when reading the export or touching the media directory.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The sanitized export is still not well-formed XML.
    #[error("Error parsing XML file: {0}")]
    XmlParse(String),

    /// The image store failed outside of a per-item operation.
    #[error("Image store error: {0}")]
    Store(#[from] StoreError),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

/// Errors raised by an image store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File storage failure.
    #[error("file storage error: {0}")]
    Io(#[from] io::Error),

    /// The record is missing a field required for commit.
    #[error("incomplete image record: {0}")]
    Incomplete(&'static str),
}

/// Per-attachment failure while fetching, decoding or persisting.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Network or transport failure.
    #[error("{0}")]
    Http(String),

    /// The origin answered with a non-success status.
    #[error("HTTP {status} for url: {url}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The attachment URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The downloaded bytes are not a decodable image.
    #[error("cannot identify image file: {0}")]
    Decode(String),

    /// The store rejected the new record.
    #[error("{0}")]
    Store(#[from] StoreError),
}
