//! Error types for the docs module
//!
//! This module defines custom error types using thiserror for the comment
//! collection, comment sources, and the XML tree they are built on.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while turning XML text into an owned tree
#[derive(Error, Debug)]
pub enum XmlTreeError {
    /// The underlying reader rejected the markup
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),
    /// An attribute was malformed (duplicate, unquoted, ...)
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    /// An attribute value held a bad entity reference
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// UTF-8 string conversion failed
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// The markup is readable but not a single-rooted document
    #[error("{0}")]
    Structure(String),
}

/// A single source that could not be written back to disk
#[derive(Error, Debug)]
#[error("failed to save {path:?}: {source}")]
pub struct SaveFailure {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Main error type for comment collection operations
#[derive(Error, Debug)]
pub enum DocsError {
    /// Identifier string that cannot be parsed
    #[error("Malformed identifier '{id}': {reason}")]
    MalformedIdentifier { id: String, reason: String },

    /// A comments file that is not well-formed or lacks `doc/members`
    #[error("Invalid comments document {path:?}: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: XmlTreeError,
    },

    /// IO errors reading or writing a source's origin path
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more sources failed to save; the rest were still attempted
    #[error("{} comments file(s) could not be saved", .failures.len())]
    Save { failures: Vec<SaveFailure> },

    /// Member lookup on a collection with no sources
    #[error("The comments file collection is empty")]
    EmptyCollection,

    /// Build settings could not be read
    #[error("Settings error in {path:?}: {message}")]
    Settings { path: PathBuf, message: String },
}

/// Result type alias for docs operations
pub type DocsResult<T> = Result<T, DocsError>;

impl DocsError {
    pub(crate) fn malformed(id: &str, reason: &str) -> Self {
        DocsError::MalformedIdentifier {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Helper trait for converting IO errors with the path they concern
pub trait IoContext<T> {
    fn with_path_context(self, path: &Path) -> DocsResult<T>;
}

impl<T> IoContext<T> for Result<T, std::io::Error> {
    fn with_path_context(self, path: &Path) -> DocsResult<T> {
        self.map_err(|e| DocsError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
