//! Error types for the locus-core library.

use thiserror::Error;

/// Main error type for the locus library.
#[derive(Error, Debug)]
pub enum LocusError {
    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document or rule set JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by an extraction call.
///
/// Only caller configuration mistakes end up here. A rule that is well formed
/// but finds nothing in the document yields `None` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The anchor text does not occur anywhere in the document.
    #[error("anchor line \"{anchor}\" not found")]
    AnchorNotFound { anchor: String },

    /// No row could be built around the anchor line.
    #[error("row for anchor line \"{anchor}\" not found")]
    RowNotFound { anchor: String },
}

impl ExtractionError {
    /// The anchor text of the rule that failed.
    pub fn anchor(&self) -> &str {
        match self {
            ExtractionError::AnchorNotFound { anchor } | ExtractionError::RowNotFound { anchor } => {
                anchor
            }
        }
    }
}

/// Result type for the locus library.
pub type Result<T> = std::result::Result<T, LocusError>;
