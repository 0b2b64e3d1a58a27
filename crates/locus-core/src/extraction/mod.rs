//! Anchor-based field extraction.

mod extractor;
mod report;

pub use extractor::Extractor;
pub use report::{ExtractedField, ExtractionReport, FieldOutcome};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
