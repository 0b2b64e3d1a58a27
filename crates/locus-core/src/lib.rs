//! Core library for locating field values in OCR-derived document text.
//!
//! This crate provides:
//! - Geometry primitives over axis-aligned line polygons
//! - A spatial index for directional nearest-neighbor lookup
//! - Label (directional) and row (aligned, tie-broken) field extraction
//! - Document, rule set, and configuration models loadable from JSON

pub mod error;
pub mod extraction;
pub mod geometry;
pub mod index;
pub mod models;

pub use error::{ExtractionError, LocusError, Result};
pub use extraction::{ExtractedField, ExtractionReport, Extractor, FieldOutcome};
pub use geometry::{BoundingPolygon, Point};
pub use index::{QuadTree, QuadTreeNode};
pub use models::config::{ExtractionConfig, LocusConfig, DEFAULT_MAX_DEPTH, ROW_TOLERANCE};
pub use models::document::{StandardizedLine, StandardizedPage, StandardizedText};
pub use models::rule::{
    Direction, ExtractionRule, LabelRule, RowPosition, RowRule, RuleSet, Tiebreaker,
};
