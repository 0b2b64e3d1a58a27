//! Configuration structures for index building and extraction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LocusError, Result};

/// Maximum subdivision depth of the spatial index.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Absolute tolerance, in document units, for two line centers to share a row.
pub const ROW_TOLERANCE: f64 = 0.01;

/// Main configuration for locus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocusConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Row membership tolerance on center `y`.
    pub row_tolerance: f64,

    /// Depth bound handed to the spatial index.
    pub max_depth: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            row_tolerance: ROW_TOLERANCE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ExtractionConfig {
    /// Reject values the extractor cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.row_tolerance.is_finite() || self.row_tolerance <= 0.0 {
            return Err(LocusError::Config(format!(
                "row_tolerance must be a finite positive number, got {}",
                self.row_tolerance
            )));
        }
        Ok(())
    }
}

impl LocusConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.extraction.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
