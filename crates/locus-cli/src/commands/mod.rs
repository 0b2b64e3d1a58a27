//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod extract;
pub mod query;

use std::path::Path;

use tracing::debug;

use locus_core::LocusConfig;

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LocusConfig> {
    if let Some(path) = config_path {
        return Ok(LocusConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(LocusConfig::from_file(&default_path)?)
    } else {
        Ok(LocusConfig::default())
    }
}
