//! Config command - inspect, create and check extraction settings.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use locus_core::{ExtractionConfig, LocusConfig};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration and where it came from
    Show,

    /// Write a configuration file, optionally overriding defaults
    Init(InitArgs),

    /// Print one value, e.g. "extraction.row_tolerance"
    Get { key: String },

    /// Validate a configuration file without running an extraction
    Check {
        /// File to check (defaults to --config, then the user config)
        path: Option<PathBuf>,
    },

    /// Show the user configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,

    /// Row membership tolerance on center y
    #[arg(long)]
    row_tolerance: Option<f64>,

    /// Depth bound of the spatial index
    #[arg(long)]
    max_depth: Option<usize>,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Get { key } => get_config(config_path, &key),
        ConfigCommand::Check { path } => {
            check_config(path.as_deref().or(config_path.map(Path::new)))
        }
        ConfigCommand::Path => show_path(),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("locus")
        .join("config.json")
}

/// The file the effective configuration is read from, if any.
fn source_path(config_path: Option<&str>) -> Option<PathBuf> {
    match config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => Some(default_config_path()).filter(|p| p.exists()),
    }
}

fn show_config(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    match source_path(config_path) {
        Some(path) => println!("{} Loaded {}", style("✓").green(), path.display()),
        None => println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        ),
    }

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    let defaults = ExtractionConfig::default();
    let config = LocusConfig {
        extraction: ExtractionConfig {
            row_tolerance: args.row_tolerance.unwrap_or(defaults.row_tolerance),
            max_depth: args.max_depth.unwrap_or(defaults.max_depth),
        },
    };
    // Never write a file that `--config` would later refuse.
    config.extraction.validate()?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(&output_path)?;
    debug!("Wrote {:?} to {}", config.extraction, output_path.display());

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(config_path: Option<&str>, key: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let value = lookup(&serde_json::to_value(&config)?, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

/// Walk a dotted key through nested JSON objects.
fn lookup(json: &serde_json::Value, key: &str) -> Option<serde_json::Value> {
    key.split('.')
        .try_fold(json, |current, part| current.get(part))
        .cloned()
}

fn check_config(path: Option<&Path>) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path(),
    };

    if !path.exists() {
        anyhow::bail!("No configuration file at {}", path.display());
    }

    let config = LocusConfig::from_file(&path)
        .map_err(|e| anyhow::anyhow!("{} is invalid: {}", path.display(), e))?;

    println!(
        "{} {} is valid (row_tolerance {}, max_depth {})",
        style("✓").green(),
        path.display(),
        config.extraction.row_tolerance,
        config.extraction.max_depth
    );

    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!("Run 'locus config init' to create one.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_key() {
        let json = json!({"extraction": {"row_tolerance": 0.5, "max_depth": 3}});

        assert_eq!(lookup(&json, "extraction.max_depth"), Some(json!(3)));
        assert_eq!(lookup(&json, "extraction"), Some(json["extraction"].clone()));
        assert_eq!(lookup(&json, "extraction.missing"), None);
    }
}
