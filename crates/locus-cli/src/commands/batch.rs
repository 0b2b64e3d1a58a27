//! Batch command - run a rule set across many documents.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use locus_core::{
    ExtractionConfig, ExtractionReport, Extractor, FieldOutcome, RuleSet, StandardizedText,
};

use super::extract::status_label;
use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching standardized text documents (JSON)
    #[arg(required = true)]
    input: String,

    /// Rule set file (JSON)
    #[arg(short, long)]
    rules: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "results.csv")]
    output: PathBuf,

    /// Stop at the first document that cannot be processed
    #[arg(long)]
    fail_fast: bool,
}

/// Result of processing a single document.
struct ProcessResult {
    path: PathBuf,
    report: Option<ExtractionReport>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let rules = RuleSet::from_file(&args.rules)?;

    let files = expand_documents(&args.input)?;

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_single_file(&path, &rules, &config.extraction) {
            Ok(report) => {
                debug!(
                    "{}: {}/{} fields found",
                    path.display(),
                    report.found_count(),
                    report.fields.len()
                );
                results.push(ProcessResult {
                    path,
                    report: Some(report),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.fail_fast {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }

                warn!("Failed to process {}: {}", path.display(), error_msg);
                results.push(ProcessResult {
                    path,
                    report: None,
                    error: Some(error_msg),
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    write_results(&args.output, &results)?;
    println!(
        "{} Results written to {}",
        style("✓").green(),
        args.output.display()
    );

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// JSON documents matching `pattern`. Paths the glob cannot read are logged
/// and skipped.
fn expand_documents(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let files = glob(pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path {}: {}", e.path().display(), e.error());
                None
            }
        })
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();

    Ok(files)
}

fn process_single_file(
    path: &Path,
    rules: &RuleSet,
    config: &ExtractionConfig,
) -> anyhow::Result<ExtractionReport> {
    let document = StandardizedText::from_file(path)?;
    let extractor = Extractor::with_config(&document, config);
    Ok(extractor.extract_all(rules))
}

fn write_results(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["filename", "field", "status", "text", "error"])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match &result.report {
            Some(report) => {
                for field in &report.fields {
                    let text = field.line().map(|line| line.text.as_str()).unwrap_or("");
                    let error = match &field.outcome {
                        FieldOutcome::Failed { reason } => reason.as_str(),
                        _ => "",
                    };
                    wtr.write_record([
                        filename,
                        field.id.as_str(),
                        status_label(&field.outcome),
                        text,
                        error,
                    ])?;
                }
            }
            None => {
                wtr.write_record([
                    filename,
                    "",
                    "error",
                    "",
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
