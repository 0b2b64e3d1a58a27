//! Extract command - run a rule set against a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use locus_core::{ExtractionReport, Extractor, FieldOutcome, RuleSet, StandardizedText};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Standardized text document (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Rule set file (JSON)
    #[arg(short, long)]
    rules: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Fail if any rule's anchor is missing from the document
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let document = StandardizedText::from_file(&args.input)?;
    let rules = RuleSet::from_file(&args.rules)?;

    let extractor = Extractor::with_config(&document, &config.extraction);
    let report = extractor.extract_all(&rules);

    info!(
        "Extracted {}/{} fields in {:?}",
        report.found_count(),
        report.fields.len(),
        start.elapsed()
    );

    let output = format_report(&report, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.strict && report.failed_count() > 0 {
        anyhow::bail!(
            "{} of {} rules could not be applied",
            report.failed_count(),
            report.fields.len()
        );
    }

    Ok(())
}

pub fn format_report(report: &ExtractionReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

/// Short status label for a field outcome.
pub fn status_label(outcome: &FieldOutcome) -> &'static str {
    match outcome {
        FieldOutcome::Found { .. } => "found",
        FieldOutcome::Absent => "absent",
        FieldOutcome::Failed { .. } => "failed",
    }
}

fn format_csv(report: &ExtractionReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id", "status", "text", "min_x", "min_y", "max_x", "max_y", "error",
    ])?;

    for field in &report.fields {
        let (text, bounds, error) = match &field.outcome {
            FieldOutcome::Found { line } => {
                let (min, max) = (line.bounding_polygon.min(), line.bounding_polygon.max());
                let bounds = [min.x, min.y, max.x, max.y].map(|v| v.to_string());
                (line.text.as_str(), bounds, "")
            }
            FieldOutcome::Absent => ("", Default::default(), ""),
            FieldOutcome::Failed { reason } => ("", Default::default(), reason.as_str()),
        };

        wtr.write_record([
            field.id.as_str(),
            status_label(&field.outcome),
            text,
            bounds[0].as_str(),
            bounds[1].as_str(),
            bounds[2].as_str(),
            bounds[3].as_str(),
            error,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &ExtractionReport) -> String {
    let mut output = String::new();

    for field in &report.fields {
        let value = match &field.outcome {
            FieldOutcome::Found { line } => line.text.clone(),
            FieldOutcome::Absent => "(not present)".to_string(),
            FieldOutcome::Failed { reason } => format!("error: {}", reason),
        };
        output.push_str(&format!("{}: {}\n", field.id, value));
    }

    output.push_str(&format!(
        "\n{} found, {} absent, {} failed\n",
        report.found_count(),
        report.fields.len() - report.found_count() - report.failed_count(),
        report.failed_count()
    ));

    output
}
