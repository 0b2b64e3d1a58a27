//! Query command - run one ad-hoc rule against a document.

use std::path::PathBuf;

use clap::Args;
use console::style;

use locus_core::{
    Direction, ExtractionRule, Extractor, LabelRule, RowPosition, RowRule, StandardizedText,
    Tiebreaker,
};

use super::load_config;

/// Arguments for the query command.
#[derive(Args)]
pub struct QueryArgs {
    /// Standardized text document (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Anchor text to look for (case-insensitive substring)
    #[arg(short, long)]
    anchor: String,

    /// Nearest line in this direction from the anchor
    #[arg(long, value_enum, conflicts_with = "row", required_unless_present = "row")]
    label: Option<DirectionArg>,

    /// Line on this side of the anchor within its row
    #[arg(long, value_enum)]
    row: Option<SideArg>,

    /// Which row candidate to pick
    #[arg(short, long, value_enum, default_value = "first", requires = "row")]
    tiebreaker: TiebreakerArg,

    /// Print the matched line as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DirectionArg {
    Above,
    Below,
    Left,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Above => Direction::Above,
            DirectionArg::Below => Direction::Below,
            DirectionArg::Left => Direction::Left,
            DirectionArg::Right => Direction::Right,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SideArg {
    Left,
    Right,
}

impl From<SideArg> for RowPosition {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Left => RowPosition::Left,
            SideArg::Right => RowPosition::Right,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum TiebreakerArg {
    First,
    Second,
    Last,
}

impl From<TiebreakerArg> for Tiebreaker {
    fn from(arg: TiebreakerArg) -> Self {
        match arg {
            TiebreakerArg::First => Tiebreaker::First,
            TiebreakerArg::Second => Tiebreaker::Second,
            TiebreakerArg::Last => Tiebreaker::Last,
        }
    }
}

impl QueryArgs {
    fn rule(&self) -> anyhow::Result<ExtractionRule> {
        match (self.label, self.row) {
            (Some(direction), None) => {
                Ok(LabelRule::new(direction.into(), self.anchor.as_str()).into())
            }
            (None, Some(side)) => Ok(RowRule::new(
                side.into(),
                self.tiebreaker.into(),
                self.anchor.as_str(),
            )
            .into()),
            _ => anyhow::bail!("Specify exactly one of --label or --row"),
        }
    }
}

pub fn run(args: QueryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let rule = args.rule()?;
    let document = StandardizedText::from_file(&args.input)?;
    let extractor = Extractor::with_config(&document, &config.extraction);

    match extractor.extract(&rule)? {
        Some(line) if args.json => println!("{}", serde_json::to_string_pretty(line)?),
        Some(line) => {
            let (min, max) = (line.bounding_polygon.min(), line.bounding_polygon.max());
            println!("{}", line.text);
            println!(
                "{} at ({}, {}) - ({}, {})",
                style("ℹ").blue(),
                min.x,
                min.y,
                max.x,
                max.y
            );
        }
        None if args.json => println!("null"),
        None => println!(
            "{} No line matches the rule around anchor \"{}\"",
            style("ℹ").yellow(),
            args.anchor
        ),
    }

    Ok(())
}
