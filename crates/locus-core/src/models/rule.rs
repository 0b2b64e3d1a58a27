//! Declarative field-extraction rules.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Side of the anchor line a label value is searched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Above => "above",
            Direction::Below => "below",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Side of the anchor line within its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPosition {
    Left,
    Right,
}

impl fmt::Display for RowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RowPosition::Left => "left",
            RowPosition::Right => "right",
        })
    }
}

/// Ordinal pick among row candidates, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tiebreaker {
    First,
    Second,
    Last,
}

impl Tiebreaker {
    /// Select one candidate. Out of range picks yield `None`.
    pub fn pick<T: Copy>(&self, candidates: &[T]) -> Option<T> {
        match self {
            Tiebreaker::First => candidates.first().copied(),
            Tiebreaker::Second => candidates.get(1).copied(),
            Tiebreaker::Last => candidates.last().copied(),
        }
    }
}

impl fmt::Display for Tiebreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tiebreaker::First => "first",
            Tiebreaker::Second => "second",
            Tiebreaker::Last => "last",
        })
    }
}

/// The nearest line to the anchor in a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRule {
    /// Caller-chosen field name, used to key results.
    #[serde(default)]
    pub id: String,
    pub position: Direction,
    pub anchor: String,
}

impl LabelRule {
    pub fn new(position: Direction, anchor: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            position,
            anchor: anchor.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// A line sharing the anchor's row, picked by ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRule {
    /// Caller-chosen field name, used to key results.
    #[serde(default)]
    pub id: String,
    pub position: RowPosition,
    pub tiebreaker: Tiebreaker,
    pub anchor: String,
}

impl RowRule {
    pub fn new(position: RowPosition, tiebreaker: Tiebreaker, anchor: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            position,
            tiebreaker,
            anchor: anchor.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Any supported rule, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExtractionRule {
    Label(LabelRule),
    Row(RowRule),
}

impl ExtractionRule {
    pub fn anchor(&self) -> &str {
        match self {
            ExtractionRule::Label(rule) => &rule.anchor,
            ExtractionRule::Row(rule) => &rule.anchor,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ExtractionRule::Label(rule) => &rule.id,
            ExtractionRule::Row(rule) => &rule.id,
        }
    }
}

impl From<LabelRule> for ExtractionRule {
    fn from(rule: LabelRule) -> Self {
        ExtractionRule::Label(rule)
    }
}

impl From<RowRule> for ExtractionRule {
    fn from(rule: RowRule) -> Self {
        ExtractionRule::Row(rule)
    }
}

/// An ordered collection of rules applied to one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<ExtractionRule>,
}

impl RuleSet {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
