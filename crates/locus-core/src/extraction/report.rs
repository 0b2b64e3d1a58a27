//! Per-field results of running a rule set.

use serde::Serialize;

use crate::models::document::StandardizedLine;
use crate::models::rule::ExtractionRule;

/// What a single rule produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldOutcome {
    /// The rule matched a line.
    Found { line: StandardizedLine },
    /// The anchor exists but nothing satisfies the rule's geometry.
    Absent,
    /// The rule could not be applied to this document.
    Failed { reason: String },
}

/// A rule's outcome keyed by its field id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedField {
    /// Rule id, or the anchor text when the rule has none.
    pub id: String,
    pub rule: ExtractionRule,
    #[serde(flatten)]
    pub outcome: FieldOutcome,
}

impl ExtractedField {
    pub fn new(rule: &ExtractionRule, outcome: FieldOutcome) -> Self {
        let id = if rule.id().is_empty() {
            rule.anchor()
        } else {
            rule.id()
        };
        Self {
            id: id.to_string(),
            rule: rule.clone(),
            outcome,
        }
    }

    /// The matched line, if any.
    pub fn line(&self) -> Option<&StandardizedLine> {
        match &self.outcome {
            FieldOutcome::Found { line } => Some(line),
            FieldOutcome::Absent | FieldOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, FieldOutcome::Failed { .. })
    }
}

/// All fields extracted from one document, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub fields: Vec<ExtractedField>,
}

impl ExtractionReport {
    /// First field with the given id.
    pub fn get(&self, id: &str) -> Option<&ExtractedField> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Text of the line matched for `id`.
    pub fn value(&self, id: &str) -> Option<&str> {
        self.get(id)
            .and_then(ExtractedField::line)
            .map(|line| line.text.as_str())
    }

    pub fn found_count(&self) -> usize {
        self.fields.iter().filter(|f| f.line().is_some()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_failed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingPolygon;
    use crate::models::rule::{Direction, LabelRule};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_id_falls_back_to_anchor() {
        let rule: ExtractionRule = LabelRule::new(Direction::Below, "distance").into();
        let field = ExtractedField::new(&rule, FieldOutcome::Absent);
        assert_eq!(field.id, "distance");
    }

    #[test]
    fn test_report_serialization() {
        let rule: ExtractionRule = LabelRule::new(Direction::Below, "distance")
            .with_id("miles")
            .into();
        let line = StandardizedLine::new("733mi", BoundingPolygon::from_rect(2.0, 4.0, 3.0, 5.0));
        let report = ExtractionReport {
            fields: vec![ExtractedField::new(&rule, FieldOutcome::Found { line })],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["fields"][0]["id"], "miles");
        assert_eq!(json["fields"][0]["status"], "found");
        assert_eq!(json["fields"][0]["rule"]["type"], "label");
        assert_eq!(json["fields"][0]["line"]["text"], "733mi");
        assert_eq!(report.found_count(), 1);
        assert_eq!(report.failed_count(), 0);
    }
}
