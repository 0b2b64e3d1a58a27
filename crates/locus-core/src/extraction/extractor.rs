//! Label and row extraction over one document.

use tracing::debug;

use super::report::{ExtractedField, ExtractionReport, FieldOutcome};
use super::Result;
use crate::error::ExtractionError;
use crate::geometry::{bounding_box_of, BoundingPolygon};
use crate::index::QuadTree;
use crate::models::config::ExtractionConfig;
use crate::models::document::{StandardizedLine, StandardizedText};
use crate::models::rule::{ExtractionRule, LabelRule, RowPosition, RowRule, RuleSet};

/// Field extractor bound to a single document.
///
/// The spatial index is built once at construction. Extraction calls only
/// read from it, so one extractor can serve any number of rules, from any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Extractor<'a> {
    text: &'a StandardizedText,
    index: QuadTree<'a>,
    row_tolerance: f64,
}

impl<'a> Extractor<'a> {
    /// Build an extractor with default settings.
    pub fn new(text: &'a StandardizedText) -> Self {
        Self::with_config(text, &ExtractionConfig::default())
    }

    /// Build an extractor with explicit settings.
    pub fn with_config(text: &'a StandardizedText, config: &ExtractionConfig) -> Self {
        let bounding_box = bounding_box_of(text.lines().map(|line| &line.bounding_polygon))
            .unwrap_or_else(BoundingPolygon::empty);

        let mut index = QuadTree::new(bounding_box, config.max_depth);
        for line in text.lines() {
            index.insert(line);
        }

        debug!(
            pages = text.pages.len(),
            lines = index.len(),
            "built spatial index"
        );

        Self {
            text,
            index,
            row_tolerance: config.row_tolerance,
        }
    }

    /// The document this extractor reads from.
    pub fn document(&self) -> &'a StandardizedText {
        self.text
    }

    pub fn index(&self) -> &QuadTree<'a> {
        &self.index
    }

    /// First line, in page then line order, whose text contains `anchor`
    /// ignoring case.
    pub fn find_anchor_line(&self, anchor: &str) -> Option<&'a StandardizedLine> {
        let text: &'a StandardizedText = self.text;
        let needle = anchor.to_lowercase();
        text.lines()
            .find(|line| line.text.to_lowercase().contains(&needle))
    }

    /// Every line whose center `y` is within the row tolerance of the anchor's,
    /// in document order. The anchor itself is always part of its row, whatever
    /// the tolerance.
    pub fn find_row(&self, anchor_line: &StandardizedLine) -> Option<Vec<&'a StandardizedLine>> {
        let text: &'a StandardizedText = self.text;
        let anchor_y = anchor_line.center().y;
        let row: Vec<&'a StandardizedLine> = text
            .lines()
            .filter(|line| {
                std::ptr::eq(*line, anchor_line)
                    || (line.center().y - anchor_y).abs() < self.row_tolerance
            })
            .collect();

        (!row.is_empty()).then_some(row)
    }

    /// Nearest line on the rule's side of the anchor.
    pub fn extract_label(&self, rule: &LabelRule) -> Result<Option<&'a StandardizedLine>> {
        let anchor_line = self.require_anchor(&rule.anchor)?;
        let found = self.index.search_adjacent_lines(anchor_line, rule.position);

        debug!(
            anchor = %rule.anchor,
            position = %rule.position,
            found = found.map(|line| line.text.as_str()),
            "label extraction"
        );

        Ok(found)
    }

    /// Line on the rule's side of the anchor within the anchor's row, chosen
    /// by the rule's tiebreaker.
    pub fn extract_row(&self, rule: &RowRule) -> Result<Option<&'a StandardizedLine>> {
        let anchor_line = self.require_anchor(&rule.anchor)?;
        let anchor_x = anchor_line.center().x;

        let row = self
            .find_row(anchor_line)
            .ok_or_else(|| ExtractionError::RowNotFound {
                anchor: rule.anchor.clone(),
            })?;

        let candidates: Vec<&'a StandardizedLine> = row
            .into_iter()
            .filter(|line| {
                let x = line.center().x;
                match rule.position {
                    RowPosition::Left => x < anchor_x,
                    RowPosition::Right => x > anchor_x,
                }
            })
            .collect();

        let found = rule.tiebreaker.pick(&candidates);

        debug!(
            anchor = %rule.anchor,
            position = %rule.position,
            tiebreaker = %rule.tiebreaker,
            candidates = candidates.len(),
            found = found.map(|line| line.text.as_str()),
            "row extraction"
        );

        Ok(found)
    }

    /// Run any rule.
    pub fn extract(&self, rule: &ExtractionRule) -> Result<Option<&'a StandardizedLine>> {
        match rule {
            ExtractionRule::Label(label) => self.extract_label(label),
            ExtractionRule::Row(row) => self.extract_row(row),
        }
    }

    /// Run every rule of a set independently.
    ///
    /// A missing anchor is recorded against its own field and does not stop
    /// the remaining rules.
    pub fn extract_all(&self, rules: &RuleSet) -> ExtractionReport {
        let fields = rules
            .rules
            .iter()
            .map(|rule| {
                let outcome = match self.extract(rule) {
                    Ok(Some(line)) => FieldOutcome::Found { line: line.clone() },
                    Ok(None) => FieldOutcome::Absent,
                    Err(e) => FieldOutcome::Failed {
                        reason: e.to_string(),
                    },
                };
                ExtractedField::new(rule, outcome)
            })
            .collect();

        ExtractionReport { fields }
    }

    fn require_anchor(&self, anchor: &str) -> Result<&'a StandardizedLine> {
        self.find_anchor_line(anchor)
            .ok_or_else(|| ExtractionError::AnchorNotFound {
                anchor: anchor.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::StandardizedPage;
    use crate::models::rule::{Direction, Tiebreaker};
    use pretty_assertions::assert_eq;

    fn line(text: &str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> StandardizedLine {
        StandardizedLine::new(text, BoundingPolygon::from_rect(min_x, min_y, max_x, max_y))
    }

    fn document(pages: Vec<Vec<StandardizedLine>>) -> StandardizedText {
        StandardizedText {
            pages: pages
                .into_iter()
                .map(|lines| StandardizedPage { lines })
                .collect(),
        }
    }

    fn text_of(found: Option<&StandardizedLine>) -> Option<&str> {
        found.map(|line| line.text.as_str())
    }

    #[test]
    fn test_anchor_lookup_is_case_insensitive_first_match() {
        let doc = document(vec![
            vec![line("Invoice Total", 0.0, 0.0, 2.0, 0.2)],
            vec![line("TOTAL due", 0.0, 1.0, 2.0, 1.2)],
        ]);
        let extractor = Extractor::new(&doc);

        let first = extractor.find_anchor_line("total").unwrap();
        assert_eq!(first.text, "Invoice Total");
        // Same answer on every call.
        assert!(std::ptr::eq(first, extractor.find_anchor_line("TOTAL").unwrap()));
        assert_eq!(extractor.find_anchor_line("missing"), None);
    }

    #[test]
    fn test_label_below_picks_closer_line() {
        let doc = document(vec![vec![
            line("Shipper", 1.0, 1.0, 2.0, 1.2),
            line("far", 1.0, 3.0, 2.0, 3.2),
            line("near", 1.0, 2.0, 2.0, 2.2),
        ]]);
        let extractor = Extractor::new(&doc);

        let found = extractor
            .extract_label(&LabelRule::new(Direction::Below, "shipper"))
            .unwrap();
        assert_eq!(text_of(found), Some("near"));
    }

    #[test]
    fn test_label_without_neighbor_is_absent() {
        let doc = document(vec![vec![
            line("Footer", 1.0, 9.0, 2.0, 9.2),
            line("Header", 1.0, 1.0, 2.0, 1.2),
        ]]);
        let extractor = Extractor::new(&doc);

        let found = extractor
            .extract_label(&LabelRule::new(Direction::Below, "footer"))
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_missing_anchor_is_an_error() {
        let doc = document(vec![vec![line("Shipper", 1.0, 1.0, 2.0, 1.2)]]);
        let extractor = Extractor::new(&doc);

        let label = extractor.extract_label(&LabelRule::new(Direction::Below, "consignee"));
        assert_eq!(
            label,
            Err(ExtractionError::AnchorNotFound {
                anchor: "consignee".to_string()
            })
        );

        let row = extractor.extract_row(&RowRule::new(
            RowPosition::Right,
            Tiebreaker::First,
            "consignee",
        ));
        assert_eq!(
            row,
            Err(ExtractionError::AnchorNotFound {
                anchor: "consignee".to_string()
            })
        );
    }

    #[test]
    fn test_row_tolerance_boundary() {
        let doc = document(vec![vec![
            line("Anchor", 0.0, 1.0, 1.0, 1.2),
            line("close", 2.0, 1.005, 3.0, 1.205),
            line("apart", 4.0, 1.02, 5.0, 1.22),
        ]]);
        let extractor = Extractor::new(&doc);
        let anchor = extractor.find_anchor_line("anchor").unwrap();

        let row = extractor.find_row(anchor).unwrap();
        let texts: Vec<&str> = row.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Anchor", "close"]);
    }

    #[test]
    fn test_row_always_contains_anchor() {
        let doc = document(vec![vec![line("Lonely", 0.0, 0.0, 1.0, 0.2)]]);
        let extractor = Extractor::new(&doc);
        let anchor = extractor.find_anchor_line("lonely").unwrap();

        let row = extractor.find_row(anchor).unwrap();
        assert_eq!(row.len(), 1);
        assert!(std::ptr::eq(row[0], anchor));
    }

    #[test]
    fn test_row_tiebreakers_follow_document_order() {
        // Document order differs from left-to-right order on purpose.
        let doc = document(vec![vec![
            line("Weight", 0.0, 1.0, 1.0, 1.2),
            line("A", 2.0, 1.0, 2.5, 1.2),
            line("C", 6.0, 1.0, 6.5, 1.2),
            line("B", 4.0, 1.0, 4.5, 1.2),
            line("below", 2.0, 2.0, 2.5, 2.2),
        ]]);
        let extractor = Extractor::new(&doc);

        let pick = |tiebreaker| {
            let rule = RowRule::new(RowPosition::Right, tiebreaker, "weight");
            text_of(extractor.extract_row(&rule).unwrap())
        };
        assert_eq!(pick(Tiebreaker::First), Some("A"));
        assert_eq!(pick(Tiebreaker::Second), Some("C"));
        assert_eq!(pick(Tiebreaker::Last), Some("B"));
    }

    #[test]
    fn test_row_left_and_out_of_range() {
        let doc = document(vec![vec![
            line("Label", 0.0, 1.0, 1.0, 1.2),
            line("Total", 3.0, 1.0, 4.0, 1.2),
        ]]);
        let extractor = Extractor::new(&doc);

        let left_first = RowRule::new(RowPosition::Left, Tiebreaker::First, "total");
        assert_eq!(
            text_of(extractor.extract_row(&left_first).unwrap()),
            Some("Label")
        );

        let left_second = RowRule::new(RowPosition::Left, Tiebreaker::Second, "total");
        assert_eq!(extractor.extract_row(&left_second).unwrap(), None);

        let right_last = RowRule::new(RowPosition::Right, Tiebreaker::Last, "total");
        assert_eq!(extractor.extract_row(&right_last).unwrap(), None);
    }

    #[test]
    fn test_custom_row_tolerance() {
        let doc = document(vec![vec![
            line("Anchor", 0.0, 1.0, 1.0, 1.2),
            line("loose", 2.0, 1.03, 3.0, 1.23),
        ]]);
        let config = ExtractionConfig {
            row_tolerance: 0.05,
            ..Default::default()
        };
        let extractor = Extractor::with_config(&doc, &config);

        let rule = RowRule::new(RowPosition::Right, Tiebreaker::First, "anchor");
        assert_eq!(text_of(extractor.extract_row(&rule).unwrap()), Some("loose"));
    }

    #[test]
    fn test_zero_tolerance_keeps_anchor_in_row() {
        let doc = document(vec![vec![
            line("Weight", 0.0, 1.0, 1.0, 1.2),
            line("42,000 lbs", 2.0, 1.0, 3.0, 1.2),
        ]]);
        let config = ExtractionConfig {
            row_tolerance: 0.0,
            ..Default::default()
        };
        let extractor = Extractor::with_config(&doc, &config);
        let anchor = extractor.find_anchor_line("weight").unwrap();

        let row = extractor.find_row(anchor).unwrap();
        assert_eq!(row.len(), 1);
        assert!(std::ptr::eq(row[0], anchor));

        let rule = RowRule::new(RowPosition::Right, Tiebreaker::First, "weight");
        assert_eq!(extractor.extract_row(&rule), Ok(None));
    }

    #[test]
    fn test_empty_document() {
        let doc = StandardizedText::default();
        let extractor = Extractor::new(&doc);

        assert!(extractor.index().is_empty());
        assert!(matches!(
            extractor.extract_label(&LabelRule::new(Direction::Below, "anything")),
            Err(ExtractionError::AnchorNotFound { .. })
        ));
    }

    #[test]
    fn test_extract_dispatches_by_rule_type() {
        let doc = document(vec![vec![
            line("Rate", 0.0, 1.0, 1.0, 1.2),
            line("$2.50", 2.0, 1.0, 3.0, 1.2),
            line("per mile", 0.0, 2.0, 1.0, 2.2),
        ]]);
        let extractor = Extractor::new(&doc);

        let label: ExtractionRule = LabelRule::new(Direction::Below, "rate").into();
        let row: ExtractionRule = RowRule::new(RowPosition::Right, Tiebreaker::First, "rate").into();

        assert_eq!(text_of(extractor.extract(&label).unwrap()), Some("per mile"));
        assert_eq!(text_of(extractor.extract(&row).unwrap()), Some("$2.50"));
    }

    #[test]
    fn test_extract_all_reports_each_field() {
        let doc = document(vec![vec![
            line("Rate", 0.0, 1.0, 1.0, 1.2),
            line("$2.50", 2.0, 1.0, 3.0, 1.2),
        ]]);
        let extractor = Extractor::new(&doc);
        let rules = RuleSet {
            rules: vec![
                RowRule::new(RowPosition::Right, Tiebreaker::First, "rate")
                    .with_id("rate")
                    .into(),
                LabelRule::new(Direction::Below, "rate").with_id("rate_note").into(),
                LabelRule::new(Direction::Below, "fuel").into(),
            ],
        };

        let report = extractor.extract_all(&rules);
        assert_eq!(report.fields.len(), 3);
        assert_eq!(report.value("rate"), Some("$2.50"));
        assert_eq!(report.get("rate_note").unwrap().outcome, FieldOutcome::Absent);
        assert_eq!(
            report.get("fuel").unwrap().outcome,
            FieldOutcome::Failed {
                reason: "anchor line \"fuel\" not found".to_string()
            }
        );
    }
}
