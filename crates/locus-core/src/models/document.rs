//! Standardized text produced by the upstream OCR step.
//!
//! Page and line order is the recognition order and is meaningful: it drives
//! anchor lookup and every ordinal tie-break.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{BoundingPolygon, Point};

/// One recognized line of text and its extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardizedLine {
    /// Recognized text content.
    pub text: String,

    /// Axis-aligned quadrilateral, corner 0 = min, corner 2 = max.
    pub bounding_polygon: BoundingPolygon,
}

impl StandardizedLine {
    pub fn new(text: impl Into<String>, bounding_polygon: BoundingPolygon) -> Self {
        Self {
            text: text.into(),
            bounding_polygon,
        }
    }

    /// Position of the line for distance and alignment checks.
    pub fn center(&self) -> Point {
        self.bounding_polygon.center()
    }
}

/// A page of lines in recognition order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardizedPage {
    pub lines: Vec<StandardizedLine>,
}

/// A whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardizedText {
    pub pages: Vec<StandardizedPage>,
}

impl StandardizedText {
    /// Parse a document from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// All lines in document order: pages first, then lines within a page.
    pub fn lines(&self) -> impl Iterator<Item = &StandardizedLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|page| page.lines.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_upstream_shape() {
        let json = r#"{
            "pages": [{
                "pageNumber": 1,
                "lines": [{
                    "text": "733mi",
                    "confidence": 0.98,
                    "boundingPolygon": [
                        {"x": 2.005, "y": 4.413},
                        {"x": 2.374, "y": 4.413},
                        {"x": 2.374, "y": 4.541},
                        {"x": 2.005, "y": 4.541}
                    ]
                }]
            }]
        }"#;

        let doc = StandardizedText::from_json(json).unwrap();
        assert_eq!(doc.line_count(), 1);
        let line = doc.lines().next().unwrap();
        assert_eq!(line.text, "733mi");
        assert_eq!(
            line.bounding_polygon,
            BoundingPolygon::from_rect(2.005, 4.413, 2.374, 4.541)
        );
    }

    #[test]
    fn test_lines_follow_page_then_line_order() {
        let rect = BoundingPolygon::from_rect(0.0, 0.0, 1.0, 1.0);
        let doc = StandardizedText {
            pages: vec![
                StandardizedPage {
                    lines: vec![
                        StandardizedLine::new("a", rect),
                        StandardizedLine::new("b", rect),
                    ],
                },
                StandardizedPage::default(),
                StandardizedPage {
                    lines: vec![StandardizedLine::new("c", rect)],
                },
            ],
        };

        let texts: Vec<&str> = doc.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_polygon_must_have_four_points() {
        let json = r#"{"pages": [{"lines": [{
            "text": "x",
            "boundingPolygon": [{"x": 0, "y": 0}, {"x": 1, "y": 0}, {"x": 1, "y": 1}]
        }]}]}"#;
        assert!(StandardizedText::from_json(json).is_err());
    }
}
