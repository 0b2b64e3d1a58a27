//! A single region of the spatial index.

use crate::geometry::BoundingPolygon;
use crate::models::document::StandardizedLine;

/// A region holding the lines that lie entirely inside its box, plus optional
/// pre-built child regions.
///
/// Nodes never subdivide themselves. Children only exist when supplied through
/// [`QuadTreeNode::with_children`].
#[derive(Debug, Clone)]
pub struct QuadTreeNode<'a> {
    bounding_box: BoundingPolygon,
    lines: Vec<&'a StandardizedLine>,
    children: Vec<QuadTreeNode<'a>>,
}

impl<'a> QuadTreeNode<'a> {
    /// Create an empty leaf node.
    pub fn new(bounding_box: BoundingPolygon) -> Self {
        Self {
            bounding_box,
            lines: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a node that delegates to the given child regions.
    pub fn with_children(bounding_box: BoundingPolygon, children: Vec<QuadTreeNode<'a>>) -> Self {
        Self {
            bounding_box,
            lines: Vec::new(),
            children,
        }
    }

    pub fn bounding_box(&self) -> &BoundingPolygon {
        &self.bounding_box
    }

    /// Lines stored directly at this node, in insertion order.
    pub fn lines(&self) -> &[&'a StandardizedLine] {
        &self.lines
    }

    pub fn children(&self) -> &[QuadTreeNode<'a>] {
        &self.children
    }

    /// Store `line` here if it fits entirely in this node's box, otherwise in
    /// the first child whose box fully contains it.
    ///
    /// Returns `false` when neither this node nor any child accepted the line;
    /// the line is then not stored anywhere.
    pub fn insert(&mut self, line: &'a StandardizedLine) -> bool {
        if self.bounding_box.contains_polygon(&line.bounding_polygon) {
            self.lines.push(line);
            return true;
        }

        match self
            .children
            .iter_mut()
            .find(|child| child.bounding_box.contains_polygon(&line.bounding_polygon))
        {
            Some(child) => child.insert(line),
            None => false,
        }
    }

    /// Store `line` at this node without any containment check.
    pub(crate) fn push_unchecked(&mut self, line: &'a StandardizedLine) {
        self.lines.push(line);
    }

    /// Number of lines stored in this node and all of its descendants.
    pub fn len(&self) -> usize {
        self.lines.len() + self.children.iter().map(QuadTreeNode::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
