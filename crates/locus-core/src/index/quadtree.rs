//! Root of the spatial index and the directional search over it.

use tracing::{trace, warn};

use super::node::QuadTreeNode;
use crate::geometry::{box_intersects_polygon, BoundingPolygon, Point};
use crate::models::document::StandardizedLine;
use crate::models::rule::Direction;

/// Spatial index owning a root region that spans the whole document.
#[derive(Debug, Clone)]
pub struct QuadTree<'a> {
    root: QuadTreeNode<'a>,
    max_depth: usize,
}

impl<'a> QuadTree<'a> {
    /// Create an index whose root covers `bounding_box`.
    pub fn new(bounding_box: BoundingPolygon, max_depth: usize) -> Self {
        Self::from_root(QuadTreeNode::new(bounding_box), max_depth)
    }

    /// Create an index over an already partitioned root.
    pub fn from_root(root: QuadTreeNode<'a>, max_depth: usize) -> Self {
        Self { root, max_depth }
    }

    pub fn root(&self) -> &QuadTreeNode<'a> {
        &self.root
    }

    /// Depth bound for partitioning. Nodes are never split automatically, so
    /// this only records the limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of lines stored across the whole tree.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Insert a line, keeping it at the root if no region accepts it so that
    /// every inserted line stays searchable.
    pub fn insert(&mut self, line: &'a StandardizedLine) {
        if !self.root.insert(line) {
            warn!(
                text = %line.text,
                "line lies outside every index region, storing it at the root"
            );
            self.root.push_unchecked(line);
        }
    }

    /// Find the line closest to `anchor` whose center lies strictly on the
    /// `direction` side of the anchor's center.
    ///
    /// Distance is the squared euclidean distance between centers. On equal
    /// distance the first line met during a depth-first walk wins, which for
    /// a flat tree is insertion order.
    pub fn search_adjacent_lines(
        &self,
        anchor: &StandardizedLine,
        direction: Direction,
    ) -> Option<&'a StandardizedLine> {
        let mut search = AdjacentSearch {
            anchor,
            anchor_center: anchor.center(),
            direction,
            closest: None,
        };
        search.visit(&self.root);
        search.closest.map(|(line, _)| line)
    }
}

/// Running state of one directional search.
struct AdjacentSearch<'s, 'a> {
    anchor: &'s StandardizedLine,
    anchor_center: Point,
    direction: Direction,
    closest: Option<(&'a StandardizedLine, f64)>,
}

impl<'a> AdjacentSearch<'_, 'a> {
    fn visit(&mut self, node: &QuadTreeNode<'a>) {
        for &line in node.lines() {
            let center = line.center();
            if !is_beyond(self.direction, self.anchor_center, center) {
                continue;
            }

            let distance = center.distance_squared(&self.anchor_center);
            let closer = self.closest.is_none_or(|(_, best)| distance < best);
            if closer {
                trace!(text = %line.text, distance, "new closest candidate");
                self.closest = Some((line, distance));
            }
        }

        for child in node.children() {
            if box_intersects_polygon(&self.anchor.bounding_polygon, child.bounding_box()) {
                self.visit(child);
            }
        }
    }
}

/// Whether `candidate` lies strictly on the `direction` side of `anchor`.
fn is_beyond(direction: Direction, anchor: Point, candidate: Point) -> bool {
    match direction {
        Direction::Above => candidate.y < anchor.y,
        Direction::Below => candidate.y > anchor.y,
        Direction::Left => candidate.x < anchor.x,
        Direction::Right => candidate.x > anchor.x,
    }
}
