//! Geometry primitives over document coordinates.
//!
//! Every polygon handled here is an axis-aligned quadrilateral with its
//! corners ordered top-left, top-right, bottom-right, bottom-left, so corner 0
//! holds the minimum and corner 2 the maximum of both axes.

use serde::{Deserialize, Serialize};

/// A coordinate in document space (page-relative units, e.g. inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to another point.
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Four-corner extent of a line or of an index region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingPolygon(pub [Point; 4]);

impl BoundingPolygon {
    /// Build an axis-aligned rectangle from its min and max corners.
    pub fn from_rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self([
            Point::new(min_x, min_y),
            Point::new(max_x, min_y),
            Point::new(max_x, max_y),
            Point::new(min_x, max_y),
        ])
    }

    /// A box that contains no point at all.
    ///
    /// Used as the extent of a document without lines.
    pub fn empty() -> Self {
        Self::from_rect(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }

    /// Minimum corner (corner 0).
    pub fn min(&self) -> Point {
        self.0[0]
    }

    /// Maximum corner (corner 2).
    pub fn max(&self) -> Point {
        self.0[2]
    }

    /// Midpoint of corners 0 and 2, the position of a line for every
    /// distance and alignment comparison.
    pub fn center(&self) -> Point {
        Point::new(
            (self.0[0].x + self.0[2].x) / 2.0,
            (self.0[0].y + self.0[2].y) / 2.0,
        )
    }

    /// Whether `point` lies inside this box, borders included.
    pub fn contains_point(&self, point: &Point) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Whether every corner of `polygon` lies inside this box.
    pub fn contains_polygon(&self, polygon: &BoundingPolygon) -> bool {
        polygon.0.iter().all(|p| self.contains_point(p))
    }

    /// Whether this box has no extent (e.g. built from zero lines).
    pub fn is_empty(&self) -> bool {
        let (min, max) = (self.min(), self.max());
        min.x > max.x || min.y > max.y
    }
}

/// Smallest axis-aligned box covering every corner of every polygon.
///
/// Returns `None` when the iterator yields no polygon.
pub fn bounding_box_of<'a, I>(polygons: I) -> Option<BoundingPolygon>
where
    I: IntoIterator<Item = &'a BoundingPolygon>,
{
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut seen = false;

    for polygon in polygons {
        seen = true;
        for point in polygon.points() {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
    }

    seen.then(|| BoundingPolygon::from_rect(min_x, min_y, max_x, max_y))
}

/// Parametric test for whether segment `a1-a2` crosses segment `b1-b2`.
///
/// Parallel segments have a zero denominator; the resulting NaN or infinity
/// fails the range check, so they never count as intersecting.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denominator;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denominator;

    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// Approximate overlap test between a line polygon and an index box.
///
/// Only same-position edges are compared (top with top, right with right,
/// bottom with bottom, left with left). Boxes offset diagonally are not
/// detected, and axis-aligned polygons never match since their edges are
/// parallel to the box edges.
pub fn box_intersects_polygon(polygon: &BoundingPolygon, bbox: &BoundingPolygon) -> bool {
    let [p1, p2, p3, p4] = polygon.0;
    let (min, max) = (bbox.min(), bbox.max());

    let top = (Point::new(min.x, min.y), Point::new(max.x, min.y));
    let right = (Point::new(max.x, min.y), Point::new(max.x, max.y));
    let bottom = (Point::new(min.x, max.y), Point::new(max.x, max.y));
    let left = (Point::new(min.x, min.y), Point::new(min.x, max.y));

    segments_intersect(p1, p2, top.0, top.1)
        || segments_intersect(p2, p3, right.0, right.1)
        || segments_intersect(p3, p4, bottom.0, bottom.1)
        || segments_intersect(p4, p1, left.0, left.1)
}
