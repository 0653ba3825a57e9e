//! Core geometry value types.
//!
//! Points and polygons live in image pixel space. Sizes and container boxes
//! describe screen-side rectangles.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether `other` falls in the square of `half_width` centered on
    /// this point. With the default snap half-width that is a 30x30 square.
    ///
    /// Symmetric, and inclusive on the edges.
    pub fn in_area(&self, other: &Point, half_width: f64) -> bool {
        (other.x - self.x).abs() <= half_width && (other.y - self.y).abs() <= half_width
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between this one and `other`.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Component-wise difference `self - other`.
    pub fn offset_from(&self, other: &Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A closed polygon. The last point connects back to the first implicitly;
/// the closing point is never stored twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertices in edge order.
    pub points: Vec<Point>,
    /// Stroke color as a CSS-style hex string.
    pub color: String,
}

impl Polygon {
    pub fn new(points: Vec<Point>, color: impl Into<String>) -> Self {
        Self {
            points,
            color: color.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the polygon has fewer than `minimum` vertices.
    pub fn is_degenerate(&self, minimum: usize) -> bool {
        self.points.len() < minimum
    }
}

/// Width and height of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether `point` lies within `[0, width] x [0, height]`.
    pub fn contains(&self, point: &Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Extent along one axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// An image axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// The host container: page-relative origin plus box size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerBox {
    #[serde(default)]
    pub origin: Point,
    pub size: Size,
}

impl ContainerBox {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// A container anchored at the page origin.
    pub fn at_origin(width: f64, height: f64) -> Self {
        Self::new(Point::ORIGIN, Size::new(width, height))
    }

    /// Translate a page-relative point into container-local coordinates.
    pub fn to_local(&self, page: Point) -> Point {
        Point::new(page.x - self.origin.x, page.y - self.origin.y)
    }
}
