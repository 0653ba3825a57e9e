//! Polygon annotation engine.
//!
//! Clicks add markers to the in-progress polygon; a click inside the snap
//! square of the first marker closes it. Closing, cancelling and the
//! external drawing gate are the only ways out of the drawing state.

use crate::error::ViewerError;
use crate::geometry::{Point, Polygon, Size};
use crate::settings::ViewerSettings;
use crate::wkt;

/// Result of a click on the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Drawing is disabled; nothing changed.
    Ignored,
    /// The click fell outside the image, e.g. in the letterbox; nothing changed.
    OutsideImage,
    /// A marker was appended at this index.
    VertexAdded { index: usize },
    /// The markers were closed into the polygon at this index.
    Closed { polygon_index: usize },
}

/// Owns in-progress markers and finalized polygons.
#[derive(Debug, Clone)]
pub struct AnnotationEngine {
    /// Uncommitted vertices of the polygon being drawn
    markers: Vec<Point>,
    /// Finalized polygons in creation order
    polygons: Vec<Polygon>,
    /// Preview end of the rubber-band edge
    current_position: Option<Point>,
    is_drawing: bool,
    /// External gate ("annotation mode enabled")
    can_draw: bool,
    /// Native image dimensions, used for export normalization
    native: Size,
    color: String,
    snap_half_width: f64,
    min_vertices: usize,
}

impl AnnotationEngine {
    pub fn new(native: Size, settings: &ViewerSettings) -> Self {
        Self {
            markers: Vec::new(),
            polygons: Vec::new(),
            current_position: None,
            is_drawing: false,
            can_draw: false,
            native,
            color: settings.polygon_color.clone(),
            snap_half_width: settings.snap_half_width,
            min_vertices: settings.min_polygon_vertices,
        }
    }

    /// Register a click at an image-space point.
    ///
    /// A click inside the first marker's square closes the polygon once it
    /// has the minimum vertex count. Before that it is placed as an ordinary
    /// marker, so a degenerate polygon is never finalized. Clicks outside
    /// the image bounds never become markers.
    pub fn handle_click(&mut self, point: Point) -> ClickOutcome {
        if !self.can_draw {
            log::trace!("Click at ({:.1}, {:.1}) ignored, drawing disabled", point.x, point.y);
            return ClickOutcome::Ignored;
        }

        if self.closes_ring(&point) {
            if self.markers.len() >= self.min_vertices {
                return self.finalize();
            }
            log::debug!(
                "Too few markers to close ({} < {}), placing a marker instead",
                self.markers.len(),
                self.min_vertices
            );
        }

        if !self.native.contains(&point) {
            log::trace!("Click at ({:.1}, {:.1}) is outside the image", point.x, point.y);
            return ClickOutcome::OutsideImage;
        }

        self.is_drawing = true;
        self.markers.push(point);
        log::debug!(
            "Marker {} at ({:.1}, {:.1})",
            self.markers.len() - 1,
            point.x,
            point.y
        );
        ClickOutcome::VertexAdded {
            index: self.markers.len() - 1,
        }
    }

    fn closes_ring(&self, point: &Point) -> bool {
        self.markers
            .first()
            .is_some_and(|first| first.in_area(point, self.snap_half_width))
    }

    fn finalize(&mut self) -> ClickOutcome {
        let points = std::mem::take(&mut self.markers);
        let vertices = points.len();
        self.polygons.push(Polygon::new(points, self.color.clone()));
        self.current_position = None;
        self.is_drawing = false;
        self.can_draw = false;

        let polygon_index = self.polygons.len() - 1;
        log::debug!("Polygon {} closed with {} vertices", polygon_index, vertices);
        ClickOutcome::Closed { polygon_index }
    }

    /// Move the rubber-band preview end. Snaps to the first marker when the
    /// pointer is inside its square.
    ///
    /// Returns whether the preview is active, i.e. a render is due.
    pub fn preview_move(&mut self, point: Point) -> bool {
        if !(self.is_drawing && self.can_draw) {
            return false;
        }
        self.current_position = match self.markers.first() {
            Some(first) if first.in_area(&point, self.snap_half_width) => Some(*first),
            _ => Some(point),
        };
        true
    }

    /// Abort the in-progress polygon. With `discard_last`, also drop the most
    /// recently finalized polygon and return it.
    pub fn cancel(&mut self, discard_last: bool) -> Option<Polygon> {
        self.markers.clear();
        self.current_position = None;
        self.is_drawing = false;
        self.can_draw = false;

        let removed = if discard_last { self.polygons.pop() } else { None };
        log::debug!(
            "Drawing cancelled{}",
            if removed.is_some() { ", last polygon discarded" } else { "" }
        );
        removed
    }

    /// Export the last finalized polygon as a normalized WKT string.
    pub fn export_last(&self) -> Result<String, ViewerError> {
        let polygon = self.polygons.last().ok_or(ViewerError::EmptyExport)?;
        let ring: Vec<Point> = polygon
            .points
            .iter()
            .map(|p| Point::new(p.x / self.native.width, p.y / self.native.height))
            .collect();
        wkt::format_polygon(&ring)
    }

    /// Add a finalized polygon from normalized `[0, 1]` coordinates.
    ///
    /// Rings below the minimum vertex count are rejected with
    /// [`ViewerError::DegeneratePolygon`].
    pub fn add_polygon(&mut self, normalized: &[Point], color: impl Into<String>) -> Result<usize, ViewerError> {
        if normalized.is_empty() {
            return Err(ViewerError::EmptyPolygon);
        }
        if !normalized.iter().all(Point::is_finite) {
            return Err(ViewerError::NonFiniteCoordinate { event: "import" });
        }
        let points = normalized
            .iter()
            .map(|p| Point::new(p.x * self.native.width, p.y * self.native.height))
            .collect();
        let polygon = Polygon::new(points, color);
        if polygon.is_degenerate(self.min_vertices) {
            return Err(ViewerError::DegeneratePolygon {
                vertices: polygon.len(),
                minimum: self.min_vertices,
            });
        }
        self.polygons.push(polygon);
        Ok(self.polygons.len() - 1)
    }

    /// Add a finalized polygon from a WKT string such as one produced by
    /// [`export_last`](Self::export_last).
    pub fn import_wkt(&mut self, text: &str, color: impl Into<String>) -> Result<usize, ViewerError> {
        let ring = wkt::parse_polygon(text)?;
        self.add_polygon(&ring, color)
    }

    /// Drop all markers and polygons and disable drawing.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.polygons.clear();
        self.current_position = None;
        self.is_drawing = false;
        self.can_draw = false;
    }

    pub fn set_can_draw(&mut self, can_draw: bool) {
        self.can_draw = can_draw;
    }

    pub fn can_draw(&self) -> bool {
        self.can_draw
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    pub fn markers(&self) -> &[Point] {
        &self.markers
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn current_position(&self) -> Option<Point> {
        self.current_position
    }

    /// Color given to polygons closed from now on.
    pub fn color(&self) -> &str {
        &self.color
    }
}
