//! Rendering seam.
//!
//! The viewer never draws by itself. After each visible state change it hands
//! a [`Scene`] to the injected [`Renderer`], which is expected to draw:
//! - a filled square at each marker, the first one in a distinguishing fill
//! - a dashed polyline through the markers, ending at the preview point
//! - a solid closed outline per finalized polygon, in that polygon's color

use crate::coords::CoordinateMapper;
use crate::geometry::{Point, Polygon, Size};
use crate::viewport::Viewport;

/// Snapshot of everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub viewport: &'a Viewport,
    pub mapper: &'a CoordinateMapper,
    /// In-progress markers, image space
    pub markers: &'a [Point],
    /// Finalized polygons, image space
    pub polygons: &'a [Polygon],
    /// Rubber-band end point, image space
    pub preview: Option<Point>,
    pub is_drawing: bool,
    /// Stroke color of the in-progress polygon
    pub color: &'a str,
}

impl Scene<'_> {
    /// Map an image-space point to surface pixels.
    pub fn to_surface(&self, point: Point) -> Point {
        self.mapper.image_to_surface(self.viewport, point)
    }

    /// Surface-space vertices of the dashed in-progress polyline.
    pub fn in_progress_path(&self) -> Vec<Point> {
        let preview = self.preview.filter(|_| self.is_drawing && !self.markers.is_empty());
        self.markers
            .iter()
            .chain(preview.iter())
            .map(|p| self.to_surface(*p))
            .collect()
    }

    /// Surface-space vertices of a finalized polygon, without the closing point.
    pub fn polygon_path(&self, polygon: &Polygon) -> Vec<Point> {
        polygon.points.iter().map(|p| self.to_surface(*p)).collect()
    }

    /// Current zoom relative to fit size.
    pub fn zoom_ratio(&self) -> f64 {
        self.viewport.zoom_ratio()
    }
}

/// A drawing backend for the annotation overlay.
pub trait Renderer {
    /// Pixel resolution of the drawing surface.
    fn surface_size(&self) -> Size;

    /// Redraw the whole overlay from `scene`.
    fn render(&mut self, scene: &Scene<'_>);

    /// Free backend resources. Called once on dispose.
    fn release(&mut self) {}
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn surface_size(&self) -> Size {
        (**self).surface_size()
    }

    fn render(&mut self, scene: &Scene<'_>) {
        (**self).render(scene)
    }

    fn release(&mut self) {
        (**self).release()
    }
}
