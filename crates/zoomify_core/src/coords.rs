//! Mapping between page coordinates, image pixels and the render surface.
//!
//! The render surface covers the fit box. One surface pixel equals one
//! container unit when the surface matches the fit size.

use crate::geometry::{Point, Size};
use crate::viewport::Viewport;

/// Converts pointer positions into image space and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    /// Page-relative origin of the container
    origin: Point,
    /// Pixel resolution of the render surface
    surface: Size,
}

impl CoordinateMapper {
    pub fn new(origin: Point, surface: Size) -> Self {
        Self { origin, surface }
    }

    /// Container units per image pixel at the current zoom.
    pub fn scale(&self, viewport: &Viewport) -> f64 {
        viewport.zoom_ratio() * viewport.native_to_fit()
    }

    /// Convert a page-relative point to image pixel coordinates.
    pub fn screen_to_image(&self, viewport: &Viewport, screen: Point) -> Point {
        let image_origin = viewport.image_origin();
        let scale = self.scale(viewport);
        Point::new(
            (screen.x - self.origin.x - image_origin.x) / scale,
            (screen.y - self.origin.y - image_origin.y) / scale,
        )
    }

    /// Convert an image pixel to a page-relative point. Inverse of
    /// [`screen_to_image`](Self::screen_to_image).
    pub fn image_to_screen(&self, viewport: &Viewport, image: Point) -> Point {
        let image_origin = viewport.image_origin();
        let scale = self.scale(viewport);
        Point::new(
            image.x * scale + image_origin.x + self.origin.x,
            image.y * scale + image_origin.y + self.origin.y,
        )
    }

    /// Convert an image pixel to render surface pixels.
    ///
    /// The surface sits at the fit origin. Its resolution may differ from the
    /// fit box, so positions are rescaled along the constrained axis.
    pub fn image_to_surface(&self, viewport: &Viewport, image: Point) -> Point {
        let scale = self.scale(viewport);
        let offset = viewport.offset();
        let density = self.surface_density(viewport);
        Point::new(
            (image.x * scale + offset.x) * density,
            (image.y * scale + offset.y) * density,
        )
    }

    /// Surface pixels per container unit.
    pub fn surface_density(&self, viewport: &Viewport) -> f64 {
        let axis = viewport.constrained_axis();
        self.surface.along(axis) / viewport.default_size().along(axis)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn surface(&self) -> Size {
        self.surface
    }
}
