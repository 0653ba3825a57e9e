//! Pan/zoom transform of the image inside its container.
//!
//! The image box has a current size and a pan offset. The offset is measured
//! from the fit origin, the top-left of the box the image occupies at fit
//! size. The offset is never positive, and it never goes past the point where
//! the image's far edge would uncover the fit box.

use serde::Serialize;

use crate::error::ViewerError;
use crate::geometry::{Axis, Point, Size};
use crate::gesture::ZoomDirection;
use crate::settings::ViewerSettings;

/// Current and default transform of the displayed image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    /// Native image pixel dimensions
    native: Size,
    /// Container box size
    container: Size,
    /// Size at which the image fits the container on its longer axis
    fit: Size,
    /// Top-left of the fit box in container coordinates
    fit_origin: Point,
    /// Current image size in container units
    size: Size,
    /// Current pan offset relative to the fit origin
    offset: Point,
    zoom_speed: f64,
    max_zoom_factor: f64,
}

impl Viewport {
    /// Compute the fit transform for an image of `native` size shown in a
    /// container of `container` size.
    ///
    /// The longer native axis fills the matching container axis, and the
    /// shorter axis is centered.
    pub fn new(native: Size, container: Size, settings: &ViewerSettings) -> Result<Self, ViewerError> {
        ViewerError::check_dimensions(native.width, native.height)?;
        ViewerError::check_dimensions(container.width, container.height)?;

        let fit = if native.width > native.height {
            let ratio = native.width / native.height;
            Size::new(container.width, container.width / ratio)
        } else {
            let ratio = native.height / native.width;
            Size::new(container.height / ratio, container.height)
        };

        let fit_origin = Point::new(
            if fit.height > fit.width {
                container.width / 2.0 - fit.width / 2.0
            } else {
                0.0
            },
            if fit.width > fit.height {
                container.height / 2.0 - fit.height / 2.0
            } else {
                0.0
            },
        );

        log::debug!(
            "Viewport fit: native {}x{} -> {:.1}x{:.1} at ({:.1}, {:.1})",
            native.width,
            native.height,
            fit.width,
            fit.height,
            fit_origin.x,
            fit_origin.y
        );

        Ok(Self {
            native,
            container,
            fit,
            fit_origin,
            size: fit,
            offset: Point::ORIGIN,
            zoom_speed: settings.zoom_speed,
            max_zoom_factor: settings.max_zoom_factor,
        })
    }

    /// Zoom one step around `focal`, a point in container coordinates.
    ///
    /// The image point under `focal` stays put unless the pan clamp or the
    /// snap back to fit size has to move it.
    pub fn zoom(&mut self, focal: Point, direction: ZoomDirection) {
        let cursor_x = focal.x - self.fit_origin.x;
        let cursor_y = focal.y - self.fit_origin.y;

        // Where the focal point sits inside the image box, 0..1 when inside
        let ratio_x = (cursor_x - self.offset.x) / self.size.width;
        let ratio_y = (cursor_y - self.offset.y) / self.size.height;

        let max_width = self.max_width();
        let new_width = match direction {
            ZoomDirection::In if self.size.width < max_width => {
                (self.size.width * (1.0 + self.zoom_speed)).min(max_width)
            }
            ZoomDirection::Out if self.size.width > self.fit.width => {
                self.size.width * (1.0 - self.zoom_speed)
            }
            _ => self.size.width,
        };

        if new_width <= self.fit.width {
            self.reset();
            log::debug!("Zoom {:?}: snapped back to fit", direction);
            return;
        }

        self.size = self.size_for_width(new_width);
        self.offset = Point::new(
            cursor_x - self.size.width * ratio_x,
            cursor_y - self.size.height * ratio_y,
        );
        self.clamp_pan();

        log::debug!(
            "Zoom {:?}: {:.2}x at ({:.1}, {:.1}), offset ({:.1}, {:.1})",
            direction,
            self.zoom_ratio(),
            focal.x,
            focal.y,
            self.offset.x,
            self.offset.y
        );
    }

    /// Move the image by a screen delta, clamped to the pan bounds.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset = Point::new(self.offset.x + dx, self.offset.y + dy);
        self.clamp_pan();
        log::trace!("Pan by ({:.1}, {:.1}) -> ({:.1}, {:.1})", dx, dy, self.offset.x, self.offset.y);
    }

    /// Restore fit size with no pan.
    pub fn reset(&mut self) {
        self.size = self.fit;
        self.offset = Point::ORIGIN;
    }

    fn clamp_pan(&mut self) {
        let min_x = self.fit.width - self.size.width;
        let min_y = self.fit.height - self.size.height;
        self.offset = Point::new(
            self.offset.x.min(0.0).max(min_x),
            self.offset.y.min(0.0).max(min_y),
        );
    }

    fn size_for_width(&self, width: f64) -> Size {
        Size::new(width, width * self.native.height / self.native.width)
    }

    /// Largest image width the zoom may reach.
    pub fn max_width(&self) -> f64 {
        self.container.width * self.max_zoom_factor
    }

    /// Current height over fit height.
    pub fn zoom_ratio(&self) -> f64 {
        self.size.height / self.fit.height
    }

    /// The axis the fit transform filled.
    pub fn constrained_axis(&self) -> Axis {
        if self.native.width > self.native.height {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    /// Fit size over native size along the constrained axis.
    pub fn native_to_fit(&self) -> f64 {
        let axis = self.constrained_axis();
        self.fit.along(axis) / self.native.along(axis)
    }

    /// Top-left of the image in container coordinates.
    pub fn image_origin(&self) -> Point {
        Point::new(self.fit_origin.x + self.offset.x, self.fit_origin.y + self.offset.y)
    }

    pub fn is_at_fit(&self) -> bool {
        self.size == self.fit && self.offset == Point::ORIGIN
    }

    pub fn native_size(&self) -> Size {
        self.native
    }

    pub fn container_size(&self) -> Size {
        self.container
    }

    pub fn default_size(&self) -> Size {
        self.fit
    }

    pub fn default_origin(&self) -> Point {
        self.fit_origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Pan offset relative to the fit origin.
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn zoom_speed(&self) -> f64 {
        self.zoom_speed
    }
}
