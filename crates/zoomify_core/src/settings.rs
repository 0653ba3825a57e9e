//! Tunable viewer parameters.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Viewer tuning. Every field has a default so partial config files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSettings {
    /// Multiplicative zoom step (0.1 = 10% per step)
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f64,

    /// Max image width as a multiple of the container width
    #[serde(default = "default_max_zoom_factor")]
    pub max_zoom_factor: f64,

    /// Half-width of the vertex snap square, in image pixels
    #[serde(default = "default_snap_half_width")]
    pub snap_half_width: f64,

    /// Per-axis displacement separating a click from a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,

    /// Stroke color for newly closed polygons
    #[serde(default = "default_polygon_color")]
    pub polygon_color: String,

    /// Markers required before the first-vertex click closes a polygon
    #[serde(default = "default_min_polygon_vertices")]
    pub min_polygon_vertices: usize,
}

fn default_zoom_speed() -> f64 {
    constants::ZOOM_SPEED
}

fn default_max_zoom_factor() -> f64 {
    constants::MAX_ZOOM_FACTOR
}

fn default_snap_half_width() -> f64 {
    constants::SNAP_HALF_WIDTH
}

fn default_drag_threshold() -> f64 {
    constants::DRAG_THRESHOLD
}

fn default_polygon_color() -> String {
    constants::DEFAULT_POLYGON_COLOR.to_string()
}

fn default_min_polygon_vertices() -> usize {
    constants::MIN_POLYGON_VERTICES
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            zoom_speed: default_zoom_speed(),
            max_zoom_factor: default_max_zoom_factor(),
            snap_half_width: default_snap_half_width(),
            drag_threshold: default_drag_threshold(),
            polygon_color: default_polygon_color(),
            min_polygon_vertices: default_min_polygon_vertices(),
        }
    }
}

impl ViewerSettings {
    /// Clamp values that would break viewport invariants back into range.
    pub fn sanitized(mut self) -> Self {
        if !(self.zoom_speed.is_finite() && self.zoom_speed > 0.0 && self.zoom_speed < 1.0) {
            log::warn!("zoom_speed {} out of range, using default", self.zoom_speed);
            self.zoom_speed = default_zoom_speed();
        }
        if !(self.max_zoom_factor.is_finite() && self.max_zoom_factor >= 1.0) {
            log::warn!("max_zoom_factor {} out of range, using default", self.max_zoom_factor);
            self.max_zoom_factor = default_max_zoom_factor();
        }
        if !(self.snap_half_width.is_finite() && self.snap_half_width >= 0.0) {
            self.snap_half_width = default_snap_half_width();
        }
        if !(self.drag_threshold.is_finite() && self.drag_threshold >= 0.0) {
            self.drag_threshold = default_drag_threshold();
        }
        self.min_polygon_vertices = self.min_polygon_vertices.max(1);
        self
    }
}
