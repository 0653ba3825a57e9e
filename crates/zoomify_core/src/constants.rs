//! Default tuning values for the viewer.

/// Half-width of the square used to detect a click on an existing vertex.
pub const SNAP_HALF_WIDTH: f64 = 15.0;

/// Displacement (per axis) from the drag start that turns a press into a drag.
pub const DRAG_THRESHOLD: f64 = 20.0;

/// Multiplicative zoom step applied per wheel notch or pinch update.
pub const ZOOM_SPEED: f64 = 0.1;

/// Maximum image width as a multiple of the container width.
pub const MAX_ZOOM_FACTOR: f64 = 4.0;

/// Stroke color for new polygons.
pub const DEFAULT_POLYGON_COLOR: &str = "#ff3333";

/// Minimum number of markers a polygon needs before it can be closed.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Spatial reference prefix written in front of exported polygons.
pub const EXPORT_SRID: u32 = 4326;

/// Rendering constants shared by renderer backends.
pub mod render {
    /// Stroke width for polylines and polygons.
    pub const LINE_WIDTH: f32 = 2.0;
    /// Side length of the square drawn at each marker.
    pub const MARKER_SIZE: f32 = 10.0;
    /// Dash pattern (on, off) of the in-progress polyline.
    pub const DASH_PATTERN: [f32; 2] = [15.0, 5.0];
    /// Fill of the first marker, so the closing target stands out.
    pub const FIRST_MARKER_COLOR: &str = "#ffffff";
}
