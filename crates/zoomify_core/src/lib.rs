//! zoomify_core - pan/zoom viewport and polygon annotation engine
//!
//! Turns normalized pointer, touch and wheel input into a zoom/pan transform
//! and a set of image-space polygons. Rendering is delegated to an injected
//! [`Renderer`]; everything else is synchronous state owned by a [`Viewer`].

pub mod annotation;
pub mod constants;
pub mod coords;
mod error;
pub mod geometry;
pub mod gesture;
pub mod renderer;
pub mod settings;
pub mod viewer;
pub mod viewport;
pub mod wkt;

#[cfg(test)]
mod tests;

pub use annotation::{AnnotationEngine, ClickOutcome};
pub use coords::CoordinateMapper;
pub use error::ViewerError;
pub use geometry::{Axis, ContainerBox, Point, Polygon, Size};
pub use gesture::{GestureController, GesturePhase, GestureState, InputEvent, Intent, Key, ZoomDirection};
pub use renderer::{Renderer, Scene};
pub use settings::ViewerSettings;
pub use viewer::{DrawnCallback, Viewer};
pub use viewport::Viewport;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ViewerError>;
