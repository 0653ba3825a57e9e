//! Error types for viewer operations.

use thiserror::Error;

/// Errors that can occur while driving a viewer.
///
/// None of these are fatal: the viewer stays usable after any of them and
/// its state is left exactly as it was before the failing call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// Native or container dimensions are not positive finite numbers
    #[error("Invalid dimensions: {width} x {height}")]
    InvalidDimensions {
        /// Offending width
        width: f64,
        /// Offending height
        height: f64,
    },

    /// An input event carried NaN or infinite coordinates
    #[error("Non-finite coordinate in {event} event")]
    NonFiniteCoordinate {
        /// Name of the event kind
        event: &'static str,
    },

    /// Export requested before any polygon was finalized
    #[error("No finalized polygon to export")]
    EmptyExport,

    /// A polygon was given fewer vertices than the configured minimum
    #[error("Polygon needs at least {minimum} vertices, got {vertices}")]
    DegeneratePolygon {
        /// Vertices supplied
        vertices: usize,
        /// Required minimum
        minimum: usize,
    },

    /// A polygon import carried no points
    #[error("Polygon has no points")]
    EmptyPolygon,

    /// Text could not be read as a single-ring WKT polygon
    #[error("Malformed WKT: {message}")]
    MalformedWkt {
        /// Description of the problem
        message: String,
    },
}

impl ViewerError {
    /// Create a malformed WKT error with a message.
    pub fn malformed_wkt(message: impl Into<String>) -> Self {
        Self::MalformedWkt {
            message: message.into(),
        }
    }

    /// Check the pair is usable as image or container dimensions.
    pub(crate) fn check_dimensions(width: f64, height: f64) -> Result<(), Self> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidDimensions { width, height })
        }
    }
}
