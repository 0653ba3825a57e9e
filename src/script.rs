//! Recorded input scripts.
//!
//! A script names the image (by size or by file), the container box and a
//! list of steps. Steps are either raw input events, tagged with `type`, or
//! host actions, tagged with `action`:
//!
//! ```json
//! {
//!   "native": { "width": 1000, "height": 500 },
//!   "container": { "size": { "width": 500, "height": 500 } },
//!   "steps": [
//!     { "action": "enable_drawing" },
//!     { "type": "pointer_down", "position": { "x": 50, "y": 175 } },
//!     { "type": "pointer_up", "position": { "x": 50, "y": 175 } },
//!     { "action": "export" }
//!   ]
//! }
//! ```

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use zoomify_core::{ContainerBox, InputEvent, Renderer, Size, Viewer, ViewerError, ViewerSettings, Viewport};

use crate::raster::RasterError;

/// Errors from loading or running a script.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read image dimensions: {0}")]
    Image(#[from] image::ImageError),

    /// Neither `native` nor `image` was given
    #[error("Script needs either a native size or an image path")]
    MissingImageSize,

    /// A step was rejected by the viewer
    #[error("Step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: ViewerError,
    },

    #[error(transparent)]
    Viewer(#[from] ViewerError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Host-side operations a script can interleave with input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    EnableDrawing,
    DisableDrawing,
    Cancel {
        #[serde(default)]
        discard_last: bool,
    },
    Export,
    Import {
        wkt: String,
        /// Defaults to the configured polygon color
        #[serde(default)]
        color: Option<String>,
    },
    ResetView,
}

/// One script step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Input(InputEvent),
    Action(Action),
}

/// A recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Native image size; takes precedence over `image`
    #[serde(default)]
    pub native: Option<Size>,

    /// Image file whose dimensions give the native size
    #[serde(default)]
    pub image: Option<PathBuf>,

    pub container: ContainerBox,

    /// Render surface size; defaults to the fit size
    #[serde(default)]
    pub surface: Option<Size>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// What a replay produced.
#[derive(Debug)]
pub struct ReplayOutcome<R> {
    /// Export strings, in step order
    pub exports: Vec<String>,
    /// Number of polygons finalized by clicks
    pub drawn: usize,
    /// The renderer, released
    pub renderer: R,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a script file. A relative `image` path is resolved against the
    /// script's directory.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path)?;
        let mut script = Self::from_json(&json)?;

        if let (Some(image), Some(dir)) = (script.image.as_mut(), path.parent()) {
            if image.is_relative() {
                *image = dir.join(&*image);
            }
        }
        log::info!("Loaded script {:?} with {} steps", path, script.steps.len());
        Ok(script)
    }

    /// Native image size, read from the image file if not given directly.
    pub fn native_size(&self) -> Result<Size, ReplayError> {
        if let Some(native) = self.native {
            return Ok(native);
        }
        let path = self.image.as_ref().ok_or(ReplayError::MissingImageSize)?;
        let (width, height) = image::image_dimensions(path)?;
        log::debug!("Image {:?} is {}x{}", path, width, height);
        Ok(Size::new(f64::from(width), f64::from(height)))
    }

    /// Surface size the renderer should be created with.
    pub fn surface_size(&self, settings: &ViewerSettings) -> Result<Size, ReplayError> {
        if let Some(surface) = self.surface {
            return Ok(surface);
        }
        let viewport = Viewport::new(self.native_size()?, self.container.size, settings)?;
        Ok(viewport.default_size())
    }
}

/// Run `script` through a fresh viewer drawing with `renderer`.
pub fn run_script<R: Renderer>(
    script: &ReplayScript,
    renderer: R,
    settings: &ViewerSettings,
) -> Result<ReplayOutcome<R>, ReplayError> {
    let mut viewer = Viewer::init(script.native_size()?, script.container, renderer, settings)?;

    let drawn = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&drawn);
    viewer.on_drawn(move |index| {
        log::info!("Polygon {} drawn", index);
        counter.set(counter.get() + 1);
    });

    let mut exports = Vec::new();
    for (index, step) in script.steps.iter().enumerate() {
        let at = |source| ReplayError::Step { step: index, source };
        match step {
            Step::Input(event) => viewer.dispatch(*event).map_err(at)?,
            Step::Action(Action::EnableDrawing) => viewer.set_can_draw(true),
            Step::Action(Action::DisableDrawing) => viewer.set_can_draw(false),
            Step::Action(Action::Cancel { discard_last }) => viewer.cancel(*discard_last),
            Step::Action(Action::Export) => exports.push(viewer.export_last().map_err(at)?),
            Step::Action(Action::Import { wkt, color }) => {
                let color = color.as_deref().unwrap_or(&settings.polygon_color);
                viewer.import_wkt(wkt, color).map_err(at)?;
            }
            Step::Action(Action::ResetView) => viewer.reset_view(),
        }
    }

    let renderer = viewer.dispose();
    Ok(ReplayOutcome {
        exports,
        drawn: drawn.get(),
        renderer,
    })
}
