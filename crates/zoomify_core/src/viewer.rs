//! The viewer component.
//!
//! Owns the viewport, gesture controller, annotation engine and renderer for
//! one image. Every input event goes through [`Viewer::dispatch`]. It runs to
//! completion and renders before returning.

use std::fmt;

use crate::annotation::{AnnotationEngine, ClickOutcome};
use crate::coords::CoordinateMapper;
use crate::error::ViewerError;
use crate::geometry::{ContainerBox, Point, Size};
use crate::gesture::{GestureController, InputEvent, Intent};
use crate::renderer::{Renderer, Scene};
use crate::settings::ViewerSettings;
use crate::viewport::Viewport;

/// Callback fired when a polygon is finalized. Receives the polygon index.
pub type DrawnCallback = Box<dyn FnMut(usize)>;

/// Pan/zoom image viewer with polygon annotation.
pub struct Viewer<R: Renderer> {
    container: ContainerBox,
    viewport: Viewport,
    mapper: CoordinateMapper,
    gestures: GestureController,
    annotations: AnnotationEngine,
    renderer: R,
    on_drawn: Option<DrawnCallback>,
}

impl<R: Renderer> Viewer<R> {
    /// Build a viewer for an image of `native` pixel size shown in
    /// `container`, drawing through `renderer`. Renders the initial frame.
    pub fn init(
        native: Size,
        container: ContainerBox,
        renderer: R,
        settings: &ViewerSettings,
    ) -> Result<Self, ViewerError> {
        let settings = settings.clone().sanitized();
        let viewport = Viewport::new(native, container.size, &settings)?;

        let surface = renderer.surface_size();
        ViewerError::check_dimensions(surface.width, surface.height)?;

        let mut viewer = Self {
            container,
            viewport,
            mapper: CoordinateMapper::new(container.origin, surface),
            gestures: GestureController::new(settings.drag_threshold),
            annotations: AnnotationEngine::new(native, &settings),
            renderer,
            on_drawn: None,
        };

        log::info!(
            "Viewer initialized: image {}x{}, container {}x{}, surface {}x{}",
            native.width,
            native.height,
            container.size.width,
            container.size.height,
            surface.width,
            surface.height
        );
        viewer.render();
        Ok(viewer)
    }

    /// Register the observer notified when a polygon is finalized.
    pub fn on_drawn<F>(&mut self, f: F)
    where
        F: FnMut(usize) + 'static,
    {
        self.on_drawn = Some(Box::new(f));
    }

    /// Process one input event.
    ///
    /// Invalid events are rejected before any state changes.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<(), ViewerError> {
        let intents = self.gestures.dispatch(&event)?;

        let mut dirty = false;
        for intent in intents {
            dirty |= self.apply(intent);
        }
        if dirty {
            self.render();
        }
        Ok(())
    }

    /// Apply one intent. Returns whether visible geometry changed.
    fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Pan { dx, dy } => {
                self.viewport.pan(dx, dy);
                true
            }
            Intent::Zoom { focal, direction } => {
                self.viewport.zoom(self.container.to_local(focal), direction);
                true
            }
            Intent::Click { position } => {
                let point = self.screen_to_image(position);
                match self.annotations.handle_click(point) {
                    ClickOutcome::Ignored | ClickOutcome::OutsideImage => false,
                    ClickOutcome::VertexAdded { .. } => true,
                    ClickOutcome::Closed { polygon_index } => {
                        if let Some(callback) = self.on_drawn.as_mut() {
                            callback(polygon_index);
                        }
                        true
                    }
                }
            }
            Intent::Preview { position } => {
                let point = self.screen_to_image(position);
                self.annotations.preview_move(point)
            }
            Intent::Cancel => {
                self.annotations.cancel(false);
                true
            }
        }
    }

    /// Hand the current state to the renderer.
    pub fn render(&mut self) {
        let scene = Scene {
            viewport: &self.viewport,
            mapper: &self.mapper,
            markers: self.annotations.markers(),
            polygons: self.annotations.polygons(),
            preview: self.annotations.current_position(),
            is_drawing: self.annotations.is_drawing(),
            color: self.annotations.color(),
        };
        self.renderer.render(&scene);
    }

    /// Map a page-relative point into image pixels with the current transform.
    pub fn screen_to_image(&self, screen: Point) -> Point {
        self.mapper.screen_to_image(&self.viewport, screen)
    }

    /// Export the last finalized polygon as `SRID=4326;POLYGON((...))`.
    pub fn export_last(&self) -> Result<String, ViewerError> {
        self.annotations.export_last()
    }

    /// Add a finalized polygon from normalized coordinates.
    pub fn add_polygon(&mut self, normalized: &[Point], color: &str) -> Result<usize, ViewerError> {
        let index = self.annotations.add_polygon(normalized, color)?;
        self.render();
        Ok(index)
    }

    /// Add a finalized polygon from an exported WKT string.
    pub fn import_wkt(&mut self, text: &str, color: &str) -> Result<usize, ViewerError> {
        let index = self.annotations.import_wkt(text, color)?;
        self.render();
        Ok(index)
    }

    /// Cancel the in-progress polygon, optionally dropping the last finished one.
    pub fn cancel(&mut self, discard_last: bool) {
        self.annotations.cancel(discard_last);
        self.render();
    }

    /// Enable or disable vertex placement.
    pub fn set_can_draw(&mut self, can_draw: bool) {
        self.annotations.set_can_draw(can_draw);
    }

    /// Snap back to the fit transform.
    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.render();
    }

    /// Clear all state, release the renderer and hand it back.
    pub fn dispose(mut self) -> R {
        self.annotations.clear();
        self.gestures.reset();
        self.viewport.reset();
        self.renderer.release();
        log::info!("Viewer disposed");
        self.renderer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn annotations(&self) -> &AnnotationEngine {
        &self.annotations
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn container(&self) -> &ContainerBox {
        &self.container
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: Renderer + fmt::Debug> fmt::Debug for Viewer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewer")
            .field("container", &self.container)
            .field("viewport", &self.viewport)
            .field("gestures", &self.gestures)
            .field("annotations", &self.annotations)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}
