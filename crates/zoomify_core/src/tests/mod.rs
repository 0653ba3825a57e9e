//! Scenario tests driving a full viewer through input events.
//!
//! Shared fixture: a 1000x500 image in a 500x500 container at the page
//! origin. The fit box is 500x250 at (0, 125), so one container unit is two
//! image pixels.

mod viewer_tests;

use crate::geometry::{ContainerBox, Point, Size};
use crate::gesture::InputEvent;
use crate::renderer::{Renderer, Scene};
use crate::settings::ViewerSettings;
use crate::viewer::Viewer;

const EPSILON: f64 = 1e-9;

/// What the renderer saw in one frame.
#[derive(Debug, Clone, PartialEq)]
struct Frame {
    markers: Vec<Point>,
    path: Vec<Point>,
    polygons: usize,
    zoom_ratio: f64,
}

/// Renderer that records every frame in surface coordinates.
#[derive(Debug, Default)]
struct RecordingRenderer {
    surface: Size,
    frames: Vec<Frame>,
    released: bool,
}

impl RecordingRenderer {
    fn new(width: f64, height: f64) -> Self {
        Self {
            surface: Size::new(width, height),
            ..Self::default()
        }
    }

    fn last(&self) -> &Frame {
        self.frames.last().expect("at least one frame")
    }
}

impl Renderer for RecordingRenderer {
    fn surface_size(&self) -> Size {
        self.surface
    }

    fn render(&mut self, scene: &Scene<'_>) {
        self.frames.push(Frame {
            markers: scene.markers.iter().map(|p| scene.to_surface(*p)).collect(),
            path: scene.in_progress_path(),
            polygons: scene.polygons.len(),
            zoom_ratio: scene.zoom_ratio(),
        });
    }

    fn release(&mut self) {
        self.released = true;
    }
}

fn viewer() -> Viewer<RecordingRenderer> {
    Viewer::init(
        Size::new(1000.0, 500.0),
        ContainerBox::at_origin(500.0, 500.0),
        RecordingRenderer::new(500.0, 250.0),
        &ViewerSettings::default(),
    )
    .expect("valid viewer")
}

fn drawing_viewer() -> Viewer<RecordingRenderer> {
    let mut viewer = viewer();
    viewer.set_can_draw(true);
    viewer
}

/// Press and release in place.
fn click(viewer: &mut Viewer<RecordingRenderer>, x: f64, y: f64) {
    let position = Point::new(x, y);
    viewer.dispatch(InputEvent::PointerDown { position }).expect("valid down");
    viewer.dispatch(InputEvent::PointerUp { position }).expect("valid up");
}

fn assert_point_eq(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON,
        "{:?} != {:?}",
        a,
        b
    );
}
