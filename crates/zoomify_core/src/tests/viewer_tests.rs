//! Lifecycle, rendering and error handling of the viewer.

use std::cell::RefCell;
use std::rc::Rc;

use super::{click, drawing_viewer, viewer, RecordingRenderer};
use crate::error::ViewerError;
use crate::geometry::{ContainerBox, Point, Size};
use crate::gesture::{GesturePhase, InputEvent};
use crate::settings::ViewerSettings;
use crate::viewer::Viewer;

#[test]
fn test_init_renders_fit_frame() {
    let viewer = viewer();
    assert_eq!(viewer.renderer().frames.len(), 1);
    assert_eq!(viewer.renderer().last().zoom_ratio, 1.0);
    assert!(viewer.viewport().is_at_fit());
    assert!(!viewer.annotations().can_draw());
}

#[test]
fn test_init_rejects_bad_dimensions() {
    let settings = ViewerSettings::default();
    let result = Viewer::init(
        Size::new(0.0, 500.0),
        ContainerBox::at_origin(500.0, 500.0),
        RecordingRenderer::new(500.0, 250.0),
        &settings,
    );
    assert!(matches!(result, Err(ViewerError::InvalidDimensions { .. })));

    let result = Viewer::init(
        Size::new(1000.0, 500.0),
        ContainerBox::at_origin(500.0, f64::NAN),
        RecordingRenderer::new(500.0, 250.0),
        &settings,
    );
    assert!(matches!(result, Err(ViewerError::InvalidDimensions { .. })));

    let result = Viewer::init(
        Size::new(1000.0, 500.0),
        ContainerBox::at_origin(500.0, 500.0),
        RecordingRenderer::new(0.0, 0.0),
        &settings,
    );
    assert!(matches!(result, Err(ViewerError::InvalidDimensions { .. })));
}

#[test]
fn test_hover_without_drawing_skips_render() {
    let mut viewer = viewer();
    viewer
        .dispatch(InputEvent::PointerMove { position: Point::new(100.0, 200.0) })
        .unwrap();
    assert_eq!(viewer.renderer().frames.len(), 1);
}

#[test]
fn test_non_finite_event_is_rejected_and_viewer_stays_usable() {
    let mut viewer = drawing_viewer();
    let err = viewer
        .dispatch(InputEvent::PointerDown { position: Point::new(f64::NAN, 10.0) })
        .unwrap_err();
    assert_eq!(err, ViewerError::NonFiniteCoordinate { event: "pointer_down" });
    assert_eq!(viewer.gestures().phase(), GesturePhase::Idle);

    let err = viewer
        .dispatch(InputEvent::Wheel {
            position: Point::new(10.0, 10.0),
            delta_y: f64::INFINITY,
        })
        .unwrap_err();
    assert_eq!(err, ViewerError::NonFiniteCoordinate { event: "wheel" });
    assert!(viewer.viewport().is_at_fit());

    click(&mut viewer, 250.0, 250.0);
    assert_eq!(viewer.annotations().markers().len(), 1);
}

#[test]
fn test_drawn_callback_and_export() {
    let mut viewer = drawing_viewer();
    let drawn = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&drawn);
    viewer.on_drawn(move |index| sink.borrow_mut().push(index));

    // Image (100,100), (300,100), (300,300), then back near the first vertex
    for (x, y) in [(50.0, 175.0), (150.0, 175.0), (150.0, 275.0), (52.5, 177.5)] {
        click(&mut viewer, x, y);
    }

    assert_eq!(*drawn.borrow(), vec![0]);
    assert_eq!(viewer.renderer().last().polygons, 1);
    assert!(viewer.renderer().last().markers.is_empty());
    assert_eq!(
        viewer.export_last().unwrap(),
        "SRID=4326;POLYGON((0.1 0.2, 0.3 0.2, 0.3 0.6, 0.1 0.2))"
    );

    // Drawing is disabled after a close, so further clicks do nothing
    click(&mut viewer, 400.0, 300.0);
    assert!(viewer.annotations().markers().is_empty());
    assert_eq!(*drawn.borrow(), vec![0]);
}

#[test]
fn test_export_without_polygon() {
    let viewer = viewer();
    assert_eq!(viewer.export_last(), Err(ViewerError::EmptyExport));
}

#[test]
fn test_import_renders_polygon() {
    let mut viewer = viewer();
    let frames = viewer.renderer().frames.len();
    let index = viewer
        .import_wkt("SRID=4326;POLYGON((0.1 0.2, 0.3 0.2, 0.3 0.6, 0.1 0.2))", "#00ff00")
        .unwrap();
    assert_eq!(index, 0);
    assert_eq!(viewer.renderer().frames.len(), frames + 1);
    assert_eq!(viewer.renderer().last().polygons, 1);
    assert_eq!(viewer.annotations().polygons()[0].color, "#00ff00");

    assert!(matches!(
        viewer.import_wkt("POLYGON((0 0, 1 1, 0 0))", "#00ff00"),
        Err(ViewerError::DegeneratePolygon { vertices: 2, minimum: 3 })
    ));
    assert_eq!(viewer.annotations().polygons().len(), 1);
}

#[test]
fn test_cancel_with_discard_drops_last_polygon() {
    let mut viewer = drawing_viewer();
    for (x, y) in [(50.0, 175.0), (150.0, 175.0), (150.0, 275.0), (50.0, 175.0)] {
        click(&mut viewer, x, y);
    }
    assert_eq!(viewer.annotations().polygons().len(), 1);

    viewer.cancel(true);
    assert!(viewer.annotations().polygons().is_empty());
    assert_eq!(viewer.renderer().last().polygons, 0);
}

#[test]
fn test_dispose_releases_renderer() {
    let mut viewer = drawing_viewer();
    click(&mut viewer, 250.0, 250.0);
    let frames = viewer.renderer().frames.len();

    let renderer = viewer.dispose();
    assert!(renderer.released);
    assert_eq!(renderer.frames.len(), frames);
}

#[test]
fn test_letterbox_clicks_never_reach_export() {
    let mut viewer = drawing_viewer();
    // The fit box starts at y = 125, so all of these land above the image
    for (x, y) in [(10.0, 10.0), (200.0, 10.0), (200.0, 60.0), (12.0, 12.0)] {
        click(&mut viewer, x, y);
    }
    assert!(viewer.annotations().markers().is_empty());
    assert!(!viewer.annotations().is_drawing());
    assert_eq!(viewer.export_last(), Err(ViewerError::EmptyExport));

    // Drawing is still enabled for clicks on the image
    click(&mut viewer, 50.0, 175.0);
    assert_eq!(viewer.annotations().markers(), &[Point::new(100.0, 100.0)]);
}
