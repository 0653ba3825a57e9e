//! Gesture classification.
//!
//! Normalized pointer, touch and wheel events go in; viewer intents come out.
//! The controller only tracks gesture bookkeeping, it never touches the
//! viewport or annotations directly.

use serde::{Deserialize, Serialize};

use crate::constants::DRAG_THRESHOLD;
use crate::error::ViewerError;
use crate::geometry::Point;

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Escape,
    Char(char),
}

/// Normalized input event with page-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Mouse button or single touch contact pressed.
    PointerDown { position: Point },
    /// Mouse or single touch contact moved.
    PointerMove { position: Point },
    /// Mouse button or single touch contact released.
    PointerUp { position: Point },
    /// Pointer left the viewer.
    PointerLeave,
    /// Host aborted the pointer sequence.
    PointerCancel,
    /// A second contact went down; both contacts are reported.
    PinchStart { first: Point, second: Point },
    /// Either of the two contacts moved.
    PinchMove { first: Point, second: Point },
    /// The two-contact gesture ended.
    PinchEnd,
    /// Scroll wheel; only the sign of `delta_y` matters.
    Wheel { position: Point, delta_y: f64 },
    /// Key released.
    KeyUp { key: Key },
}

impl InputEvent {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::PointerDown { .. } => "pointer_down",
            InputEvent::PointerMove { .. } => "pointer_move",
            InputEvent::PointerUp { .. } => "pointer_up",
            InputEvent::PointerLeave => "pointer_leave",
            InputEvent::PointerCancel => "pointer_cancel",
            InputEvent::PinchStart { .. } => "pinch_start",
            InputEvent::PinchMove { .. } => "pinch_move",
            InputEvent::PinchEnd => "pinch_end",
            InputEvent::Wheel { .. } => "wheel",
            InputEvent::KeyUp { .. } => "key_up",
        }
    }

    /// Reject events carrying NaN or infinite coordinates.
    pub fn validate(&self) -> Result<(), ViewerError> {
        let finite = match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::PointerUp { position } => position.is_finite(),
            InputEvent::PinchStart { first, second } | InputEvent::PinchMove { first, second } => {
                first.is_finite() && second.is_finite()
            }
            InputEvent::Wheel { position, delta_y } => position.is_finite() && delta_y.is_finite(),
            InputEvent::PointerLeave
            | InputEvent::PointerCancel
            | InputEvent::PinchEnd
            | InputEvent::KeyUp { .. } => true,
        };
        if finite {
            Ok(())
        } else {
            Err(ViewerError::NonFiniteCoordinate { event: self.name() })
        }
    }
}

/// Zoom step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Direction from a wheel delta: scrolling up zooms in. Zero gives none.
    pub fn from_wheel_delta(delta_y: f64) -> Option<Self> {
        if delta_y < 0.0 {
            Some(ZoomDirection::In)
        } else if delta_y > 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }
}

/// What the viewer should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Pan the image by a screen delta.
    Pan { dx: f64, dy: f64 },
    /// Zoom one step around a page-relative focal point.
    Zoom { focal: Point, direction: ZoomDirection },
    /// A press/release that did not move far enough to be a drag.
    Click { position: Point },
    /// Pointer hover, for the rubber-band preview edge.
    Preview { position: Point },
    /// Abort the in-progress polygon.
    Cancel,
}

/// Current gesture phase. Dragging and pinching are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    Pinching,
}

/// Gesture bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    pub phase: GesturePhase,
    /// Set once the drag passed the click threshold
    pub has_moved: bool,
    /// Where the current drag started
    pub start_drag: Point,
    /// Last cursor position seen during the drag
    pub drag_cursor: Point,
    /// Distance between the two contacts at the last pinch update
    pub pinch_distance: f64,
}

impl GestureState {
    pub fn is_dragging(&self) -> bool {
        self.phase == GesturePhase::Dragging
    }

    pub fn is_scaling(&self) -> bool {
        self.phase == GesturePhase::Pinching
    }
}

/// State machine classifying raw input into intents.
#[derive(Debug, Clone)]
pub struct GestureController {
    state: GestureState,
    drag_threshold: f64,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(DRAG_THRESHOLD)
    }
}

impl GestureController {
    pub fn new(drag_threshold: f64) -> Self {
        Self {
            state: GestureState::default(),
            drag_threshold,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn phase(&self) -> GesturePhase {
        self.state.phase
    }

    /// Drop any in-flight gesture.
    pub fn reset(&mut self) {
        self.state = GestureState::default();
    }

    /// Feed one event and collect the resulting intents, in the order they
    /// should be applied.
    ///
    /// Events with non-finite coordinates are rejected before any state
    /// changes.
    pub fn dispatch(&mut self, event: &InputEvent) -> Result<Vec<Intent>, ViewerError> {
        event.validate()?;
        let (next, intents) = transition(self.state, event, self.drag_threshold);
        if next.phase != self.state.phase {
            log::debug!("Gesture {:?} -> {:?} on {}", self.state.phase, next.phase, event.name());
        }
        self.state = next;
        Ok(intents)
    }
}

/// Pure transition function: `(state, event) -> (state', intents)`.
pub fn transition(state: GestureState, event: &InputEvent, threshold: f64) -> (GestureState, Vec<Intent>) {
    use GesturePhase::*;

    match (*event, state.phase) {
        (InputEvent::PointerDown { position }, Idle) => (
            GestureState {
                phase: Dragging,
                has_moved: false,
                start_drag: position,
                drag_cursor: position,
                pinch_distance: 0.0,
            },
            Vec::new(),
        ),
        // A second press while dragging, or any press while pinching, is ignored
        (InputEvent::PointerDown { .. }, _) => (state, Vec::new()),

        (InputEvent::PointerMove { position }, Dragging) => {
            let (dx, dy) = position.offset_from(&state.drag_cursor);
            let next = GestureState {
                has_moved: state.has_moved || passed_threshold(&state.start_drag, &position, threshold),
                drag_cursor: position,
                ..state
            };
            let mut intents = Vec::with_capacity(2);
            if dx != 0.0 || dy != 0.0 {
                intents.push(Intent::Pan { dx, dy });
            }
            intents.push(Intent::Preview { position });
            (next, intents)
        }
        (InputEvent::PointerMove { position }, Idle) => (state, vec![Intent::Preview { position }]),
        (InputEvent::PointerMove { .. }, Pinching) => (state, Vec::new()),

        (InputEvent::PointerUp { position }, Dragging) => {
            let moved = state.has_moved || passed_threshold(&state.start_drag, &position, threshold);
            let intents = if moved {
                Vec::new()
            } else {
                vec![Intent::Click { position }]
            };
            (GestureState::default(), intents)
        }
        (InputEvent::PointerUp { .. }, _) => (state, Vec::new()),

        (InputEvent::PointerLeave | InputEvent::PointerCancel, _) => (GestureState::default(), Vec::new()),

        // Pinch wins over an in-flight drag
        (InputEvent::PinchStart { first, second }, _) => (
            GestureState {
                phase: Pinching,
                pinch_distance: first.distance_to(&second),
                ..GestureState::default()
            },
            Vec::new(),
        ),

        (InputEvent::PinchMove { first, second }, Pinching) => {
            let distance = first.distance_to(&second);
            let focal = first.midpoint(&second);
            let intents = if distance > state.pinch_distance {
                vec![Intent::Zoom { focal, direction: ZoomDirection::In }]
            } else if distance < state.pinch_distance {
                vec![Intent::Zoom { focal, direction: ZoomDirection::Out }]
            } else {
                Vec::new()
            };
            (
                GestureState {
                    pinch_distance: distance,
                    ..state
                },
                intents,
            )
        }
        (InputEvent::PinchMove { .. }, _) => (state, Vec::new()),

        (InputEvent::PinchEnd, Pinching) => (GestureState::default(), Vec::new()),
        (InputEvent::PinchEnd, _) => (state, Vec::new()),

        (InputEvent::Wheel { position, delta_y }, _) => {
            let intents: Vec<Intent> = ZoomDirection::from_wheel_delta(delta_y)
                .map(|direction| Intent::Zoom { focal: position, direction })
                .into_iter()
                .collect();
            (state, intents)
        }

        (InputEvent::KeyUp { key: Key::Escape }, _) => (state, vec![Intent::Cancel]),
        (InputEvent::KeyUp { .. }, _) => (state, Vec::new()),
    }
}

fn passed_threshold(start: &Point, position: &Point, threshold: f64) -> bool {
    (position.x - start.x).abs() >= threshold || (position.y - start.y).abs() >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerDown { position: Point::new(x, y) }
    }

    fn mv(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove { position: Point::new(x, y) }
    }

    fn up(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerUp { position: Point::new(x, y) }
    }

    fn run(controller: &mut GestureController, events: &[InputEvent]) -> Vec<Intent> {
        events
            .iter()
            .flat_map(|e| controller.dispatch(e).expect("valid event"))
            .collect()
    }

    fn clicks(intents: &[Intent]) -> usize {
        intents.iter().filter(|i| matches!(i, Intent::Click { .. })).count()
    }

    #[test]
    fn test_press_release_without_move_is_click() {
        let mut gc = GestureController::default();
        let intents = run(&mut gc, &[down(100.0, 100.0), up(100.0, 100.0)]);
        assert_eq!(intents, vec![Intent::Click { position: Point::new(100.0, 100.0) }]);
        assert_eq!(gc.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_small_wiggle_is_still_click() {
        let mut gc = GestureController::default();
        let intents = run(
            &mut gc,
            &[down(100.0, 100.0), mv(110.0, 119.0), mv(119.9, 90.0), up(119.9, 81.0)],
        );
        assert_eq!(clicks(&intents), 1);
    }

    #[test]
    fn test_threshold_reached_suppresses_click() {
        let mut gc = GestureController::default();
        let intents = run(&mut gc, &[down(100.0, 100.0), mv(120.0, 100.0), mv(100.0, 100.0), up(100.0, 100.0)]);
        assert_eq!(clicks(&intents), 0);

        let intents = run(&mut gc, &[down(0.0, 0.0), mv(0.0, -20.0), up(0.0, -20.0)]);
        assert_eq!(clicks(&intents), 0);
    }

    #[test]
    fn test_release_far_away_without_moves_is_drag() {
        let mut gc = GestureController::default();
        let intents = run(&mut gc, &[down(0.0, 0.0), up(50.0, 0.0)]);
        assert!(intents.is_empty());
    }

    #[test]
    fn test_drag_emits_incremental_pans() {
        let mut gc = GestureController::default();
        let intents = run(&mut gc, &[down(10.0, 10.0), mv(15.0, 12.0), mv(40.0, 2.0)]);
        let pans: Vec<_> = intents
            .iter()
            .filter_map(|i| match i {
                Intent::Pan { dx, dy } => Some((*dx, *dy)),
                _ => None,
            })
            .collect();
        assert_eq!(pans, vec![(5.0, 2.0), (25.0, -10.0)]);
        assert!(gc.state().has_moved);
        assert_eq!(gc.state().drag_cursor, Point::new(40.0, 2.0));
    }

    #[test]
    fn test_hover_only_previews() {
        let mut gc = GestureController::default();
        let intents = run(&mut gc, &[mv(5.0, 5.0)]);
        assert_eq!(intents, vec![Intent::Preview { position: Point::new(5.0, 5.0) }]);
        assert_eq!(gc.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_pinch_takes_priority_over_drag() {
        let mut gc = GestureController::default();
        run(&mut gc, &[down(100.0, 100.0)]);
        assert!(gc.state().is_dragging());

        run(
            &mut gc,
            &[InputEvent::PinchStart {
                first: Point::new(100.0, 100.0),
                second: Point::new(200.0, 100.0),
            }],
        );
        assert!(gc.state().is_scaling());
        assert!(!gc.state().is_dragging());

        // Single-pointer traffic during a pinch is ignored, including the release
        let intents = run(&mut gc, &[mv(130.0, 100.0), up(100.0, 100.0)]);
        assert!(intents.is_empty());
        assert!(gc.state().is_scaling());
    }

    #[test]
    fn test_pinch_direction_and_focal() {
        let mut gc = GestureController::default();
        let a = Point::new(100.0, 100.0);
        let intents = run(
            &mut gc,
            &[
                InputEvent::PinchStart { first: a, second: Point::new(200.0, 100.0) },
                InputEvent::PinchMove { first: a, second: Point::new(300.0, 100.0) },
                InputEvent::PinchMove { first: a, second: Point::new(300.0, 100.0) },
                InputEvent::PinchMove { first: a, second: Point::new(150.0, 100.0) },
                InputEvent::PinchEnd,
            ],
        );
        assert_eq!(
            intents,
            vec![
                Intent::Zoom { focal: Point::new(200.0, 100.0), direction: ZoomDirection::In },
                Intent::Zoom { focal: Point::new(125.0, 100.0), direction: ZoomDirection::Out },
            ]
        );
        assert_eq!(gc.phase(), GesturePhase::Idle);
        assert_eq!(gc.state().pinch_distance, 0.0);
    }

    #[test]
    fn test_wheel_does_not_change_phase() {
        let mut gc = GestureController::default();
        let p = Point::new(10.0, 20.0);
        let intents = run(
            &mut gc,
            &[
                InputEvent::Wheel { position: p, delta_y: -3.0 },
                InputEvent::Wheel { position: p, delta_y: 0.0 },
                InputEvent::Wheel { position: p, delta_y: 120.0 },
            ],
        );
        assert_eq!(
            intents,
            vec![
                Intent::Zoom { focal: p, direction: ZoomDirection::In },
                Intent::Zoom { focal: p, direction: ZoomDirection::Out },
            ]
        );
        assert_eq!(gc.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_leave_discards_drag() {
        let mut gc = GestureController::default();
        run(&mut gc, &[down(0.0, 0.0), mv(5.0, 5.0), InputEvent::PointerLeave]);
        assert_eq!(*gc.state(), GestureState::default());

        // A release after leaving is not a click
        let intents = run(&mut gc, &[up(5.0, 5.0)]);
        assert!(intents.is_empty());
    }

    #[test]
    fn test_escape_cancels_in_any_phase() {
        let mut gc = GestureController::default();
        run(&mut gc, &[down(0.0, 0.0)]);
        let intents = run(&mut gc, &[InputEvent::KeyUp { key: Key::Escape }]);
        assert_eq!(intents, vec![Intent::Cancel]);
        assert!(gc.state().is_dragging());

        let intents = run(&mut gc, &[InputEvent::KeyUp { key: Key::Char('a') }]);
        assert!(intents.is_empty());
    }

    #[test]
    fn test_non_finite_input_rejected_without_state_change() {
        let mut gc = GestureController::default();
        run(&mut gc, &[down(0.0, 0.0)]);
        let before = *gc.state();

        let err = gc.dispatch(&mv(f64::NAN, 3.0)).unwrap_err();
        assert_eq!(err, ViewerError::NonFiniteCoordinate { event: "pointer_move" });
        assert_eq!(*gc.state(), before);

        assert!(gc
            .dispatch(&InputEvent::Wheel { position: Point::ORIGIN, delta_y: f64::INFINITY })
            .is_err());
    }

    #[test]
    fn test_event_json_shape() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type": "pointer_down", "position": {"x": 1.5, "y": 2}}"#).unwrap();
        assert_eq!(event, down(1.5, 2.0));

        let event: InputEvent = serde_json::from_str(r#"{"type": "key_up", "key": "escape"}"#).unwrap();
        assert_eq!(event, InputEvent::KeyUp { key: Key::Escape });
    }

    #[test]
    fn test_zoom_direction_from_wheel_delta() {
        assert_eq!(ZoomDirection::from_wheel_delta(-0.5), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_wheel_delta(3.0), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_wheel_delta(0.0), None);
    }
}
