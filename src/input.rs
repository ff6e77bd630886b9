//! Input handling for viewer sessions.
//!
//! Raw window events are reduced to [`InputEvent`]s, which the session drains
//! once per frame. [`DragState`] turns a stream of pointer events into
//! rotation deltas while the primary button is held.
//!
//! # Drag lifecycle
//!
//! ```text
//! Idle --press--> Dragging { last = cursor }
//! Dragging --move(p)--> Dragging { last = p }, emits p - last
//! Dragging --release--> Idle
//! ```

use glam::DVec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// Session-level view of a window event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The window was asked to close.
    Quit,
    ButtonPressed(MouseButton),
    ButtonReleased(MouseButton),
    /// The pointer moved to this position in physical pixels.
    CursorMoved(DVec2),
}

impl InputEvent {
    /// Translate a winit event, ignoring the ones the session has no use for.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CloseRequested => Some(InputEvent::Quit),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(*button);
                Some(match state {
                    ElementState::Pressed => InputEvent::ButtonPressed(button),
                    ElementState::Released => InputEvent::ButtonReleased(button),
                })
            }
            WindowEvent::CursorMoved { position, .. } => {
                Some(InputEvent::CursorMoved(DVec2::new(position.x, position.y)))
            }
            _ => None,
        }
    }
}

/// Primary-button drag tracking.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Reference position the next delta is measured from.
        last: DVec2,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// Start dragging from `cursor`. A press while already dragging resets the
    /// reference.
    pub fn press(&mut self, cursor: DVec2) {
        *self = DragState::Dragging { last: cursor };
    }

    pub fn release(&mut self) {
        *self = DragState::Idle;
    }

    /// Feed a pointer position. Returns the delta from the reference while
    /// dragging, and `None` when idle.
    pub fn moved(&mut self, cursor: DVec2) -> Option<DVec2> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { last } => {
                let delta = cursor - *last;
                *last = cursor;
                Some(delta)
            }
        }
    }
}

/// Pointer state as seen by the session: the last known cursor position plus
/// the drag machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pointer {
    cursor: DVec2,
    drag: DragState,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> DVec2 {
        self.cursor
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    /// Apply one input event. Returns a drag delta when the event produced one.
    pub fn handle(&mut self, event: &InputEvent) -> Option<DVec2> {
        match *event {
            InputEvent::ButtonPressed(MouseButton::Left) => {
                self.drag.press(self.cursor);
                None
            }
            InputEvent::ButtonReleased(MouseButton::Left) => {
                self.drag.release();
                None
            }
            InputEvent::CursorMoved(position) => {
                self.cursor = position;
                self.drag.moved(position)
            }
            _ => None,
        }
    }
}
