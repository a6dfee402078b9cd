//! Pointer input model: buttons, points, and the drag state machine.
//!
//! The host forwards raw pointer events; `InputState` decides which of them
//! are drag samples. A drag sample is any pointer move while the primary
//! button is held. Presses and releases never produce samples on their own.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

/// A point in canvas (CSS pixel) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Gesture tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputState {
    /// No button held.
    #[default]
    Idle,
    /// Primary button held; moves are drag samples.
    Dragging,
}

impl InputState {
    /// Handle a button press. Only the primary button starts a drag.
    pub fn on_pointer_down(&mut self, button: Button) {
        if button == Button::Primary {
            *self = Self::Dragging;
        }
    }

    /// Handle a pointer move. Returns the drag sample, if this move is one.
    ///
    /// `primary_held` is the live button mask from the event. A move without
    /// the primary button ends any drag whose release was never delivered.
    pub fn on_pointer_move(&mut self, pt: Point, primary_held: bool) -> Option<Point> {
        if !primary_held {
            *self = Self::Idle;
        }
        match self {
            Self::Idle => None,
            Self::Dragging => Some(pt),
        }
    }

    /// Handle a button release.
    pub fn on_pointer_up(&mut self, button: Button) {
        if button == Button::Primary {
            *self = Self::Idle;
        }
    }

    /// Handle a cancelled pointer. Cancel events carry no button, so the
    /// gesture ends unconditionally.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}
