//! Input model: editor mode, pointer buttons, and the gesture state machine.
//!
//! `EditorMode` decides whether pointer input may start a gesture at all.
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up; while dragging it owns the [`DragSession`] holding the
//! parameters captured at grant.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::drag::{DragSession, Handle};

/// How the path is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Handles on the zoomable editor (default).
    #[default]
    Drag,
    /// Form entry; the canvas shows the autoscaled preview and ignores pointers.
    Manual,
}

impl EditorMode {
    /// Whether pointer input may start a drag in this mode.
    #[must_use]
    pub fn accepts_pointer(self) -> bool {
        matches!(self, Self::Drag)
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button or a touch contact.
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// One pointer event as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Position in canvas CSS pixels.
    pub screen: Point,
    pub button: Button,
    /// Touch contacts active when the event fired; 1 for a mouse.
    pub touches: u32,
}

impl Pointer {
    /// A single-contact primary pointer at `screen`.
    #[must_use]
    pub fn primary(screen: Point) -> Self {
        Self { screen, button: Button::Primary, touches: 1 }
    }

    /// Whether this event can drive a handle drag: exactly one contact on the
    /// primary button.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.touches == 1 && self.button == Button::Primary
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A handle is being dragged.
    Dragging {
        session: DragSession,
        /// Screen position of the pointer at grant; move deltas are measured from here.
        grant_screen: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Handle under drag, if any.
    #[must_use]
    pub fn active_handle(&self) -> Option<Handle> {
        match self {
            Self::Idle => None,
            Self::Dragging { session, .. } => Some(session.handle()),
        }
    }
}
