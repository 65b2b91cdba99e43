//! Pointer interaction model for the audio display.
//!
//! Three mutually exclusive drag modes driven by pointer events. Pointer
//! capture must be held exactly while a drag mode is live; hosts report
//! capture loss through [`PointerEvent::capture_lost`], which cancels the
//! drag and keeps whatever partial marker movement already happened.

use smallvec::SmallVec;

use crate::markers::MarkerHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    Motion,
}

/// One pointer event in display client coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: i64,
    pub y: i64,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub left_down: bool,
    pub middle_down: bool,
    pub right_down: bool,
    pub capture_lost: bool,
}

impl PointerEvent {
    #[must_use]
    pub fn motion(x: i64, y: i64) -> Self {
        Self::new(PointerEventKind::Motion, x, y)
    }

    #[must_use]
    pub fn button_down(button: MouseButton, x: i64, y: i64) -> Self {
        let mut event = Self::new(PointerEventKind::ButtonDown(button), x, y);
        match button {
            MouseButton::Left => event.left_down = true,
            MouseButton::Middle => event.middle_down = true,
            MouseButton::Right => event.right_down = true,
        }
        event
    }

    #[must_use]
    pub fn button_up(button: MouseButton, x: i64, y: i64) -> Self {
        Self::new(PointerEventKind::ButtonUp(button), x, y)
    }

    fn new(kind: PointerEventKind, x: i64, y: i64) -> Self {
        Self {
            kind,
            x,
            y,
            shift: false,
            alt: false,
            ctrl: false,
            left_down: false,
            middle_down: false,
            right_down: false,
            capture_lost: false,
        }
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_buttons_held(mut self, left: bool, middle: bool, right: bool) -> Self {
        self.left_down = left;
        self.middle_down = middle;
        self.right_down = right;
        self
    }

    #[must_use]
    pub fn with_capture_lost(mut self) -> Self {
        self.capture_lost = true;
        self
    }
}

/// Cursor the host should show over the audio strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Default,
    /// Horizontal resize cursor shown near a draggable marker.
    SizeWe,
}

/// Live marker drag: the clicked marker group plus the snap setup captured at
/// click time. The snap range is kept in pixels and converted through the
/// current zoom on every drag event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDrag {
    pub markers: SmallVec<[MarkerHandle; 4]>,
    pub button: MouseButton,
    pub default_snap: bool,
    pub snap_range_px: i64,
}

/// Mutually exclusive pointer interaction modes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingTimeline,
    DraggingMarker(MarkerDrag),
}

impl DragState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }
}
