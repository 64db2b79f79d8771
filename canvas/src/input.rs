//! Input model: pointer buttons and kinds, modifier keys, keys, and wheel deltas.
//!
//! These are the types the interactive layers consume. The browser binding
//! converts DOM events into them; tests and the CLI construct them directly.
//! Positions are already in logical game units by the time they arrive here.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key; treated like ctrl for shortcuts.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value; unknown buttons are ignored.
    #[must_use]
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Map a DOM `PointerEvent.pointerType`. Anything unrecognised is a mouse.
    #[must_use]
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "touch" => Self::Touch,
            "pen" => Self::Pen,
            _ => Self::Mouse,
        }
    }

    /// Mice aim on press; touch and pen aim by dragging.
    #[must_use]
    pub fn drags_to_aim(self) -> bool {
        !matches!(self, Self::Mouse)
    }
}

/// One pointer event in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub at: Point,
    pub button: Button,
    pub kind: PointerKind,
    pub modifiers: Modifiers,
}

impl PointerInput {
    /// Primary-button mouse event at `at`.
    #[must_use]
    pub fn mouse(at: Point) -> Self {
        Self { at, button: Button::Primary, kind: PointerKind::Mouse, modifiers: Modifiers::default() }
    }

    /// Touch contact at `at`.
    #[must_use]
    pub fn touch(at: Point) -> Self {
        Self { at, button: Button::Primary, kind: PointerKind::Touch, modifiers: Modifiers::default() }
    }

    #[must_use]
    pub fn with_button(mut self, button: Button) -> Self {
        self.button = button;
        self
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"r"`, `"ArrowUp"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Case-insensitive match against a single-character key name.
    #[must_use]
    pub fn is_letter(&self, letter: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
    }
}

/// Whether an element with this tag, or one that is content-editable, takes
/// typed text. Key bindings stay out of its way.
#[must_use]
pub fn is_text_entry(tag_name: &str, content_editable: bool) -> bool {
    content_editable || ["INPUT", "TEXTAREA", "SELECT"].iter().any(|tag| tag_name.eq_ignore_ascii_case(tag))
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}
