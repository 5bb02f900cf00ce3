//! The uniform input event record.
//!
//! The host translates whatever its native event pump delivers into
//! [`UiEvent`] records and feeds them to the window layer. One flat record
//! covers every event kind; fields that do not apply to a kind are zero.

use bitflags::bitflags;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    MouseDown,
    MouseUp,
    MouseMove,
    MouseScroll,
    /// Synthesized when the pointer enters a widget's bounds.
    MouseIn,
    /// Synthesized when the pointer leaves a widget's bounds.
    MouseOut,
    /// Synthesized from a balanced down/up pair on the same widget.
    MouseClick,
    MouseDoubleClick,
    MouseTripleClick,
    KeyDown,
    KeyUp,
    FocusIn,
    FocusOut,
    /// The native window reported a new size.
    Resize,
    Show,
    Hide,
    CloseRequest,
    /// Synthesized while a widget is being torn down.
    Destroy,
}

/// A mouse button, also usable as a bit in a pressed-button mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Button4,
    Button5,
}

impl MouseButton {
    /// Stable numeric code carried in [`UiEvent::code`].
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }

    #[inline]
    pub const fn mask(self) -> u32 {
        1 << self as u32
    }

    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            3 => Some(Self::Button4),
            4 => Some(Self::Button5),
            _ => None,
        }
    }
}

bitflags! {
    /// Keyboard modifier state at the time of an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u32 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const META  = 1 << 3;
    }
}

/// A single input event in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiEvent {
    pub kind: EventKind,
    /// Pointer position, window-relative. Zero for keyboard events.
    pub x: i32,
    pub y: i32,
    /// Button code for mouse events, key code for keyboard events,
    /// zero otherwise.
    pub code: u32,
    /// Scroll delta for [`EventKind::MouseScroll`].
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub modifiers: Modifiers,
    /// Millisecond timestamp from the native pump; used for click synthesis.
    pub time: u64,
}

impl UiEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            x: 0,
            y: 0,
            code: 0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            modifiers: Modifiers::empty(),
            time: 0,
        }
    }

    pub fn mouse(kind: EventKind, x: i32, y: i32, button: MouseButton, time: u64) -> Self {
        Self {
            x,
            y,
            code: button.code(),
            time,
            ..Self::new(kind)
        }
    }

    pub fn mouse_move(x: i32, y: i32, time: u64) -> Self {
        Self {
            x,
            y,
            time,
            ..Self::new(EventKind::MouseMove)
        }
    }

    pub fn scroll(x: i32, y: i32, dx: f32, dy: f32, time: u64) -> Self {
        Self {
            x,
            y,
            scroll_x: dx,
            scroll_y: dy,
            time,
            ..Self::new(EventKind::MouseScroll)
        }
    }

    pub fn key(kind: EventKind, code: u32, time: u64) -> Self {
        Self {
            code,
            time,
            ..Self::new(kind)
        }
    }

    pub fn resize(width: i32, height: i32) -> Self {
        Self {
            x: width,
            y: height,
            ..Self::new(EventKind::Resize)
        }
    }

    /// The mouse button for button events, if the code is a known button.
    pub fn button(&self) -> Option<MouseButton> {
        MouseButton::from_code(self.code)
    }

    /// A copy of this event with a different kind, everything else kept.
    pub fn with_kind(&self, kind: EventKind) -> Self {
        Self { kind, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_codes_round_trip() {
        for b in [
            MouseButton::Left,
            MouseButton::Middle,
            MouseButton::Right,
            MouseButton::Button4,
            MouseButton::Button5,
        ] {
            assert_eq!(MouseButton::from_code(b.code()), Some(b));
        }
        assert_eq!(MouseButton::from_code(99), None);
    }

    #[test]
    fn button_masks_are_disjoint() {
        let all = MouseButton::Left.mask()
            | MouseButton::Middle.mask()
            | MouseButton::Right.mask()
            | MouseButton::Button4.mask()
            | MouseButton::Button5.mask();
        assert_eq!(all.count_ones(), 5);
    }

    #[test]
    fn with_kind_preserves_payload() {
        let e = UiEvent::mouse(EventKind::MouseDown, 10, 20, MouseButton::Left, 42);
        let out = e.with_kind(EventKind::MouseOut);
        assert_eq!(out.kind, EventKind::MouseOut);
        assert_eq!((out.x, out.y, out.code, out.time), (10, 20, 0, 42));
    }
}
