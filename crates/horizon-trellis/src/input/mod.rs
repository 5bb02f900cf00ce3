//! Translation of winit window events into uniform event records.
//!
//! The host owns the winit event loop; it feeds each `WindowEvent` through
//! an [`EventTranslator`] and routes the resulting [`UiEvent`]s into the
//! matching toolkit window via
//! [`WidgetTree::handle_event`](crate::tree::WidgetTree::handle_event).
//!
//! ```ignore
//! let mut translator = EventTranslator::new();
//! // inside the winit event handler:
//! if let Some(ui_event) = translator.translate(&window_event) {
//!     tree.handle_event(window_id, &ui_event)?;
//! }
//! tree.process_timers();
//! ```

mod keyboard;
mod mouse;

pub use keyboard::{Key, from_winit_modifiers, from_winit_physical_key};
pub use mouse::{from_winit_mouse_button, scroll_delta};

use std::time::Instant;

use winit::event::{ElementState, WindowEvent};

use horizon_trellis_core::{EventKind, Modifiers, UiEvent};

/// Stateful winit-to-toolkit event translation.
///
/// Tracks the cursor position and modifier state between events (winit
/// reports them separately) and stamps each record with a monotonic
/// millisecond timestamp.
pub struct EventTranslator {
    epoch: Instant,
    x: i32,
    y: i32,
    modifiers: Modifiers,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            x: 0,
            y: 0,
            modifiers: Modifiers::empty(),
        }
    }

    fn now(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn stamp(&self, mut event: UiEvent) -> UiEvent {
        event.modifiers = self.modifiers;
        event.time = self.now();
        event
    }

    /// Translate one winit window event.
    ///
    /// Returns `None` for events that only update translator state or that
    /// the toolkit does not route.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<UiEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.x = position.x as i32;
                self.y = position.y as i32;
                Some(self.stamp(UiEvent::mouse_move(self.x, self.y, 0)))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = from_winit_mouse_button(*button)?;
                let kind = match state {
                    ElementState::Pressed => EventKind::MouseDown,
                    ElementState::Released => EventKind::MouseUp,
                };
                Some(self.stamp(UiEvent::mouse(kind, self.x, self.y, button, 0)))
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = scroll_delta(*delta);
                Some(self.stamp(UiEvent::scroll(self.x, self.y, dx, dy, 0)))
            }
            WindowEvent::KeyboardInput { event: key, .. } => {
                let code = from_winit_physical_key(&key.physical_key).code();
                let kind = match key.state {
                    ElementState::Pressed => EventKind::KeyDown,
                    ElementState::Released => EventKind::KeyUp,
                };
                Some(self.stamp(UiEvent::key(kind, code, 0)))
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = from_winit_modifiers(&modifiers.state());
                None
            }
            WindowEvent::Resized(size) => {
                Some(UiEvent::resize(size.width as i32, size.height as i32))
            }
            WindowEvent::Focused(focused) => {
                let kind = if *focused {
                    EventKind::FocusIn
                } else {
                    EventKind::FocusOut
                };
                Some(self.stamp(UiEvent::new(kind)))
            }
            WindowEvent::CursorEntered { .. } => {
                Some(self.stamp(UiEvent::mouse_move(self.x, self.y, 0).with_kind(EventKind::MouseIn)))
            }
            WindowEvent::CursorLeft { .. } => {
                Some(self.stamp(UiEvent::mouse_move(self.x, self.y, 0).with_kind(EventKind::MouseOut)))
            }
            WindowEvent::CloseRequested => Some(self.stamp(UiEvent::new(EventKind::CloseRequest))),
            _ => None,
        }
    }
}

impl Default for EventTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::MouseButton as WinitMouseButton;

    #[test]
    fn cursor_position_carries_into_button_events() {
        let mut t = EventTranslator::new();
        let moved = t
            .translate(&WindowEvent::CursorMoved {
                device_id: winit::event::DeviceId::dummy(),
                position: PhysicalPosition::new(33.0, 44.0),
            })
            .unwrap();
        assert_eq!(moved.kind, EventKind::MouseMove);
        assert_eq!((moved.x, moved.y), (33, 44));

        let down = t
            .translate(&WindowEvent::MouseInput {
                device_id: winit::event::DeviceId::dummy(),
                state: ElementState::Pressed,
                button: WinitMouseButton::Left,
            })
            .unwrap();
        assert_eq!(down.kind, EventKind::MouseDown);
        assert_eq!((down.x, down.y), (33, 44));
    }

    #[test]
    fn unknown_buttons_are_dropped() {
        let mut t = EventTranslator::new();
        let event = t.translate(&WindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Other(9),
        });
        assert!(event.is_none());
    }

    #[test]
    fn resize_maps_dimensions() {
        let mut t = EventTranslator::new();
        let event = t
            .translate(&WindowEvent::Resized(winit::dpi::PhysicalSize::new(640, 480)))
            .unwrap();
        assert_eq!(event.kind, EventKind::Resize);
        assert_eq!((event.x, event.y), (640, 480));
    }
}
