//! Mouse conversion from platform events.

use winit::event::{MouseButton as WinitMouseButton, MouseScrollDelta};

use horizon_trellis_core::MouseButton;

/// Pixels one scroll "line" is worth when the platform reports line deltas.
const LINE_SCROLL_PIXELS: f32 = 20.0;

/// Converts a winit mouse button to a toolkit button.
///
/// Buttons the toolkit does not route map to `None`.
pub fn from_winit_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Back => Some(MouseButton::Button4),
        WinitMouseButton::Forward => Some(MouseButton::Button5),
        WinitMouseButton::Other(_) => None,
    }
}

/// Converts a winit scroll delta to pixel deltas.
pub fn scroll_delta(delta: MouseScrollDelta) -> (f32, f32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x * LINE_SCROLL_PIXELS, y * LINE_SCROLL_PIXELS),
        MouseScrollDelta::PixelDelta(pos) => (pos.x as f32, pos.y as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_conversion() {
        assert_eq!(
            from_winit_mouse_button(WinitMouseButton::Left),
            Some(MouseButton::Left)
        );
        assert_eq!(
            from_winit_mouse_button(WinitMouseButton::Back),
            Some(MouseButton::Button4)
        );
        assert_eq!(from_winit_mouse_button(WinitMouseButton::Other(42)), None);
    }

    #[test]
    fn line_delta_scales_to_pixels() {
        assert_eq!(scroll_delta(MouseScrollDelta::LineDelta(0.0, -1.0)), (0.0, -20.0));
        let (dx, dy) = scroll_delta(MouseScrollDelta::PixelDelta(
            winit::dpi::PhysicalPosition::new(7.0, -3.0),
        ));
        assert_eq!((dx, dy), (7.0, -3.0));
    }
}
