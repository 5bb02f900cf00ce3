//! Container widgets.
//!
//! Containers implement the child-management contract of the widget trait
//! (`add`/`remove`/`remove_all`) over container-specific storage, keep the
//! arena's parent back-references consistent through
//! [`TreeCtx::link_child`](crate::tree::TreeCtx::link_child) /
//! [`unlink_child`](crate::tree::TreeCtx::unlink_child), and trigger a
//! resize whenever membership changes.

mod align;
mod stack;

pub use align::Align;
pub use stack::{Orientation, Stack};

use horizon_trellis_draw::{Color, Rect, Surface};

/// Fill the area of `outer` not covered by `inner`.
pub(crate) fn fill_frame(surface: &mut dyn Surface, color: Color, outer: Rect, inner: Rect) {
    let Some(inner) = outer.intersection(&inner) else {
        surface.fill_rect(color, outer);
        return;
    };
    // Top band.
    if inner.top > outer.top {
        surface.fill_rect(
            color,
            Rect::new(outer.left, outer.top, outer.width, inner.top - outer.top),
        );
    }
    // Bottom band.
    if inner.bottom() < outer.bottom() {
        surface.fill_rect(
            color,
            Rect::new(
                outer.left,
                inner.bottom(),
                outer.width,
                outer.bottom() - inner.bottom(),
            ),
        );
    }
    // Left and right bands beside the inner rectangle.
    if inner.left > outer.left {
        surface.fill_rect(
            color,
            Rect::new(outer.left, inner.top, inner.left - outer.left, inner.height),
        );
    }
    if inner.right() < outer.right() {
        surface.fill_rect(
            color,
            Rect::new(
                inner.right(),
                inner.top,
                outer.right() - inner.right(),
                inner.height,
            ),
        );
    }
}
