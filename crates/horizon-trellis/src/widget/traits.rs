//! The widget capability trait.
//!
//! Widgets form a closed set of kinds, each implementing [`Widget`] over a
//! composed [`WidgetBase`]. The tree dispatches size negotiation, realize,
//! rendering and event handling through this trait object — there is no
//! inheritance chain.
//!
//! Container operations have abstract defaults (`NotImplemented` /
//! `NotFound`); only containers override them.

use std::any::Any;

use horizon_trellis_core::{EventKind, Result, Status, UiEvent};
use horizon_trellis_draw::{Color, Rect, SizeLimit, Surface};
use horizon_trellis_style::Atom;

use crate::prop::{PropTag, tags};
use crate::tree::{TreeCtx, WidgetId, WidgetTree};
use crate::widget::base::WidgetBase;
use crate::widget::flags::WidgetFlags;
use crate::widget::slots::{SlotKey, execute_slot};

/// Behavior of one widget kind.
pub trait Widget: Any {
    /// The style class name; also used for diagnostics.
    fn type_name(&self) -> &'static str;

    fn base(&self) -> &WidgetBase;
    fn base_mut(&mut self) -> &mut WidgetBase;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn as_widget_mut(&mut self) -> &mut dyn Widget;

    /// Bind properties to the widget's style node.
    ///
    /// On failure the widget stays usable only for destruction.
    fn init(&mut self, ctx: &mut TreeCtx<'_>) -> Result<()> {
        let mut props = ctx.props();
        self.base_mut().bind_core(&mut props)
    }

    /// Release bindings. Must be idempotent; the tree may call it on a
    /// widget whose `init` failed.
    fn destroy(&mut self, ctx: &mut TreeCtx<'_>) {
        self.base_mut().unbind_core(ctx.sheet_mut());
    }

    /// A property of this widget changed value.
    fn property_changed(&mut self, tag: PropTag, ctx: &mut TreeCtx<'_>) {
        default_property_changed(self, tag, ctx);
    }

    /// The style cascade changed an attribute this widget is bound to.
    fn style_changed(&mut self, atom: Atom, ctx: &mut TreeCtx<'_>) {
        let mut props = ctx.props();
        self.base_mut().commit_atom(atom, &mut props);
    }

    /// Take the next queued property notification.
    fn poll_queued(&mut self) -> Option<PropTag> {
        self.base_mut().poll_queued()
    }

    /// Adjust the re-entrancy lock of the property named by `tag`.
    fn lock_property(&mut self, tag: PropTag, locked: bool) {
        self.base_mut().lock_property(tag, locked);
    }

    /// Report intrinsic size limits, without this widget's own padding.
    ///
    /// The default leaf has no opinion on either axis.
    fn size_request(&mut self, ctx: &mut TreeCtx<'_>, limit: &mut SizeLimit) {
        let _ = (ctx, limit);
    }

    /// Accept the allocated rectangle (already net of this widget's
    /// padding). Containers partition it among children here.
    fn realize(&mut self, ctx: &mut TreeCtx<'_>, rect: Rect) {
        let _ = (ctx, rect);
    }

    /// Paint into `surface`, restricted to `area`.
    fn render(&mut self, ctx: &mut TreeCtx<'_>, surface: &mut dyn Surface, area: Rect, force: bool) {
        let _ = force;
        let rect = ctx.rect();
        if let Some(clip) = rect.intersection(&area) {
            let color = actual_bg_color(self, ctx);
            surface.fill_rect(color, clip);
        }
    }

    /// Hit-test a window coordinate. Containers recurse; the default leaf
    /// answers for itself.
    fn find_widget(&self, tree: &WidgetTree, x: i32, y: i32) -> Option<WidgetId> {
        let id = self.base().id();
        (self.base().is_visible() && tree.rect(id).contains(x, y)).then_some(id)
    }

    /// Handle a routed input event.
    fn handle_event(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        default_handle_event(self, ctx, event)
    }

    // -------------------------------------------------------------------------
    // Container contract
    // -------------------------------------------------------------------------

    fn add(&mut self, ctx: &mut TreeCtx<'_>, child: WidgetId) -> Result<()> {
        let _ = (ctx, child);
        Err(Status::NotImplemented)
    }

    fn remove(&mut self, ctx: &mut TreeCtx<'_>, child: WidgetId) -> Result<()> {
        let _ = (ctx, child);
        Err(Status::NotFound)
    }

    fn remove_all(&mut self, ctx: &mut TreeCtx<'_>) -> Result<()> {
        let _ = ctx;
        Err(Status::NotImplemented)
    }

    // -------------------------------------------------------------------------
    // Event hooks
    // -------------------------------------------------------------------------

    fn on_mouse_down(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_mouse_up(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_mouse_move(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_mouse_in(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_mouse_out(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_mouse_scroll(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_mouse_click(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_key_down(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_key_up(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_focus_in(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }

    fn on_focus_out(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let _ = (ctx, event);
        Ok(())
    }
}

/// The slot a routed event executes, if any.
pub fn slot_for_event(kind: EventKind) -> Option<SlotKey> {
    match kind {
        EventKind::MouseDown => Some(SlotKey::MouseDown),
        EventKind::MouseUp => Some(SlotKey::MouseUp),
        EventKind::MouseMove => Some(SlotKey::MouseMove),
        EventKind::MouseScroll => Some(SlotKey::MouseScroll),
        EventKind::MouseIn => Some(SlotKey::MouseIn),
        EventKind::MouseOut => Some(SlotKey::MouseOut),
        EventKind::MouseClick => Some(SlotKey::MouseClick),
        EventKind::MouseDoubleClick => Some(SlotKey::MouseDoubleClick),
        EventKind::MouseTripleClick => Some(SlotKey::MouseTripleClick),
        EventKind::KeyDown => Some(SlotKey::KeyDown),
        EventKind::KeyUp => Some(SlotKey::KeyUp),
        EventKind::FocusIn => Some(SlotKey::FocusIn),
        EventKind::FocusOut => Some(SlotKey::FocusOut),
        EventKind::Show => Some(SlotKey::Show),
        EventKind::Hide => Some(SlotKey::Hide),
        EventKind::Resize => Some(SlotKey::Resize),
        EventKind::CloseRequest => Some(SlotKey::Close),
        _ => None,
    }
}

/// Default event handling: run the matching hook, then the slot.
pub fn default_handle_event<W: Widget + ?Sized>(
    widget: &mut W,
    ctx: &mut TreeCtx<'_>,
    event: &UiEvent,
) -> Result<()> {
    match event.kind {
        EventKind::MouseDown => widget.on_mouse_down(ctx, event)?,
        EventKind::MouseUp => widget.on_mouse_up(ctx, event)?,
        EventKind::MouseMove => widget.on_mouse_move(ctx, event)?,
        EventKind::MouseIn => widget.on_mouse_in(ctx, event)?,
        EventKind::MouseOut => widget.on_mouse_out(ctx, event)?,
        EventKind::MouseScroll => widget.on_mouse_scroll(ctx, event)?,
        EventKind::MouseClick
        | EventKind::MouseDoubleClick
        | EventKind::MouseTripleClick => widget.on_mouse_click(ctx, event)?,
        EventKind::KeyDown => widget.on_key_down(ctx, event)?,
        EventKind::KeyUp => widget.on_key_up(ctx, event)?,
        EventKind::FocusIn => widget.on_focus_in(ctx, event)?,
        EventKind::FocusOut => widget.on_focus_out(ctx, event)?,
        _ => {}
    }
    match slot_for_event(event.kind) {
        Some(key) => execute_slot(widget, ctx, key, event),
        None => Ok(()),
    }
}

/// Default reaction to a core property change.
pub fn default_property_changed<W: Widget + ?Sized>(
    widget: &mut W,
    tag: PropTag,
    ctx: &mut TreeCtx<'_>,
) {
    match tag {
        tags::PADDING | tags::ALLOCATION | tags::SCALING => ctx.query_resize(),
        tags::VISIBILITY => {
            let visible = widget.base().is_visible();
            let (key, kind) = if visible {
                (SlotKey::Show, EventKind::Show)
            } else {
                (SlotKey::Hide, EventKind::Hide)
            };
            let _ = execute_slot(widget, ctx, key, &UiEvent::new(kind));
            ctx.query_resize();
        }
        tags::BG_COLOR | tags::BG_INHERIT | tags::BRIGHTNESS => {
            ctx.query_draw(WidgetFlags::REDRAW_SURFACE);
        }
        _ => {}
    }
}

/// The background color a widget actually paints with.
///
/// Resolves `bg.inherit` against the ancestor chain and applies the
/// brightness multiplier.
pub fn actual_bg_color<W: Widget + ?Sized>(widget: &W, ctx: &TreeCtx<'_>) -> Color {
    let base = widget.base();
    let color = if *base.bg_inherit.peek() {
        ctx.inherited_bg_color()
            .unwrap_or_else(|| base.bg_color.get())
    } else {
        base.bg_color.get()
    };
    color.scaled(base.brightness.peek().max(0.0))
}
