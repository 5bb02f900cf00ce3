//! The top-level window: native binding and event routing.
//!
//! A [`Window`] is a single-child container at the root of a widget subtree.
//! It owns the binding to the native platform window and runs three
//! independent routing state machines over the uniform event records the
//! host pumps in:
//!
//! - **Mouse capture**: the widget hit by a button-down receives every mouse
//!   event of the gesture — including moves outside its bounds — until the
//!   pressed-button mask returns to zero. Boundary crossings synthesize
//!   mouse-in/mouse-out without breaking capture. Click, double-click and
//!   triple-click events are synthesized from balanced down/up pairs on the
//!   stable capture target.
//! - **Keyboard focus**: key-downs go to the focused widget; each key-up is
//!   delivered to whichever widget saw the matching key-down, even if focus
//!   moved in between.
//! - **Hover**: while no capture is active, pointer motion maintains the
//!   hovered widget and synthesizes in/out transitions.
//!
//! Geometry flows through [`Window::sync_size`]: the window derives its size
//! from the child's request and its own constraints/policy, asks the native
//! layer to match, and re-realizes the tree — it never trusts the native
//! size blindly. Redraw requests coalesce on a one-shot timer; the flush
//! resolves pending layout before any painting.

use horizon_trellis_core::{EventKind, Result, Status, UiEvent};
use horizon_trellis_draw::{Color, NativeWindow, Rect, Size, SizeLimit, Surface};
use horizon_trellis_style::{Atom, StyleValue};

use crate::prop::{Layout, PropTag, PropValue, Property, SizeConstraints, tags};
use crate::tree::{TreeCtx, WidgetId, WidgetTree};
use crate::widget::{
    SlotKey, Widget, WidgetBase, WidgetFlags, actual_bg_color, default_handle_event,
    default_property_changed, execute_slot,
};

const TAG_TITLE: PropTag = PropTag(tags::WIDGET_BASE);
const TAG_ROLE: PropTag = PropTag(tags::WIDGET_BASE + 1);
const TAG_BORDER_COLOR: PropTag = PropTag(tags::WIDGET_BASE + 2);
const TAG_BORDER_SIZE: PropTag = PropTag(tags::WIDGET_BASE + 3);
const TAG_POLICY: PropTag = PropTag(tags::WIDGET_BASE + 4);
const TAG_CONSTRAINTS: PropTag = PropTag(tags::WIDGET_BASE + 5);
const TAG_LAYOUT: PropTag = PropTag(tags::WIDGET_BASE + 6);

/// Two clicks on the same widget within this window chain into a
/// double/triple click.
const CLICK_TIME_MS: u64 = 400;
const CLICK_DISTANCE: i32 = 4;

/// How the window derives its size from the widget tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPolicy {
    /// Keep the user-driven size, clamped into the computed limits.
    #[default]
    Normal,
    /// Take as much space as the limits allow.
    Greedy,
    /// Always exactly the computed minimum; the user cannot resize.
    Fixed,
}

impl WindowPolicy {
    fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Greedy => "greedy",
            Self::Fixed => "fixed",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            _ if name.eq_ignore_ascii_case("normal") => Some(Self::Normal),
            _ if name.eq_ignore_ascii_case("greedy") => Some(Self::Greedy),
            _ if name.eq_ignore_ascii_case("fixed") => Some(Self::Fixed),
            _ => None,
        }
    }
}

impl PropValue for WindowPolicy {
    fn to_style(&self) -> StyleValue {
        StyleValue::String(self.name().to_string())
    }

    fn from_style(value: &StyleValue) -> Option<Self> {
        value.as_str().and_then(Self::from_name)
    }
}

/// Mouse-capture state: one gesture, one target.
#[derive(Debug, Default)]
struct MouseGrab {
    /// Pressed-button mask; capture releases when it returns to zero.
    mask: u32,
    /// Last known pointer position.
    x: i32,
    y: i32,
    /// The widget owning the gesture.
    target: Option<WidgetId>,
    /// Whether the pointer was last seen inside the target's bounds.
    inside: bool,
}

/// Pending click chain for double/triple synthesis.
#[derive(Debug, Clone, Copy)]
struct ClickChain {
    widget: WidgetId,
    button: u32,
    x: i32,
    y: i32,
    time: u64,
    count: u32,
}

/// Top-level container bound to a native window.
pub struct Window {
    base: WidgetBase,
    child: Option<WidgetId>,
    native: Option<Box<dyn NativeWindow>>,
    mapped: bool,

    focused: Option<WidgetId>,
    hover: Option<WidgetId>,
    mouse: MouseGrab,
    clicks: Option<ClickChain>,
    /// Key codes currently down, each with the widget owed the key-up.
    keys: Vec<(u32, WidgetId)>,

    /// Window title, mirrored to the native layer.
    pub title: Property<String>,
    /// Window role hint for the host window manager.
    pub role: Property<String>,
    /// Border ring color.
    pub border_color: Property<Color>,
    /// Border ring width in unscaled pixels.
    pub border_size: Property<i64>,
    /// Size derivation policy.
    pub policy: Property<WindowPolicy>,
    /// Explicit window size overrides.
    pub constraints: SizeConstraints,
    /// Child placement within the window.
    pub layout: Layout,
}

impl Window {
    /// A window without a platform binding; painting degrades to a no-op
    /// until [`bind_native`](Self::bind_native) is called.
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            child: None,
            native: None,
            mapped: false,
            focused: None,
            hover: None,
            mouse: MouseGrab::default(),
            clicks: None,
            keys: Vec::new(),
            title: Property::new(TAG_TITLE, String::new()),
            role: Property::new(TAG_ROLE, String::new()),
            border_color: Property::new(TAG_BORDER_COLOR, Color::BLACK),
            border_size: Property::new(TAG_BORDER_SIZE, 0),
            policy: Property::new(TAG_POLICY, WindowPolicy::Normal),
            constraints: SizeConstraints::new(TAG_CONSTRAINTS),
            layout: Layout::new(TAG_LAYOUT),
        }
    }

    /// A window bound to a platform window from the start.
    pub fn with_native(native: Box<dyn NativeWindow>) -> Self {
        let mut window = Self::new();
        window.native = Some(native);
        window
    }

    /// Acquire the native binding.
    pub fn bind_native(&mut self, native: Box<dyn NativeWindow>) {
        self.native = Some(native);
    }

    /// Release and return the native binding.
    pub fn release_native(&mut self) -> Option<Box<dyn NativeWindow>> {
        self.native.take()
    }

    /// Opaque native handle; `0` without a binding.
    pub fn native_handle(&self) -> usize {
        self.native.as_ref().map_or(0, |n| n.handle())
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn child(&self) -> Option<WidgetId> {
        self.child
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// The widget currently owning the mouse gesture.
    pub fn capture(&self) -> Option<WidgetId> {
        self.mouse.target
    }

    pub fn pressed_buttons(&self) -> u32 {
        self.mouse.mask
    }

    /// Key codes currently held down.
    pub fn pressed_keys(&self) -> Vec<u32> {
        self.keys.iter().map(|(c, _)| *c).collect()
    }

    /// Map the window on screen.
    pub fn show(&mut self, ctx: &mut TreeCtx<'_>) {
        if self.mapped {
            return;
        }
        self.mapped = true;
        if let Some(n) = self.native.as_mut() {
            n.show();
        }
        ctx.query_resize();
        ctx.query_draw(WidgetFlags::REDRAW_SURFACE);
        let _ = execute_slot(self, ctx, SlotKey::Show, &UiEvent::new(EventKind::Show));
    }

    /// Unmap the window.
    pub fn hide(&mut self, ctx: &mut TreeCtx<'_>) {
        if !self.mapped {
            return;
        }
        self.mapped = false;
        if let Some(n) = self.native.as_mut() {
            n.hide();
        }
        let _ = execute_slot(self, ctx, SlotKey::Hide, &UiEvent::new(EventKind::Hide));
    }

    /// Install a window icon through the native capability.
    pub fn set_icon(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<()> {
        let Some(native) = self.native.as_mut() else {
            return Err(Status::BadState);
        };
        native.set_icon(rgba, width, height);
        Ok(())
    }

    // =========================================================================
    // Routing state eviction
    // =========================================================================

    /// Forget a widget before it is freed.
    ///
    /// Called by the tree for every widget leaving this window's subtree so
    /// no event is ever dispatched to a dangling id.
    pub(crate) fn discard_widget(&mut self, id: WidgetId) {
        if self.child == Some(id) {
            self.child = None;
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.hover == Some(id) {
            self.hover = None;
        }
        if self.mouse.target == Some(id) {
            tracing::trace!(target: "horizon_trellis::window", widget = ?id, "capture target discarded");
            self.mouse.target = None;
        }
        if self.clicks.is_some_and(|c| c.widget == id) {
            self.clicks = None;
        }
        self.keys.retain(|(_, w)| *w != id);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub(crate) fn set_focus(&mut self, ctx: &mut TreeCtx<'_>, target: Option<WidgetId>) {
        if self.focused == target {
            return;
        }
        let old = std::mem::replace(&mut self.focused, target);
        tracing::trace!(target: "horizon_trellis::window", from = ?old, to = ?target, "focus moved");
        if let Some(old) = old {
            let _ = self.route(ctx, old, &UiEvent::new(EventKind::FocusOut));
        }
        if let Some(new) = target {
            let _ = self.route(ctx, new, &UiEvent::new(EventKind::FocusIn));
        }
    }

    pub(crate) fn drop_focus(&mut self, ctx: &mut TreeCtx<'_>, target: WidgetId) {
        if self.focused == Some(target) {
            self.set_focus(ctx, None);
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    fn window_limits(&mut self, ctx: &mut TreeCtx<'_>) -> SizeLimit {
        let mut limit = match self.child {
            Some(child) if ctx.child_visible(child) => {
                let mut l = ctx.padded_limits(child);
                l.max_width = -1;
                l.max_height = -1;
                l
            }
            _ => SizeLimit::UNCONSTRAINED,
        };
        let scale = self.base.scale();
        self.base.padding.get().add_to_limit(&mut limit, scale);
        self.constraints.apply(&mut limit, scale);
        limit
    }

    /// Re-derive the window geometry and re-apply the tree layout.
    ///
    /// The native size is an input, not an authority: the child request and
    /// the window's constraints/policy produce the desired size, the native
    /// layer is asked to match it, and the tree realizes at the derived
    /// size.
    pub(crate) fn sync_size(&mut self, ctx: &mut TreeCtx<'_>) {
        self.sync_size_with(ctx, None);
    }

    /// Like [`sync_size`](Self::sync_size), seeded with a size the native
    /// layer just reported.
    pub(crate) fn sync_size_with(&mut self, ctx: &mut TreeCtx<'_>, reported: Option<Size>) {
        let limit = self.window_limits(ctx);
        let current = reported
            .or_else(|| self.native.as_ref().map(|n| n.size()))
            .unwrap_or_else(|| ctx.rect().size());

        let desired = match self.policy.get() {
            WindowPolicy::Fixed => limit.clamp(Size::new(0, 0)),
            WindowPolicy::Greedy => {
                let w = if limit.max_width >= 0 {
                    limit.max_width
                } else {
                    current.width
                };
                let h = if limit.max_height >= 0 {
                    limit.max_height
                } else {
                    current.height
                };
                limit.clamp(Size::new(w, h))
            }
            WindowPolicy::Normal => limit.clamp(current),
        };

        if let Some(native) = self.native.as_mut() {
            if native.size() != desired {
                native.resize(desired);
            }
        }

        let rect = Rect::new(0, 0, desired.width, desired.height);
        tracing::trace!(target: "horizon_trellis::window", %rect, "window layout");
        ctx.insert_flags(WidgetFlags::REALIZE_ACTIVE);
        ctx.set_own_rect(rect);
        self.realize(ctx, rect);
        ctx.remove_flags(WidgetFlags::REALIZE_ACTIVE | WidgetFlags::RESIZE_ANY);
        ctx.insert_flags(WidgetFlags::REDRAW_SURFACE);
    }

    /// Resolve pending layout, then paint onto the native surface.
    ///
    /// Runs from the coalescing redraw timer. Resize is always serviced
    /// before redraw; without a native surface the paint is skipped and the
    /// dirty state still clears.
    pub(crate) fn flush(&mut self, ctx: &mut TreeCtx<'_>) {
        if ctx.flags().resize_pending() {
            self.sync_size(ctx);
        }
        if !ctx.flags().redraw_pending() {
            return;
        }
        let area = ctx.rect();
        let force = ctx.flags().contains(WidgetFlags::REDRAW_SURFACE);
        let mut native = self.native.take();
        if let Some(surface) = native.as_mut().and_then(|n| n.surface()) {
            self.render(ctx, surface, area, force);
        }
        self.native = native;
        ctx.remove_flags(WidgetFlags::REDRAW_ANY);
    }

    // =========================================================================
    // Event routing
    // =========================================================================

    fn route(&mut self, ctx: &mut TreeCtx<'_>, target: WidgetId, event: &UiEvent) -> Result<()> {
        if target == self.base.id() {
            default_handle_event(self, ctx, event)
        } else if ctx.tree.contains(target) {
            ctx.deliver_event(target, event)
        } else {
            Ok(())
        }
    }

    fn find_target(&self, ctx: &TreeCtx<'_>, x: i32, y: i32) -> WidgetId {
        self.find_hover(ctx, x, y).unwrap_or_else(|| self.base.id())
    }

    fn find_hover(&self, ctx: &TreeCtx<'_>, x: i32, y: i32) -> Option<WidgetId> {
        let child = self.child?;
        if !ctx.child_visible(child) {
            return None;
        }
        ctx.find_widget_from(child, x, y)
    }

    fn target_contains(&self, ctx: &TreeCtx<'_>, target: WidgetId, x: i32, y: i32) -> bool {
        if target == self.base.id() {
            ctx.rect().contains(x, y)
        } else {
            ctx.child_rect(target).contains(x, y)
        }
    }

    fn on_native_mouse_down(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let Some(button) = event.button() else {
            return Ok(());
        };
        if self.mouse.target.is_none() {
            let target = self.find_target(ctx, event.x, event.y);
            tracing::trace!(target: "horizon_trellis::window", widget = ?target, "capture acquired");
            self.mouse.target = Some(target);
            self.mouse.inside = self.target_contains(ctx, target, event.x, event.y);
        }
        self.mouse.mask |= button.mask();
        self.mouse.x = event.x;
        self.mouse.y = event.y;
        let target = self.mouse.target.unwrap_or_else(|| self.base.id());
        self.route(ctx, target, event)
    }

    fn on_native_mouse_up(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let Some(button) = event.button() else {
            return Ok(());
        };
        self.mouse.x = event.x;
        self.mouse.y = event.y;

        let result = if let Some(target) = self.mouse.target {
            let r = self.route(ctx, target, event);
            // A balanced down/up inside the stable target makes a click.
            if self.target_contains(ctx, target, event.x, event.y) {
                self.synthesize_click(ctx, target, event)?;
            } else {
                self.clicks = None;
            }
            r
        } else {
            Ok(())
        };

        self.mouse.mask &= !button.mask();
        if self.mouse.mask == 0 && self.mouse.target.is_some() {
            let released = self.mouse.target.take();
            tracing::trace!(target: "horizon_trellis::window", widget = ?released, "capture released");
            // Re-derive hover at the final pointer position.
            let current = self.find_hover(ctx, event.x, event.y);
            let previous = if self.mouse.inside { released } else { None };
            if current != previous {
                if let Some(old) = previous {
                    let _ = self.route(ctx, old, &event.with_kind(EventKind::MouseOut));
                }
                if let Some(new) = current {
                    let _ = self.route(ctx, new, &event.with_kind(EventKind::MouseIn));
                }
            }
            self.hover = current;
        }
        result
    }

    fn synthesize_click(
        &mut self,
        ctx: &mut TreeCtx<'_>,
        target: WidgetId,
        event: &UiEvent,
    ) -> Result<()> {
        let chained = self.clicks.is_some_and(|c| {
            c.widget == target
                && c.button == event.code
                && event.time.saturating_sub(c.time) <= CLICK_TIME_MS
                && (event.x - c.x).abs() <= CLICK_DISTANCE
                && (event.y - c.y).abs() <= CLICK_DISTANCE
        });
        let count = if chained {
            self.clicks.map_or(1, |c| c.count + 1)
        } else {
            1
        };
        let kind = match count {
            1 => EventKind::MouseClick,
            2 => EventKind::MouseDoubleClick,
            _ => EventKind::MouseTripleClick,
        };
        // A triple click ends the chain; the next click starts fresh.
        self.clicks = if count >= 3 {
            None
        } else {
            Some(ClickChain {
                widget: target,
                button: event.code,
                x: event.x,
                y: event.y,
                time: event.time,
                count,
            })
        };
        self.route(ctx, target, &event.with_kind(kind))
    }

    fn on_native_mouse_move(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        self.mouse.x = event.x;
        self.mouse.y = event.y;

        if let Some(target) = self.mouse.target {
            // Capture stays regardless of position; only synthesize the
            // boundary crossings.
            let inside = self.target_contains(ctx, target, event.x, event.y);
            if inside != self.mouse.inside {
                self.mouse.inside = inside;
                let kind = if inside {
                    EventKind::MouseIn
                } else {
                    EventKind::MouseOut
                };
                self.route(ctx, target, &event.with_kind(kind))?;
            }
            return self.route(ctx, target, event);
        }

        let current = self.find_hover(ctx, event.x, event.y);
        if current != self.hover {
            if let Some(old) = self.hover {
                let _ = self.route(ctx, old, &event.with_kind(EventKind::MouseOut));
            }
            if let Some(new) = current {
                let _ = self.route(ctx, new, &event.with_kind(EventKind::MouseIn));
            }
            self.hover = current;
        }
        let target = current.unwrap_or_else(|| self.base.id());
        self.route(ctx, target, event)
    }

    fn on_native_mouse_scroll(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let target = self
            .mouse
            .target
            .or_else(|| self.find_hover(ctx, event.x, event.y))
            .unwrap_or_else(|| self.base.id());
        self.route(ctx, target, event)
    }

    fn on_native_key_down(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        let target = self.focused.unwrap_or_else(|| self.base.id());
        if !self.keys.iter().any(|(code, _)| *code == event.code) {
            self.keys.push((event.code, target));
        }
        self.route(ctx, target, event)
    }

    fn on_native_key_up(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        // The key-up belongs to whoever saw the key-down, regardless of
        // where focus is now.
        let target = match self.keys.iter().position(|(code, _)| *code == event.code) {
            Some(index) => self.keys.remove(index).1,
            None => self.focused.unwrap_or_else(|| self.base.id()),
        };
        self.route(ctx, target, event)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Window {
    fn type_name(&self) -> &'static str {
        "Window"
    }

    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn as_widget_mut(&mut self) -> &mut dyn Widget {
        self
    }

    fn init(&mut self, ctx: &mut TreeCtx<'_>) -> Result<()> {
        let style = self.base.style();
        let mut props = ctx.props();
        self.base.bind_core(&mut props)?;
        self.title.bind("title", style, &mut props)?;
        self.role.bind("role", style, &mut props)?;
        self.border_color.bind("border.color", style, &mut props)?;
        self.border_size.bind("border.size", style, &mut props)?;
        self.policy.bind("policy", style, &mut props)?;
        self.constraints.bind("size.constraints", style, &mut props)?;
        self.layout.bind("layout", style, &mut props)?;
        if let Some(native) = self.native.as_mut() {
            native.set_title(self.title.peek());
        }
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut TreeCtx<'_>) {
        self.child = None;
        self.focused = None;
        self.hover = None;
        self.mouse = MouseGrab::default();
        self.clicks = None;
        self.keys.clear();
        if let Some(mut native) = self.native.take() {
            native.hide();
        }
        let sheet = ctx.sheet_mut();
        self.title.unbind(sheet);
        self.role.unbind(sheet);
        self.border_color.unbind(sheet);
        self.border_size.unbind(sheet);
        self.policy.unbind(sheet);
        self.constraints.unbind(sheet);
        self.layout.unbind(sheet);
        self.base.unbind_core(sheet);
    }

    fn property_changed(&mut self, tag: PropTag, ctx: &mut TreeCtx<'_>) {
        match tag {
            TAG_TITLE => {
                let title = self.title.get();
                if let Some(native) = self.native.as_mut() {
                    native.set_title(&title);
                }
            }
            TAG_POLICY | TAG_CONSTRAINTS | TAG_LAYOUT => ctx.query_resize(),
            TAG_BORDER_COLOR | TAG_BORDER_SIZE => ctx.query_draw(WidgetFlags::REDRAW_SURFACE),
            TAG_ROLE => {}
            _ => default_property_changed(self, tag, ctx),
        }
    }

    fn style_changed(&mut self, atom: Atom, ctx: &mut TreeCtx<'_>) {
        let mut props = ctx.props();
        let _ = self.title.commit(atom, &mut props)
            || self.role.commit(atom, &mut props)
            || self.border_color.commit(atom, &mut props)
            || self.border_size.commit(atom, &mut props)
            || self.policy.commit(atom, &mut props)
            || self.constraints.commit(atom, &mut props)
            || self.layout.commit(atom, &mut props)
            || self.base.commit_atom(atom, &mut props);
    }

    fn poll_queued(&mut self) -> Option<PropTag> {
        self.title
            .poll()
            .or_else(|| self.role.poll())
            .or_else(|| self.border_color.poll())
            .or_else(|| self.border_size.poll())
            .or_else(|| self.policy.poll())
            .or_else(|| self.constraints.poll())
            .or_else(|| self.layout.poll())
            .or_else(|| self.base.poll_queued())
    }

    fn lock_property(&mut self, tag: PropTag, locked: bool) {
        let _ = self.title.lock_if(tag, locked)
            || self.role.lock_if(tag, locked)
            || self.border_color.lock_if(tag, locked)
            || self.border_size.lock_if(tag, locked)
            || self.policy.lock_if(tag, locked)
            || self.constraints.lock_if(tag, locked)
            || self.layout.lock_if(tag, locked)
            || self.base.lock_property(tag, locked);
    }

    fn add(&mut self, ctx: &mut TreeCtx<'_>, child: WidgetId) -> Result<()> {
        if self.child.is_some() {
            return Err(Status::AlreadyExists);
        }
        ctx.link_child(child)?;
        self.child = Some(child);
        ctx.query_resize();
        Ok(())
    }

    fn remove(&mut self, ctx: &mut TreeCtx<'_>, child: WidgetId) -> Result<()> {
        if self.child != Some(child) {
            return Err(Status::NotFound);
        }
        // Evict the departing subtree from our own routing state; the
        // generic unlink path cannot reach us while we are dispatched.
        for id in ctx.tree.collect_subtree(child) {
            self.discard_widget(id);
        }
        ctx.unlink_child(child)?;
        self.child = None;
        ctx.query_resize();
        Ok(())
    }

    fn remove_all(&mut self, ctx: &mut TreeCtx<'_>) -> Result<()> {
        if let Some(child) = self.child {
            self.remove(ctx, child)?;
        }
        Ok(())
    }

    fn size_request(&mut self, ctx: &mut TreeCtx<'_>, limit: &mut SizeLimit) {
        *limit = self.window_limits(ctx);
    }

    fn realize(&mut self, ctx: &mut TreeCtx<'_>, rect: Rect) {
        let Some(child) = self.child else {
            return;
        };
        if !ctx.child_visible(child) {
            return;
        }
        let avail = self.base.padding.get().enter(rect, self.base.scale());
        let limit = ctx.padded_limits(child);
        let outer = self.layout.get().apply(avail, &limit);
        let content = ctx.child_content_rect(child, outer);
        ctx.realize_child(child, content);
    }

    fn render(&mut self, ctx: &mut TreeCtx<'_>, surface: &mut dyn Surface, area: Rect, force: bool) {
        let force = force || ctx.flags().contains(WidgetFlags::REDRAW_SURFACE);
        let rect = ctx.rect();
        let bg = actual_bg_color(self, ctx);

        let visible_child = self.child.filter(|&c| ctx.child_visible(c));

        if force {
            surface.clip_begin(area);
            match visible_child {
                Some(child) => {
                    crate::container::fill_frame(surface, bg, rect, ctx.child_rect(child));
                }
                None => surface.fill_rect(bg, rect),
            }
            // Border ring on top of the frame fill.
            let border = (*self.border_size.peek() as f32 * self.base.scale()) as i32;
            if border > 0 {
                let inner = Rect::new(
                    rect.left + border,
                    rect.top + border,
                    (rect.width - 2 * border).max(0),
                    (rect.height - 2 * border).max(0),
                );
                crate::container::fill_frame(surface, self.border_color.get(), rect, inner);
            }
            surface.clip_end();
        }

        if let Some(child) = visible_child {
            if force || ctx.child_redraw_pending(child) {
                let child_rect = ctx.child_rect(child);
                if let Some(visible) = child_rect.intersection(&area) {
                    ctx.render_child(child, surface, visible, force);
                }
                ctx.commit_child_redraw(child);
            }
        }
    }

    fn find_widget(&self, tree: &WidgetTree, x: i32, y: i32) -> Option<WidgetId> {
        let id = self.base.id();
        if !self.base.is_visible() || !tree.rect(id).contains(x, y) {
            return None;
        }
        self.child
            .filter(|&c| tree.is_visible(c))
            .and_then(|c| tree.find_widget(c, x, y))
            .or(Some(id))
    }

    fn handle_event(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        match event.kind {
            EventKind::MouseDown => self.on_native_mouse_down(ctx, event),
            EventKind::MouseUp => self.on_native_mouse_up(ctx, event),
            EventKind::MouseMove => self.on_native_mouse_move(ctx, event),
            EventKind::MouseScroll => self.on_native_mouse_scroll(ctx, event),
            EventKind::KeyDown => self.on_native_key_down(ctx, event),
            EventKind::KeyUp => self.on_native_key_up(ctx, event),
            EventKind::Resize => {
                self.sync_size_with(ctx, Some(Size::new(event.x, event.y)));
                ctx.query_draw(WidgetFlags::REDRAW_SURFACE);
                default_handle_event(self, ctx, event)
            }
            _ => default_handle_event(self, ctx, event),
        }
    }
}
