//! The widget arena and dispatch engine.
//!
//! All widgets live in a [`WidgetTree`]: a slotmap arena keyed by stable
//! [`WidgetId`]s. The tree owns every widget exclusively (destroying a
//! widget destroys its subtree); every other widget-to-widget relation —
//! parent back-reference, focus, capture, style listener — is a plain id
//! resolved through the arena and invalidated explicitly on removal.
//!
//! Dispatch temporarily takes the widget box out of its slot so the widget
//! can receive `&mut self` alongside a [`TreeCtx`] borrowing the rest of the
//! tree. Property notifications and cascade commits produced during a
//! dispatch are queued and delivered synchronously, in mutation order, when
//! the outermost dispatch unwinds.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use slotmap::{Key, KeyData, SlotMap, new_key_type};

use horizon_trellis_core::{EventKind, Result, Status, TimerId, TimerQueue, UiEvent};
use horizon_trellis_draw::{Color, Rect, SizeLimit, Surface};
use horizon_trellis_style::{ListenerId, StyleId, StyleSheet, StyleUpdate, StyleValue};

use crate::prop::PropCtx;
use crate::widget::{SlotKey, Widget, WidgetFlags, execute_slot};
use crate::window::Window;

new_key_type! {
    /// A stable identifier of a widget in the arena.
    pub struct WidgetId;
}

/// Pack a widget id into the opaque listener id the style sheet tracks.
pub(crate) fn listener_of(id: WidgetId) -> ListenerId {
    ListenerId::new(id.data().as_ffi())
}

pub(crate) fn widget_of(listener: ListenerId) -> WidgetId {
    WidgetId::from(KeyData::from_ffi(listener.raw()))
}

/// How soon a scheduled redraw flush fires; requests within one quantum
/// coalesce into a single paint.
const FRAME_QUANTUM: Duration = Duration::from_millis(20);

struct WidgetEntry {
    parent: Option<WidgetId>,
    /// Ownership registry, mirroring container storage; drives subtree
    /// destruction and traversal.
    children: Vec<WidgetId>,
    flags: WidgetFlags,
    rect: Rect,
    limit: SizeLimit,
    style: StyleId,
    /// Taken (`None`) while the widget is being dispatched.
    widget: Option<Box<dyn Widget>>,
}

enum FocusRequest {
    Take(WidgetId),
    Kill(WidgetId),
}

/// The arena owning every widget, the style sheet, and the redraw timers.
pub struct WidgetTree {
    sheet: StyleSheet,
    entries: SlotMap<WidgetId, WidgetEntry>,
    windows: Vec<WidgetId>,
    timers: TimerQueue,
    redraw_timers: HashMap<TimerId, WidgetId>,
    window_timers: HashMap<WidgetId, TimerId>,

    pending_updates: VecDeque<StyleUpdate>,
    queued_widgets: VecDeque<WidgetId>,
    focus_requests: VecDeque<FocusRequest>,
    dispatch_depth: u32,
    draining: bool,
}

impl WidgetTree {
    /// Build a tree over an explicit style registry.
    ///
    /// The sheet is constructed (and its built-in class defaults installed)
    /// once at application startup; the tree takes ownership and every
    /// widget resolves against it.
    pub fn new(sheet: StyleSheet) -> Self {
        Self {
            sheet,
            entries: SlotMap::with_key(),
            windows: Vec::new(),
            timers: TimerQueue::new(),
            redraw_timers: HashMap::new(),
            window_timers: HashMap::new(),
            pending_updates: VecDeque::new(),
            queued_widgets: VecDeque::new(),
            focus_requests: VecDeque::new(),
            dispatch_depth: 0,
            draining: false,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Insert a widget into the arena and run its `init`.
    ///
    /// The widget gets an anonymous style node parented to the class node
    /// matching its `type_name`, when one is registered. A failed `init`
    /// destroys the half-built widget and reports the error.
    pub fn spawn<W: Widget>(&mut self, widget: W) -> Result<WidgetId> {
        self.spawn_boxed(Box::new(widget))
    }

    pub fn spawn_boxed(&mut self, mut widget: Box<dyn Widget>) -> Result<WidgetId> {
        let class = self.sheet.class(widget.type_name());
        let style = self.sheet.create_style(class).map_err(Status::from)?;
        let is_window = widget.as_any().is::<Window>();
        let type_name = widget.type_name();

        let id = self.entries.insert(WidgetEntry {
            parent: None,
            children: Vec::new(),
            flags: WidgetFlags::SIZE_INVALID | WidgetFlags::RESIZE_PENDING,
            rect: Rect::ZERO,
            limit: SizeLimit::UNCONSTRAINED,
            style,
            widget: None,
        });
        widget.base_mut().attach(id, style);
        self.entries[id].widget = Some(widget);
        tracing::trace!(target: "horizon_trellis::tree", ?id, type_name, "widget registered");

        match self.dispatch(id, |w, ctx| w.init(ctx)) {
            Ok(Ok(())) => {
                self.entries[id].flags.insert(WidgetFlags::INITIALIZED);
                if is_window {
                    self.windows.push(id);
                }
                self.maybe_drain();
                Ok(id)
            }
            Ok(Err(status)) | Err(status) => {
                tracing::debug!(target: "horizon_trellis::tree", ?id, %status, "widget init failed");
                let _ = self.destroy(id);
                Err(status)
            }
        }
    }

    /// Destroy a widget and its whole subtree.
    ///
    /// Evicts every destroyed id from window focus/capture/key tracking
    /// first, then detaches from the parent container, then destroys
    /// children before parents.
    pub fn destroy(&mut self, id: WidgetId) -> Result<()> {
        if !self.entries.contains_key(id) {
            return Err(Status::NotFound);
        }
        let subtree = self.collect_subtree(id);
        tracing::debug!(target: "horizon_trellis::tree", ?id, widgets = subtree.len(), "destroying subtree");

        if let Some(win) = self.window_of(id) {
            if win != id {
                let _ = self.dispatch(win, |w, _ctx| {
                    if let Some(window) = w.as_any_mut().downcast_mut::<Window>() {
                        for &d in &subtree {
                            window.discard_widget(d);
                        }
                    }
                });
            }
        }

        if let Some(parent) = self.entries.get(id).and_then(|e| e.parent) {
            let _ = self.dispatch(parent, |w, ctx| w.remove(ctx, id));
        }

        for &wid in subtree.iter().rev() {
            if let Some(e) = self.entries.get_mut(wid) {
                e.flags.insert(WidgetFlags::FINALIZED);
            }
            let _ = self.dispatch(wid, |w, ctx| {
                let _ = execute_slot(w, ctx, SlotKey::Destroy, &UiEvent::new(EventKind::Destroy));
                w.destroy(ctx);
            });
            if let Some(entry) = self.entries.remove(wid) {
                self.sheet.unbind_listener(listener_of(wid));
                let _ = self.sheet.remove_style(entry.style);
            }
            self.windows.retain(|&w| w != wid);
            if let Some(tid) = self.window_timers.remove(&wid) {
                let _ = self.timers.stop(tid);
                self.redraw_timers.remove(&tid);
            }
            self.queued_widgets.retain(|&q| q != wid);
        }
        let entries = &self.entries;
        self.focus_requests.retain(|r| match r {
            FocusRequest::Take(w) | FocusRequest::Kill(w) => entries.contains_key(*w),
        });
        self.maybe_drain();
        Ok(())
    }

    /// Add `child` to a container widget.
    pub fn add(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        if parent == child || !self.entries.contains_key(child) {
            return Err(Status::BadArguments);
        }
        let result = self.dispatch(parent, |w, ctx| w.add(ctx, child))?;
        self.maybe_drain();
        result
    }

    /// Remove `child` from a container widget without destroying it.
    pub fn remove(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        let result = self.dispatch(parent, |w, ctx| w.remove(ctx, child))?;
        self.maybe_drain();
        result
    }

    /// Remove every child of a container widget.
    pub fn remove_all(&mut self, parent: WidgetId) -> Result<()> {
        let result = self.dispatch(parent, |w, ctx| w.remove_all(ctx))?;
        self.maybe_drain();
        result
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn contains(&self, id: WidgetId) -> bool {
        self.entries.contains_key(id)
    }

    /// The widget's realized rectangle (window coordinates).
    pub fn rect(&self, id: WidgetId) -> Rect {
        self.entries.get(id).map_or(Rect::ZERO, |e| e.rect)
    }

    /// The cached size limit; stale while `SIZE_INVALID` is set.
    pub fn cached_limits(&self, id: WidgetId) -> SizeLimit {
        self.entries
            .get(id)
            .map_or(SizeLimit::UNCONSTRAINED, |e| e.limit)
    }

    pub fn flags(&self, id: WidgetId) -> WidgetFlags {
        self.entries.get(id).map_or(WidgetFlags::empty(), |e| e.flags)
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.entries.get(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.entries
            .get(id)
            .map_or(Vec::new(), |e| e.children.clone())
    }

    /// Whether the widget's own visibility flag is set.
    ///
    /// Defaults to `true` when the widget is mid-dispatch.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.entries
            .get(id)
            .and_then(|e| e.widget.as_ref())
            .is_none_or(|w| w.base().is_visible())
    }

    /// The window at the root of the widget's ancestor chain, if any.
    pub fn window_of(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = id;
        loop {
            match self.entries.get(current)?.parent {
                Some(p) => current = p,
                None => break,
            }
        }
        self.windows.contains(&current).then_some(current)
    }

    pub fn windows(&self) -> &[WidgetId] {
        &self.windows
    }

    /// Borrow a widget by concrete type.
    pub fn widget<W: Widget>(&self, id: WidgetId) -> Option<&W> {
        self.entries
            .get(id)?
            .widget
            .as_ref()?
            .as_any()
            .downcast_ref::<W>()
    }

    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// Style node of a widget.
    pub fn style_of(&self, id: WidgetId) -> Option<StyleId> {
        self.entries.get(id).map(|e| e.style)
    }

    /// Allocation flags of a widget, read without dispatch.
    pub(crate) fn widget_alloc(&self, id: WidgetId) -> Option<crate::prop::AllocFlags> {
        self.entries
            .get(id)?
            .widget
            .as_ref()
            .map(|w| w.base().allocation.flags())
    }

    // =========================================================================
    // Style access
    // =========================================================================

    /// Write a style attribute and deliver the resulting commits.
    ///
    /// This is the external-theme path: bound properties of the node and of
    /// every inheriting node re-read their values synchronously.
    pub fn write_style(&mut self, node: StyleId, name: &str, value: StyleValue) {
        let atom = self.sheet.atom(name);
        let updates = self.sheet.set(node, atom, value, None);
        self.pending_updates.extend(updates);
        self.maybe_drain();
    }

    pub fn begin_config(&mut self) {
        self.sheet.begin_config();
    }

    pub fn end_config(&mut self) {
        self.sheet.end_config();
        self.maybe_drain();
    }

    // =========================================================================
    // Mutation entry point
    // =========================================================================

    /// Run a closure against a widget with full dispatch context.
    ///
    /// Property notifications produced inside are delivered before this
    /// returns (unless nested in an outer dispatch).
    pub fn configure<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut TreeCtx<'_>) -> R,
    ) -> Result<R> {
        let result = self.dispatch(id, f)?;
        self.maybe_drain();
        Ok(result)
    }

    /// Convenience wrapper downcasting to a concrete widget type.
    pub fn configure_as<W: Widget, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut W, &mut TreeCtx<'_>) -> R,
    ) -> Result<R> {
        let result = self.dispatch(id, |w, ctx| {
            let widget = w
                .as_any_mut()
                .downcast_mut::<W>()
                .ok_or(Status::BadArguments)?;
            Ok(f(widget, ctx))
        })?;
        self.maybe_drain();
        result
    }

    // =========================================================================
    // Dirty-flag engine
    // =========================================================================

    /// Mark a widget's geometry stale and propagate upward.
    ///
    /// The widget and every strict ancestor get `SIZE_INVALID` and
    /// `RESIZE_PENDING`; the walk stops early at the first ancestor that
    /// already carries both. Suppressed while the widget itself is being
    /// realized.
    pub fn query_resize(&mut self, id: WidgetId) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        if entry.flags.contains(WidgetFlags::REALIZE_ACTIVE) {
            return;
        }
        if !entry.flags.contains(WidgetFlags::RESIZE_ANY) {
            entry.flags.insert(WidgetFlags::RESIZE_ANY);

            let mut current = entry.parent;
            while let Some(pid) = current {
                let Some(parent) = self.entries.get_mut(pid) else {
                    break;
                };
                if parent.flags.contains(WidgetFlags::RESIZE_ANY) {
                    break;
                }
                parent.flags.insert(WidgetFlags::RESIZE_ANY);
                current = parent.parent;
            }
        }

        self.schedule_flush(id);
    }

    /// Mark a widget for repaint and propagate `REDRAW_CHILD` upward.
    pub fn query_draw(&mut self, id: WidgetId, flags: WidgetFlags) {
        if !self.is_visible(id) {
            return;
        }
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        entry.flags.insert(flags & WidgetFlags::REDRAW_ANY);

        let mut current = entry.parent;
        while let Some(pid) = current {
            let Some(parent) = self.entries.get_mut(pid) else {
                break;
            };
            if parent.flags.contains(WidgetFlags::REDRAW_CHILD) {
                break;
            }
            parent.flags.insert(WidgetFlags::REDRAW_CHILD);
            current = parent.parent;
        }

        self.schedule_flush(id);
    }

    /// Clear a widget's redraw flags after it painted.
    pub fn commit_redraw(&mut self, id: WidgetId) {
        if let Some(e) = self.entries.get_mut(id) {
            e.flags.remove(WidgetFlags::REDRAW_ANY);
        }
    }

    fn schedule_flush(&mut self, id: WidgetId) {
        let Some(win) = self.window_of(id) else {
            return;
        };
        if self.window_timers.contains_key(&win) {
            return;
        }
        let tid = self.timers.start_one_shot(FRAME_QUANTUM);
        self.window_timers.insert(win, tid);
        self.redraw_timers.insert(tid, win);
        tracing::trace!(target: "horizon_trellis::tree", window = ?win, "flush scheduled");
    }

    // =========================================================================
    // Size negotiation
    // =========================================================================

    /// The widget's size limits, recomputing when the cache is stale.
    pub fn size_limits(&mut self, id: WidgetId) -> SizeLimit {
        let Some(entry) = self.entries.get(id) else {
            return SizeLimit::UNCONSTRAINED;
        };
        if entry.flags.contains(WidgetFlags::SIZE_INVALID) {
            let mut limit = SizeLimit::UNCONSTRAINED;
            if self
                .dispatch(id, |w, ctx| w.size_request(ctx, &mut limit))
                .is_ok()
            {
                if let Some(entry) = self.entries.get_mut(id) {
                    entry.limit = limit;
                    entry.flags.remove(WidgetFlags::SIZE_INVALID);
                }
            }
        }
        self.entries
            .get(id)
            .map_or(SizeLimit::UNCONSTRAINED, |e| e.limit)
    }

    /// Size limits with the widget's own scaled padding added.
    pub fn padded_limits(&mut self, id: WidgetId) -> SizeLimit {
        let mut limit = self.size_limits(id);
        if let Some(w) = self.entries.get(id).and_then(|e| e.widget.as_ref()) {
            let base = w.base();
            base.padding.get().add_to_limit(&mut limit, base.scale());
        }
        limit
    }

    /// Assign a widget its final rectangle and let it realize children.
    ///
    /// Skips the pass entirely when the geometry is unchanged and no resize
    /// is pending. Width/height are clamped non-negative before assignment.
    pub fn realize_widget(&mut self, id: WidgetId, rect: Rect) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        let rect = Rect::new(rect.left, rect.top, rect.width.max(0), rect.height.max(0));
        if !entry.flags.intersects(WidgetFlags::RESIZE_ANY) && entry.rect == rect {
            return;
        }
        entry.rect = rect;
        entry.flags.insert(WidgetFlags::REALIZE_ACTIVE);

        let _ = self.dispatch(id, |w, ctx| {
            w.realize(ctx, rect);
            let event = UiEvent::resize(rect.width, rect.height);
            let _ = execute_slot(w, ctx, SlotKey::Resize, &event);
            let _ = execute_slot(w, ctx, SlotKey::Realized, &event);
        });

        if let Some(entry) = self.entries.get_mut(id) {
            entry
                .flags
                .remove(WidgetFlags::REALIZE_ACTIVE | WidgetFlags::RESIZE_ANY);
            entry.flags.insert(WidgetFlags::REDRAW_SURFACE);
        }
    }

    // =========================================================================
    // Hit testing, events, rendering
    // =========================================================================

    /// Depth-first hit test from `from` downward.
    pub fn find_widget(&self, from: WidgetId, x: i32, y: i32) -> Option<WidgetId> {
        let widget = self.entries.get(from)?.widget.as_ref()?;
        widget.find_widget(self, x, y)
    }

    /// Route an event record into a widget (normally a window).
    pub fn handle_event(&mut self, id: WidgetId, event: &UiEvent) -> Result<()> {
        let result = self.dispatch(id, |w, ctx| w.handle_event(ctx, event))?;
        self.maybe_drain();
        result
    }

    /// Render a widget subtree onto a caller-provided surface.
    ///
    /// Resolves any pending layout first so rendering never observes an
    /// invalid geometry cache.
    pub fn render_widget(
        &mut self,
        id: WidgetId,
        surface: &mut dyn Surface,
        force: bool,
    ) -> Result<()> {
        if self.flags(id).resize_pending() {
            if self.windows.contains(&id) {
                let _ = self.dispatch(id, |w, ctx| {
                    if let Some(win) = w.as_any_mut().downcast_mut::<Window>() {
                        win.sync_size(ctx);
                    }
                });
            } else {
                let limit = self.size_limits(id);
                let rect = self.rect(id);
                let size = limit.clamp(rect.size());
                self.realize_widget(id, Rect::new(rect.left, rect.top, size.width, size.height));
            }
        }
        let area = self.rect(id);
        self.dispatch(id, |w, ctx| w.render(ctx, surface, area, force))?;
        self.commit_redraw(id);
        self.maybe_drain();
        Ok(())
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Give keyboard focus to a widget (routed through its window).
    pub fn set_focus(&mut self, id: WidgetId) {
        self.focus_requests.push_back(FocusRequest::Take(id));
        self.maybe_drain();
    }

    /// Drop keyboard focus from a widget if it currently holds it.
    pub fn kill_focus(&mut self, id: WidgetId) {
        self.focus_requests.push_back(FocusRequest::Kill(id));
        self.maybe_drain();
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Poll timers and run due window flushes. Returns the flush count.
    pub fn process_timers(&mut self) -> usize {
        let fired = self.timers.process_expired();
        self.fire_timers(fired)
    }

    /// Poll timers against an explicit clock, for hosts that drive time.
    pub fn process_timers_at(&mut self, now: Instant) -> usize {
        let fired = self.timers.process_at(now);
        self.fire_timers(fired)
    }

    /// Duration until the next pending timer, for host loop scheduling.
    pub fn time_until_next_timer(&mut self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    fn fire_timers(&mut self, fired: Vec<TimerId>) -> usize {
        let mut flushed = 0;
        for tid in fired {
            if let Some(win) = self.redraw_timers.remove(&tid) {
                self.window_timers.remove(&win);
                self.flush_window(win);
                flushed += 1;
            }
        }
        flushed
    }

    /// Resolve pending layout and paint one window immediately.
    pub fn flush_window(&mut self, id: WidgetId) {
        if !self.entries.contains_key(id) {
            return;
        }
        // A direct flush supersedes any scheduled one.
        if let Some(tid) = self.window_timers.remove(&id) {
            let _ = self.timers.stop(tid);
            self.redraw_timers.remove(&tid);
        }
        let _ = self.dispatch(id, |w, ctx| {
            if let Some(window) = w.as_any_mut().downcast_mut::<Window>() {
                window.flush(ctx);
            }
        });
        self.maybe_drain();
    }

    // =========================================================================
    // Dispatch internals
    // =========================================================================

    fn dispatch<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut TreeCtx<'_>) -> R,
    ) -> Result<R> {
        let mut widget = self
            .entries
            .get_mut(id)
            .and_then(|e| e.widget.take())
            .ok_or(Status::BadState)?;
        self.dispatch_depth += 1;
        let mut ctx = TreeCtx { tree: self, id };
        let result = f(widget.as_mut(), &mut ctx);
        self.dispatch_depth -= 1;
        if let Some(entry) = self.entries.get_mut(id) {
            entry.widget = Some(widget);
        }
        Ok(result)
    }

    fn maybe_drain(&mut self) {
        if self.dispatch_depth > 0 || self.draining {
            return;
        }
        self.draining = true;
        self.drain_pending();
        self.draining = false;
    }

    /// Deliver queued cascade commits, property notifications and focus
    /// requests until everything settles.
    fn drain_pending(&mut self) {
        loop {
            if let Some(update) = self.pending_updates.pop_front() {
                let id = widget_of(update.listener);
                if self.entries.contains_key(id) {
                    let _ = self.dispatch(id, |w, ctx| w.style_changed(update.atom, ctx));
                }
                continue;
            }
            if let Some(id) = self.queued_widgets.pop_front() {
                if self.entries.contains_key(id) {
                    let _ = self.dispatch(id, |w, ctx| {
                        while let Some(tag) = w.poll_queued() {
                            w.lock_property(tag, true);
                            w.property_changed(tag, ctx);
                            w.lock_property(tag, false);
                        }
                    });
                }
                continue;
            }
            if let Some(request) = self.focus_requests.pop_front() {
                self.apply_focus_request(request);
                continue;
            }
            break;
        }
    }

    fn apply_focus_request(&mut self, request: FocusRequest) {
        let (target, take) = match request {
            FocusRequest::Take(w) => (w, true),
            FocusRequest::Kill(w) => (w, false),
        };
        let Some(win) = self.window_of(target) else {
            return;
        };
        let _ = self.dispatch(win, |w, ctx| {
            if let Some(window) = w.as_any_mut().downcast_mut::<Window>() {
                if take {
                    window.set_focus(ctx, Some(target));
                } else {
                    window.drop_focus(ctx, target);
                }
            }
        });
    }

    pub(crate) fn collect_subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(e) = self.entries.get(current) {
                out.push(current);
                for &child in e.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    fn discard_in_window(&mut self, ids: &[WidgetId], skip: WidgetId) {
        let Some(&first) = ids.first() else {
            return;
        };
        let Some(win) = self.window_of(first) else {
            return;
        };
        if win == skip {
            return;
        }
        let _ = self.dispatch(win, |w, _ctx| {
            if let Some(window) = w.as_any_mut().downcast_mut::<Window>() {
                for &d in ids {
                    window.discard_widget(d);
                }
            }
        });
    }
}

/// Dispatch context handed to a widget while it runs.
///
/// Borrows the whole tree minus the dispatched widget itself; the widget's
/// arena entry (flags, rectangle, topology) stays accessible through it.
pub struct TreeCtx<'a> {
    pub(crate) tree: &'a mut WidgetTree,
    id: WidgetId,
}

impl<'a> TreeCtx<'a> {
    /// Id of the widget being dispatched.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn sheet(&self) -> &StyleSheet {
        &self.tree.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut StyleSheet {
        &mut self.tree.sheet
    }

    /// Property-mutation context for the dispatched widget.
    pub fn props(&mut self) -> PropCtx<'_> {
        PropCtx {
            sheet: &mut self.tree.sheet,
            updates: &mut self.tree.pending_updates,
            queued: &mut self.tree.queued_widgets,
            owner: self.id,
        }
    }

    // -------------------------------------------------------------------------
    // Own entry
    // -------------------------------------------------------------------------

    pub fn flags(&self) -> WidgetFlags {
        self.tree.flags(self.id)
    }

    pub fn rect(&self) -> Rect {
        self.tree.rect(self.id)
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.tree.parent(self.id)
    }

    pub fn query_resize(&mut self) {
        self.tree.query_resize(self.id);
    }

    pub fn query_draw(&mut self, flags: WidgetFlags) {
        self.tree.query_draw(self.id, flags);
    }

    /// Request keyboard focus for the dispatched widget.
    pub fn take_focus(&mut self) {
        self.tree
            .focus_requests
            .push_back(FocusRequest::Take(self.id));
    }

    pub fn kill_focus(&mut self) {
        self.tree
            .focus_requests
            .push_back(FocusRequest::Kill(self.id));
    }

    /// Background color resolved from the nearest non-inheriting ancestor.
    pub fn inherited_bg_color(&self) -> Option<Color> {
        let mut current = self.tree.parent(self.id);
        while let Some(id) = current {
            let entry = self.tree.entries.get(id)?;
            if let Some(w) = entry.widget.as_ref() {
                let base = w.base();
                if !base.bg_inherit.peek() {
                    return Some(base.bg_color.get());
                }
            }
            current = entry.parent;
        }
        None
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    /// Claim ownership of `child`: set its parent back-reference to the
    /// dispatched widget and record it in the arena's child registry.
    pub fn link_child(&mut self, child: WidgetId) -> Result<()> {
        if child == self.id {
            return Err(Status::BadArguments);
        }
        let Some(entry) = self.tree.entries.get(child) else {
            return Err(Status::BadArguments);
        };
        if entry.parent.is_some() {
            return Err(Status::AlreadyExists);
        }
        self.tree.entries[child].parent = Some(self.id);
        self.tree.entries[self.id].children.push(child);
        Ok(())
    }

    /// Release ownership of a direct child, evicting its subtree from the
    /// window's routing state.
    pub fn unlink_child(&mut self, child: WidgetId) -> Result<()> {
        let Some(entry) = self.tree.entries.get(child) else {
            return Err(Status::NotFound);
        };
        if entry.parent != Some(self.id) {
            return Err(Status::NotFound);
        }
        let subtree = self.tree.collect_subtree(child);
        self.tree.discard_in_window(&subtree, self.id);
        self.tree.entries[child].parent = None;
        self.tree.entries[self.id].children.retain(|&c| c != child);
        Ok(())
    }

    pub fn child_visible(&self, child: WidgetId) -> bool {
        self.tree.is_visible(child)
    }

    pub fn child_rect(&self, child: WidgetId) -> Rect {
        self.tree.rect(child)
    }

    pub fn child_redraw_pending(&self, child: WidgetId) -> bool {
        self.tree.flags(child).redraw_pending()
    }

    pub fn size_limits(&mut self, child: WidgetId) -> SizeLimit {
        self.tree.size_limits(child)
    }

    pub fn padded_limits(&mut self, child: WidgetId) -> SizeLimit {
        self.tree.padded_limits(child)
    }

    /// Shrink an allocation by the child's own scaled padding.
    pub fn child_content_rect(&self, child: WidgetId, rect: Rect) -> Rect {
        match self.tree.entries.get(child).and_then(|e| e.widget.as_ref()) {
            Some(w) => {
                let base = w.base();
                base.padding.get().enter(rect, base.scale())
            }
            None => rect,
        }
    }

    pub fn realize_child(&mut self, child: WidgetId, rect: Rect) {
        self.tree.realize_widget(child, rect);
    }

    pub fn render_child(
        &mut self,
        child: WidgetId,
        surface: &mut dyn Surface,
        area: Rect,
        force: bool,
    ) {
        if !self.tree.is_visible(child) {
            return;
        }
        let _ = self
            .tree
            .dispatch(child, |w, ctx| w.render(ctx, surface, area, force));
    }

    pub fn commit_child_redraw(&mut self, child: WidgetId) {
        self.tree.commit_redraw(child);
    }

    /// Hit-test downward from a child.
    pub fn find_widget_from(&self, child: WidgetId, x: i32, y: i32) -> Option<WidgetId> {
        self.tree.find_widget(child, x, y)
    }

    /// Deliver an event to another widget.
    pub fn deliver_event(&mut self, target: WidgetId, event: &UiEvent) -> Result<()> {
        self.tree
            .dispatch(target, |w, ctx| w.handle_event(ctx, event))?
    }

    // -------------------------------------------------------------------------
    // Window internals
    // -------------------------------------------------------------------------

    pub(crate) fn set_own_rect(&mut self, rect: Rect) {
        if let Some(e) = self.tree.entries.get_mut(self.id) {
            e.rect = rect;
        }
    }

    pub(crate) fn insert_flags(&mut self, flags: WidgetFlags) {
        if let Some(e) = self.tree.entries.get_mut(self.id) {
            e.flags.insert(flags);
        }
    }

    pub(crate) fn remove_flags(&mut self, flags: WidgetFlags) {
        if let Some(e) = self.tree.entries.get_mut(self.id) {
            e.flags.remove(flags);
        }
    }
}
