//! Single-slot container that aligns its child within the allocated space.

use horizon_trellis_core::{Result, Status, UiEvent};
use horizon_trellis_draw::{Rect, SizeLimit, Surface};
use horizon_trellis_style::Atom;

use crate::prop::{Layout, PropTag, SizeConstraints, tags};
use crate::tree::{TreeCtx, WidgetId, WidgetTree};
use crate::widget::{
    Widget, WidgetBase, WidgetFlags, actual_bg_color, default_property_changed,
};

const TAG_LAYOUT: PropTag = PropTag(tags::WIDGET_BASE);
const TAG_CONSTRAINTS: PropTag = PropTag(tags::WIDGET_BASE + 1);

/// A container holding at most one child, positioned by the `layout`
/// property and clamped by explicit `size.constraints`.
pub struct Align {
    base: WidgetBase,
    /// Child alignment and scale within the allocation.
    pub layout: Layout,
    /// Explicit min/max overrides applied after the child's request.
    pub constraints: SizeConstraints,
    child: Option<WidgetId>,
}

impl Align {
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            layout: Layout::new(TAG_LAYOUT),
            constraints: SizeConstraints::new(TAG_CONSTRAINTS),
            child: None,
        }
    }

    pub fn child(&self) -> Option<WidgetId> {
        self.child
    }
}

impl Default for Align {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Align {
    fn type_name(&self) -> &'static str {
        "Align"
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
        self.layout.bind("layout", style, &mut props)?;
        self.constraints.bind("size.constraints", style, &mut props)?;
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut TreeCtx<'_>) {
        self.child = None;
        let sheet = ctx.sheet_mut();
        self.layout.unbind(sheet);
        self.constraints.unbind(sheet);
        self.base.unbind_core(sheet);
    }

    fn property_changed(&mut self, tag: PropTag, ctx: &mut TreeCtx<'_>) {
        match tag {
            TAG_LAYOUT | TAG_CONSTRAINTS => ctx.query_resize(),
            _ => default_property_changed(self, tag, ctx),
        }
    }

    fn style_changed(&mut self, atom: Atom, ctx: &mut TreeCtx<'_>) {
        let mut props = ctx.props();
        let _ = self.layout.commit(atom, &mut props)
            || self.constraints.commit(atom, &mut props)
            || self.base.commit_atom(atom, &mut props);
    }

    fn poll_queued(&mut self) -> Option<PropTag> {
        self.layout
            .poll()
            .or_else(|| self.constraints.poll())
            .or_else(|| self.base.poll_queued())
    }

    fn lock_property(&mut self, tag: PropTag, locked: bool) {
        let _ = self.layout.lock_if(tag, locked)
            || self.constraints.lock_if(tag, locked)
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
        ctx.unlink_child(child)?;
        self.child = None;
        ctx.query_resize();
        Ok(())
    }

    fn remove_all(&mut self, ctx: &mut TreeCtx<'_>) -> Result<()> {
        if let Some(child) = self.child.take() {
            let _ = ctx.unlink_child(child);
            ctx.query_resize();
        }
        Ok(())
    }

    fn size_request(&mut self, ctx: &mut TreeCtx<'_>, limit: &mut SizeLimit) {
        *limit = match self.child {
            Some(child) if ctx.child_visible(child) => {
                let mut l = ctx.padded_limits(child);
                // The child may grow; only its minimum binds upward.
                l.max_width = -1;
                l.max_height = -1;
                l
            }
            _ => SizeLimit::UNCONSTRAINED,
        };
        self.constraints.apply(limit, self.base.scale());
    }

    fn realize(&mut self, ctx: &mut TreeCtx<'_>, rect: Rect) {
        let Some(child) = self.child else {
            return;
        };
        if !ctx.child_visible(child) {
            return;
        }
        let limit = ctx.padded_limits(child);
        let outer = self.layout.get().apply(rect, &limit);
        let content = ctx.child_content_rect(child, outer);
        ctx.realize_child(child, content);
    }

    fn render(&mut self, ctx: &mut TreeCtx<'_>, surface: &mut dyn Surface, area: Rect, force: bool) {
        let force = force || ctx.flags().contains(WidgetFlags::REDRAW_SURFACE);
        let rect = ctx.rect();
        let bg = actual_bg_color(self, ctx);

        let visible_child = self.child.filter(|&c| ctx.child_visible(c));
        let Some(child) = visible_child else {
            if let Some(clip) = rect.intersection(&area) {
                surface.clip_begin(clip);
                surface.fill_rect(bg, rect);
                surface.clip_end();
            }
            return;
        };

        if force {
            // Repaint the frame around the child.
            if rect.overlaps(&area) {
                surface.clip_begin(area);
                super::fill_frame(surface, bg, rect, ctx.child_rect(child));
                surface.clip_end();
            }
        }

        if force || ctx.child_redraw_pending(child) {
            let child_rect = ctx.child_rect(child);
            if let Some(visible) = child_rect.intersection(&area) {
                ctx.render_child(child, surface, visible, force);
            }
            ctx.commit_child_redraw(child);
        }
    }

    fn find_widget(&self, tree: &WidgetTree, x: i32, y: i32) -> Option<WidgetId> {
        let child = self.child?;
        if !tree.is_visible(child) {
            return None;
        }
        tree.find_widget(child, x, y)
    }

    fn handle_event(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        crate::widget::default_handle_event(self, ctx, event)
    }
}
