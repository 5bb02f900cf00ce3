//! Sequential stacking container.
//!
//! Lays children out one after another along a single axis. Each child gets
//! its minimum along the axis; leftover space is split evenly among children
//! whose allocation requests expansion. Across the axis a child fills the
//! row when its fill flag is set, otherwise it keeps its minimum, centered.

use horizon_trellis_core::{Result, Status, UiEvent};
use horizon_trellis_draw::{Rect, SizeLimit, Surface};
use horizon_trellis_style::Atom;

use crate::prop::{AllocFlags, PropTag, Property, SizeConstraints, tags};
use crate::tree::{TreeCtx, WidgetId, WidgetTree};
use crate::widget::{
    Widget, WidgetBase, WidgetFlags, actual_bg_color, default_property_changed,
};

const TAG_SPACING: PropTag = PropTag(tags::WIDGET_BASE);
const TAG_CONSTRAINTS: PropTag = PropTag(tags::WIDGET_BASE + 1);

/// The stacking axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A container arranging children sequentially along one axis.
pub struct Stack {
    base: WidgetBase,
    orientation: Orientation,
    /// Gap between consecutive children, in unscaled pixels.
    pub spacing: Property<i64>,
    /// Explicit min/max overrides applied after combining children.
    pub constraints: SizeConstraints,
    children: Vec<WidgetId>,
}

impl Stack {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            base: WidgetBase::new(),
            orientation,
            spacing: Property::new(TAG_SPACING, 0),
            constraints: SizeConstraints::new(TAG_CONSTRAINTS),
            children: Vec::new(),
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn items(&self) -> &[WidgetId] {
        &self.children
    }

    fn scaled_spacing(&self) -> i32 {
        (*self.spacing.peek() as f32 * self.base.scale()) as i32
    }

    /// Per-child layout input gathered before partitioning.
    fn gather(&self, ctx: &mut TreeCtx<'_>) -> Vec<(WidgetId, SizeLimit, bool, bool)> {
        let horizontal = self.orientation == Orientation::Horizontal;
        let mut items = Vec::with_capacity(self.children.len());
        for &child in &self.children {
            if !ctx.child_visible(child) {
                continue;
            }
            let limit = ctx.padded_limits(child);
            let (expand, fill) = match ctx.tree.widget_alloc(child) {
                Some(a) if horizontal => {
                    (a.contains(AllocFlags::HEXPAND), a.contains(AllocFlags::VFILL))
                }
                Some(a) => (a.contains(AllocFlags::VEXPAND), a.contains(AllocFlags::HFILL)),
                None => (false, false),
            };
            items.push((child, limit, expand, fill));
        }
        items
    }
}

impl Widget for Stack {
    fn type_name(&self) -> &'static str {
        "Stack"
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
        self.spacing.bind("spacing", style, &mut props)?;
        self.constraints.bind("size.constraints", style, &mut props)?;
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut TreeCtx<'_>) {
        self.children.clear();
        let sheet = ctx.sheet_mut();
        self.spacing.unbind(sheet);
        self.constraints.unbind(sheet);
        self.base.unbind_core(sheet);
    }

    fn property_changed(&mut self, tag: PropTag, ctx: &mut TreeCtx<'_>) {
        match tag {
            TAG_SPACING | TAG_CONSTRAINTS => ctx.query_resize(),
            _ => default_property_changed(self, tag, ctx),
        }
    }

    fn style_changed(&mut self, atom: Atom, ctx: &mut TreeCtx<'_>) {
        let mut props = ctx.props();
        let _ = self.spacing.commit(atom, &mut props)
            || self.constraints.commit(atom, &mut props)
            || self.base.commit_atom(atom, &mut props);
    }

    fn poll_queued(&mut self) -> Option<PropTag> {
        self.spacing
            .poll()
            .or_else(|| self.constraints.poll())
            .or_else(|| self.base.poll_queued())
    }

    fn lock_property(&mut self, tag: PropTag, locked: bool) {
        let _ = self.spacing.lock_if(tag, locked)
            || self.constraints.lock_if(tag, locked)
            || self.base.lock_property(tag, locked);
    }

    fn add(&mut self, ctx: &mut TreeCtx<'_>, child: WidgetId) -> Result<()> {
        if self.children.contains(&child) {
            return Err(Status::AlreadyExists);
        }
        ctx.link_child(child)?;
        self.children.push(child);
        ctx.query_resize();
        Ok(())
    }

    fn remove(&mut self, ctx: &mut TreeCtx<'_>, child: WidgetId) -> Result<()> {
        if !self.children.contains(&child) {
            return Err(Status::NotFound);
        }
        ctx.unlink_child(child)?;
        self.children.retain(|&c| c != child);
        ctx.query_resize();
        Ok(())
    }

    fn remove_all(&mut self, ctx: &mut TreeCtx<'_>) -> Result<()> {
        for child in std::mem::take(&mut self.children) {
            let _ = ctx.unlink_child(child);
        }
        ctx.query_resize();
        Ok(())
    }

    fn size_request(&mut self, ctx: &mut TreeCtx<'_>, limit: &mut SizeLimit) {
        let items = self.gather(ctx);
        *limit = SizeLimit::UNCONSTRAINED;

        if !items.is_empty() {
            let spacing = self.scaled_spacing();
            let gaps = spacing * (items.len() as i32 - 1);
            let mut axis_min = 0;
            let mut cross_min = 0;
            for (_, l, _, _) in &items {
                let (a, c) = match self.orientation {
                    Orientation::Horizontal => (l.min_width, l.min_height),
                    Orientation::Vertical => (l.min_height, l.min_width),
                };
                axis_min += a.max(0);
                cross_min = cross_min.max(c.max(0));
            }
            axis_min += gaps;
            match self.orientation {
                Orientation::Horizontal => {
                    limit.min_width = axis_min;
                    limit.min_height = cross_min;
                }
                Orientation::Vertical => {
                    limit.min_height = axis_min;
                    limit.min_width = cross_min;
                }
            }
        }

        self.constraints.apply(limit, self.base.scale());
    }

    fn realize(&mut self, ctx: &mut TreeCtx<'_>, rect: Rect) {
        let items = self.gather(ctx);
        if items.is_empty() {
            return;
        }
        let horizontal = self.orientation == Orientation::Horizontal;
        let spacing = self.scaled_spacing();
        let gaps = spacing * (items.len() as i32 - 1);

        let axis_avail = if horizontal { rect.width } else { rect.height };
        let cross_avail = if horizontal { rect.height } else { rect.width };

        let axis_min: i32 = items
            .iter()
            .map(|(_, l, _, _)| {
                if horizontal {
                    l.min_width.max(0)
                } else {
                    l.min_height.max(0)
                }
            })
            .sum::<i32>()
            + gaps;

        // Spread leftover space across expanding children.
        let leftover = (axis_avail - axis_min).max(0);
        let expanders = items.iter().filter(|(_, _, e, _)| *e).count() as i32;
        let (share, mut remainder) = if expanders > 0 {
            (leftover / expanders, leftover % expanders)
        } else {
            (0, 0)
        };

        let mut cursor = if horizontal { rect.left } else { rect.top };
        for (child, limit, expand, fill) in items {
            let (axis_min_c, axis_max_c, cross_min_c, cross_max_c) = if horizontal {
                (limit.min_width, limit.max_width, limit.min_height, limit.max_height)
            } else {
                (limit.min_height, limit.max_height, limit.min_width, limit.max_width)
            };

            let mut axis_size = axis_min_c.max(0);
            if expand {
                axis_size += share + if remainder > 0 { 1 } else { 0 };
                if remainder > 0 {
                    remainder -= 1;
                }
            }
            if axis_max_c >= 0 {
                axis_size = axis_size.min(axis_max_c.max(axis_min_c.max(0)));
            }

            let mut cross_size = if fill { cross_avail } else { cross_min_c.max(0) };
            if cross_max_c >= 0 {
                cross_size = cross_size.min(cross_max_c.max(cross_min_c.max(0)));
            }
            cross_size = cross_size.max(0);
            let cross_off = (cross_avail - cross_size).max(0) / 2;

            let outer = if horizontal {
                Rect::new(cursor, rect.top + cross_off, axis_size, cross_size)
            } else {
                Rect::new(rect.left + cross_off, cursor, cross_size, axis_size)
            };
            let content = ctx.child_content_rect(child, outer);
            ctx.realize_child(child, content);

            cursor += axis_size + spacing;
        }
    }

    fn render(&mut self, ctx: &mut TreeCtx<'_>, surface: &mut dyn Surface, area: Rect, force: bool) {
        let force = force || ctx.flags().contains(WidgetFlags::REDRAW_SURFACE);
        let rect = ctx.rect();
        let bg = actual_bg_color(self, ctx);

        if force && rect.overlaps(&area) {
            surface.clip_begin(area);
            surface.fill_rect(bg, rect);
            surface.clip_end();
        }

        for &child in &self.children {
            if !ctx.child_visible(child) {
                continue;
            }
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
        // Last-added child wins among overlapping siblings.
        self.children
            .iter()
            .rev()
            .filter(|&&c| tree.is_visible(c))
            .find_map(|&c| tree.find_widget(c, x, y))
    }

    fn handle_event(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        crate::widget::default_handle_event(self, ctx, event)
    }
}
