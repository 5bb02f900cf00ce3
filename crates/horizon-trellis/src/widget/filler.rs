//! A plain rectangle leaf.
//!
//! Reports the size set through its constraints and paints its background.
//! Useful as a spacer and as the minimal leaf when exercising layout.

use horizon_trellis_core::Result;
use horizon_trellis_draw::{Rect, SizeLimit, Surface};
use horizon_trellis_style::Atom;

use crate::prop::{PropTag, SizeConstraints, tags};
use crate::tree::TreeCtx;
use crate::widget::{Widget, WidgetBase, actual_bg_color, default_property_changed};

const TAG_CONSTRAINTS: PropTag = PropTag(tags::WIDGET_BASE);

/// A solid-color leaf widget sized by its constraints.
pub struct Filler {
    base: WidgetBase,
    /// The size this leaf reports during negotiation.
    pub constraints: SizeConstraints,
}

impl Filler {
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            constraints: SizeConstraints::new(TAG_CONSTRAINTS),
        }
    }
}

impl Default for Filler {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Filler {
    fn type_name(&self) -> &'static str {
        "Filler"
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
        self.constraints.bind("size.constraints", style, &mut props)?;
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut TreeCtx<'_>) {
        let sheet = ctx.sheet_mut();
        self.constraints.unbind(sheet);
        self.base.unbind_core(sheet);
    }

    fn property_changed(&mut self, tag: PropTag, ctx: &mut TreeCtx<'_>) {
        match tag {
            TAG_CONSTRAINTS => ctx.query_resize(),
            _ => default_property_changed(self, tag, ctx),
        }
    }

    fn style_changed(&mut self, atom: Atom, ctx: &mut TreeCtx<'_>) {
        let mut props = ctx.props();
        let _ = self.constraints.commit(atom, &mut props) || self.base.commit_atom(atom, &mut props);
    }

    fn poll_queued(&mut self) -> Option<PropTag> {
        self.constraints.poll().or_else(|| self.base.poll_queued())
    }

    fn lock_property(&mut self, tag: PropTag, locked: bool) {
        let _ = self.constraints.lock_if(tag, locked) || self.base.lock_property(tag, locked);
    }

    fn size_request(&mut self, _ctx: &mut TreeCtx<'_>, limit: &mut SizeLimit) {
        *limit = self.constraints.compute(self.base.scale());
    }

    fn render(&mut self, ctx: &mut TreeCtx<'_>, surface: &mut dyn Surface, area: Rect, _force: bool) {
        let rect = ctx.rect();
        if let Some(clip) = rect.intersection(&area) {
            surface.fill_rect(actual_bg_color(self, ctx), clip);
        }
    }
}
