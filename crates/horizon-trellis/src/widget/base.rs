//! Composed common widget state.
//!
//! Every widget embeds a [`WidgetBase`]: the arena id, the widget's style
//! node, the core style-bound properties, and the slot table. This is plain
//! composition — there is no inheritance chain; kind-specific behavior lives
//! in the [`Widget`](crate::widget::Widget) implementation that owns the
//! base.

use horizon_trellis_core::Result;
use horizon_trellis_draw::Color;
use horizon_trellis_style::{Atom, StyleId, StyleSheet};

use crate::prop::{Allocation, Padding, PropCtx, PropTag, Property, tags};
use crate::tree::WidgetId;
use crate::widget::slots::SlotSet;

/// Common state composed into every widget.
pub struct WidgetBase {
    id: WidgetId,
    style: StyleId,

    /// How a container should hand space to this widget.
    pub allocation: Allocation,
    /// Edge widths the parent adds around this widget.
    pub padding: Padding,
    /// Whether the widget participates in layout and rendering.
    pub visibility: Property<bool>,
    /// Background color of the widget.
    pub bg_color: Property<Color>,
    /// Take the background from the nearest opaque ancestor instead.
    pub bg_inherit: Property<bool>,
    /// UI scaling factor applied to paddings and constraints.
    pub scaling: Property<f32>,
    /// Brightness multiplier applied to the background.
    pub brightness: Property<f32>,
    /// Free-form integer tag for application use.
    pub tag: Property<i64>,

    /// Named event slots.
    pub slots: SlotSet,
}

impl WidgetBase {
    pub fn new() -> Self {
        Self {
            id: WidgetId::default(),
            style: StyleId::default(),
            allocation: Allocation::new(tags::ALLOCATION),
            padding: Padding::new(tags::PADDING),
            visibility: Property::new(tags::VISIBILITY, true),
            bg_color: Property::new(tags::BG_COLOR, Color::TRANSPARENT),
            bg_inherit: Property::new(tags::BG_INHERIT, false),
            scaling: Property::new(tags::SCALING, 1.0),
            brightness: Property::new(tags::BRIGHTNESS, 1.0),
            tag: Property::new(tags::TAG, 0),
            slots: SlotSet::new(),
        }
    }

    /// Wire the base to its arena slot. Called once by the tree on spawn.
    pub(crate) fn attach(&mut self, id: WidgetId, style: StyleId) {
        self.id = id;
        self.style = style;
    }

    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    #[inline]
    pub fn style(&self) -> StyleId {
        self.style
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        *self.visibility.peek()
    }

    /// Bind the core properties to this widget's style node.
    pub fn bind_core(&mut self, ctx: &mut PropCtx<'_>) -> Result<()> {
        let style = self.style;
        self.allocation.bind("allocation", style, ctx)?;
        self.padding.bind("padding", style, ctx)?;
        self.visibility.bind("visibility", style, ctx)?;
        self.bg_color.bind("bg.color", style, ctx)?;
        self.bg_inherit.bind("bg.inherit", style, ctx)?;
        self.scaling.bind("scaling", style, ctx)?;
        self.brightness.bind("brightness", style, ctx)?;
        self.tag.bind("tag", style, ctx)?;
        Ok(())
    }

    /// Release every core binding. Idempotent.
    pub fn unbind_core(&mut self, sheet: &mut StyleSheet) {
        self.allocation.unbind(sheet);
        self.padding.unbind(sheet);
        self.visibility.unbind(sheet);
        self.bg_color.unbind(sheet);
        self.bg_inherit.unbind(sheet);
        self.scaling.unbind(sheet);
        self.brightness.unbind(sheet);
        self.tag.unbind(sheet);
    }

    /// Take the next queued core-property notification.
    pub fn poll_queued(&mut self) -> Option<PropTag> {
        self.allocation
            .poll()
            .or_else(|| self.padding.poll())
            .or_else(|| self.visibility.poll())
            .or_else(|| self.bg_color.poll())
            .or_else(|| self.bg_inherit.poll())
            .or_else(|| self.scaling.poll())
            .or_else(|| self.brightness.poll())
            .or_else(|| self.tag.poll())
    }

    /// Adjust the notification lock of the core property named by `tag`.
    ///
    /// Returns `true` when the tag matched a core property.
    pub fn lock_property(&mut self, tag: PropTag, locked: bool) -> bool {
        self.allocation.lock_if(tag, locked)
            || self.padding.lock_if(tag, locked)
            || self.visibility.lock_if(tag, locked)
            || self.bg_color.lock_if(tag, locked)
            || self.bg_inherit.lock_if(tag, locked)
            || self.scaling.lock_if(tag, locked)
            || self.brightness.lock_if(tag, locked)
            || self.tag.lock_if(tag, locked)
    }

    /// Route an external cascade change to the owning core property.
    ///
    /// Returns `true` when some core property claimed the atom.
    pub fn commit_atom(&mut self, atom: Atom, ctx: &mut PropCtx<'_>) -> bool {
        self.allocation.commit(atom, ctx)
            || self.padding.commit(atom, ctx)
            || self.visibility.commit(atom, ctx)
            || self.bg_color.commit(atom, ctx)
            || self.bg_inherit.commit(atom, ctx)
            || self.scaling.commit(atom, ctx)
            || self.brightness.commit(atom, ctx)
            || self.tag.commit(atom, ctx)
    }

    /// Non-negative scaling factor for padding/constraint computation.
    pub fn scale(&self) -> f32 {
        self.scaling.peek().max(0.0)
    }
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self::new()
    }
}
