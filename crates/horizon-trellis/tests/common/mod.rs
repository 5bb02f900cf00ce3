//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use horizon_trellis::prop::{PropTag, SizeConstraints, tags};
use horizon_trellis::tree::{TreeCtx, WidgetTree};
use horizon_trellis::widget::{Widget, WidgetBase, default_handle_event, default_property_changed};
use horizon_trellis::{Align, Window};
use horizon_trellis_core::{EventKind, Result, UiEvent};
use horizon_trellis_draw::SizeLimit;
use horizon_trellis_style::{Atom, StyleSheet};

pub const TAG_CONSTRAINTS: PropTag = PropTag(tags::WIDGET_BASE);

/// A leaf widget that records what happens to it.
///
/// Uses the `Filler` style class so it inherits the stock defaults.
pub struct Probe {
    base: WidgetBase,
    pub constraints: SizeConstraints,
    /// Property notifications, in delivery order.
    pub notified: Vec<PropTag>,
    /// Events delivered through `handle_event`, in arrival order.
    pub events: Vec<EventKind>,
    /// When set, the change handler for `tag` re-sets the property to this
    /// value, exercising the re-entrancy lock.
    pub reentrant_tag: Option<i64>,
    /// Constraints to pin during `init`.
    fixed_size: Option<(i32, i32)>,
}

impl Probe {
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            constraints: SizeConstraints::new(TAG_CONSTRAINTS),
            notified: Vec::new(),
            events: Vec::new(),
            reentrant_tag: None,
            fixed_size: None,
        }
    }

    pub fn fixed(width: i32, height: i32) -> Self {
        let mut probe = Self::new();
        probe.fixed_size = Some((width, height));
        probe
    }
}

impl Widget for Probe {
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
        if let Some((w, h)) = self.fixed_size {
            self.constraints.set_fixed(w, h, &mut props);
        }
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut TreeCtx<'_>) {
        let sheet = ctx.sheet_mut();
        self.constraints.unbind(sheet);
        self.base.unbind_core(sheet);
    }

    fn property_changed(&mut self, tag: PropTag, ctx: &mut TreeCtx<'_>) {
        self.notified.push(tag);
        if tag == tags::TAG {
            if let Some(value) = self.reentrant_tag.take() {
                let mut props = ctx.props();
                self.base.tag.set(value, &mut props);
            }
        }
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
        *limit = self.constraints.compute(self.base.scale().max(0.0));
    }

    fn handle_event(&mut self, ctx: &mut TreeCtx<'_>, event: &UiEvent) -> Result<()> {
        self.events.push(event.kind);
        default_handle_event(self, ctx, event)
    }
}

/// Route toolkit traces through `RUST_LOG` when a test wants them.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A fresh tree with the built-in style classes installed.
pub fn new_tree() -> WidgetTree {
    init_tracing();
    let mut sheet = StyleSheet::new();
    horizon_trellis::style_defaults::install(&mut sheet).unwrap();
    WidgetTree::new(sheet)
}

/// Window → Align → fixed-size probe, laid out and flushed.
pub fn window_with_probe(
    width: i32,
    height: i32,
) -> (
    WidgetTree,
    horizon_trellis::WidgetId,
    horizon_trellis::WidgetId,
    horizon_trellis::WidgetId,
) {
    let mut tree = new_tree();
    let window = tree.spawn(Window::new()).unwrap();
    let align = tree.spawn(Align::new()).unwrap();
    let probe = tree.spawn(Probe::fixed(width, height)).unwrap();
    tree.add(window, align).unwrap();
    tree.add(align, probe).unwrap();
    tree.flush_window(window);
    clear_probe(&mut tree, probe);
    (tree, window, align, probe)
}

/// Drop a probe's recorded notifications and events.
pub fn clear_probe(tree: &mut WidgetTree, id: horizon_trellis::WidgetId) {
    tree.configure_as::<Probe, _>(id, |probe, _ctx| {
        probe.notified.clear();
        probe.events.clear();
    })
    .unwrap();
}

/// Events logged by a probe.
pub fn probe_events(tree: &WidgetTree, id: horizon_trellis::WidgetId) -> Vec<EventKind> {
    tree.widget::<Probe>(id).unwrap().events.clone()
}
