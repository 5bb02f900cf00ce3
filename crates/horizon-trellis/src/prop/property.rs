//! Style-bindable, change-notifying property cells.
//!
//! A [`Property`] holds one typed value and may be bound by name to a slot in
//! the style cascade. Mutation goes through [`Property::set`], which detects
//! real changes and triggers sync: in config mode the new value is pushed
//! into the cascade (defining defaults); at runtime a notification to the
//! owning widget is queued instead. When the cascade changes the bound slot
//! externally (a theme write), [`Property::commit`] re-reads and notifies.
//!
//! A per-property lock counter suppresses notification while one is already
//! being delivered for the same property, so a change handler that mutates
//! its own property cannot recurse.

use std::collections::VecDeque;

use horizon_trellis_core::{Result, Status};
use horizon_trellis_draw::Color;
use horizon_trellis_style::{Atom, ListenerId, StyleId, StyleSheet, StyleUpdate, StyleValue};

use crate::tree::WidgetId;

/// Identifies a property within its owning widget for change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropTag(pub u16);

/// Tags of the properties every widget carries.
pub mod tags {
    use super::PropTag;

    pub const ALLOCATION: PropTag = PropTag(1);
    pub const PADDING: PropTag = PropTag(2);
    pub const VISIBILITY: PropTag = PropTag(3);
    pub const BG_COLOR: PropTag = PropTag(4);
    pub const BG_INHERIT: PropTag = PropTag(5);
    pub const SCALING: PropTag = PropTag(6);
    pub const BRIGHTNESS: PropTag = PropTag(7);
    pub const TAG: PropTag = PropTag(8);

    /// First tag value available to concrete widget properties.
    pub const WIDGET_BASE: u16 = 32;
}

/// Mutation context threaded into property operations.
///
/// Bundles the style sheet with the tree's pending-delivery queues; property
/// cells push work here and the tree drains it once the current dispatch
/// unwinds.
pub struct PropCtx<'a> {
    pub(crate) sheet: &'a mut StyleSheet,
    pub(crate) updates: &'a mut VecDeque<StyleUpdate>,
    pub(crate) queued: &'a mut VecDeque<WidgetId>,
    pub(crate) owner: WidgetId,
}

impl<'a> PropCtx<'a> {
    pub fn sheet(&self) -> &StyleSheet {
        self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut StyleSheet {
        self.sheet
    }

    pub(crate) fn listener(&self) -> ListenerId {
        crate::tree::listener_of(self.owner)
    }

    pub(crate) fn push_updates(&mut self, updates: Vec<StyleUpdate>) {
        self.updates.extend(updates);
    }

    pub(crate) fn queue_owner(&mut self) {
        self.queued.push_back(self.owner);
    }
}

/// Conversion between a property's value type and style attribute values.
pub trait PropValue: Clone + PartialEq {
    fn to_style(&self) -> StyleValue;
    fn from_style(value: &StyleValue) -> Option<Self>;
}

impl PropValue for i64 {
    fn to_style(&self) -> StyleValue {
        StyleValue::Int(*self)
    }

    fn from_style(value: &StyleValue) -> Option<Self> {
        value.as_int()
    }
}

impl PropValue for f32 {
    fn to_style(&self) -> StyleValue {
        StyleValue::Float(*self)
    }

    fn from_style(value: &StyleValue) -> Option<Self> {
        value.as_float()
    }
}

impl PropValue for bool {
    fn to_style(&self) -> StyleValue {
        StyleValue::Bool(*self)
    }

    fn from_style(value: &StyleValue) -> Option<Self> {
        value.as_bool()
    }
}

impl PropValue for String {
    fn to_style(&self) -> StyleValue {
        StyleValue::String(self.clone())
    }

    fn from_style(value: &StyleValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl PropValue for Color {
    fn to_style(&self) -> StyleValue {
        StyleValue::Color(*self)
    }

    fn from_style(value: &StyleValue) -> Option<Self> {
        value.as_color()
    }
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    node: StyleId,
    atom: Atom,
    listener: ListenerId,
}

/// A single-slot typed property.
pub struct Property<T: PropValue> {
    tag: PropTag,
    value: T,
    binding: Option<Binding>,
    /// Re-entrancy guard; non-zero while a notification for this property
    /// is being delivered.
    nlock: u32,
    queued: bool,
}

impl<T: PropValue> Property<T> {
    pub fn new(tag: PropTag, value: T) -> Self {
        Self {
            tag,
            value,
            binding: None,
            nlock: 0,
            queued: false,
        }
    }

    pub fn tag(&self) -> PropTag {
        self.tag
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn peek(&self) -> &T {
        &self.value
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Associate this property with a named slot of a style node.
    ///
    /// Adopts the cascade's current value when one resolves. Fails with
    /// `AlreadyBound` when a binding exists and `BadArguments` for an empty
    /// name or stale node.
    pub fn bind(&mut self, name: &str, style: StyleId, ctx: &mut PropCtx<'_>) -> Result<()> {
        if self.binding.is_some() {
            return Err(Status::AlreadyBound);
        }
        if name.is_empty() || !ctx.sheet.contains(style) {
            return Err(Status::BadArguments);
        }
        let listener = ctx.listener();
        let atom = ctx.sheet.atom(name);
        ctx.sheet
            .bind(style, atom, listener)
            .map_err(Status::from)?;
        if let Some(v) = ctx.sheet.get(style, atom).and_then(T::from_style) {
            self.value = v;
        }
        self.binding = Some(Binding {
            node: style,
            atom,
            listener,
        });
        Ok(())
    }

    /// Detach from the style slot. Idempotent.
    pub fn unbind(&mut self, sheet: &mut StyleSheet) {
        if let Some(b) = self.binding.take() {
            sheet.unbind(b.node, b.atom, b.listener);
        }
    }

    /// Set the value, returning the previous one.
    ///
    /// Sync runs only when the new value differs from the old: config mode
    /// pushes into the cascade, runtime mode queues notification to the
    /// owning widget.
    pub fn set(&mut self, value: T, ctx: &mut PropCtx<'_>) -> T {
        if self.value == value {
            return value;
        }
        let old = std::mem::replace(&mut self.value, value);
        self.sync(ctx);
        old
    }

    fn sync(&mut self, ctx: &mut PropCtx<'_>) {
        if let Some(b) = self.binding {
            if ctx.sheet.config_mode() {
                let updates = ctx
                    .sheet
                    .set(b.node, b.atom, self.value.to_style(), Some(b.listener));
                ctx.push_updates(updates);
                return;
            }
        }
        self.queue_notify(ctx);
    }

    fn queue_notify(&mut self, ctx: &mut PropCtx<'_>) {
        if self.nlock > 0 || self.queued {
            return;
        }
        self.queued = true;
        ctx.queue_owner();
    }

    /// React to an external cascade change of the bound slot.
    ///
    /// Returns `true` when the atom belongs to this property (whether or not
    /// the value actually changed).
    pub fn commit(&mut self, atom: Atom, ctx: &mut PropCtx<'_>) -> bool {
        let Some(b) = self.binding else {
            return false;
        };
        if b.atom != atom {
            return false;
        }
        if let Some(v) = ctx.sheet.get(b.node, b.atom).and_then(T::from_style) {
            if v != self.value {
                self.value = v;
                self.queue_notify(ctx);
            }
        }
        true
    }

    /// Take the pending-notification flag, if set.
    pub fn poll(&mut self) -> Option<PropTag> {
        if self.queued {
            self.queued = false;
            Some(self.tag)
        } else {
            None
        }
    }

    /// Adjust the delivery lock when `tag` names this property.
    ///
    /// Returns `true` when the tag matched.
    pub fn lock_if(&mut self, tag: PropTag, locked: bool) -> bool {
        if tag != self.tag {
            return false;
        }
        if locked {
            self.nlock += 1;
        } else {
            self.nlock = self.nlock.saturating_sub(1);
        }
        true
    }
}

/// Shared bookkeeping for compound (multi-slot) properties.
///
/// Compound properties bind a family of attributes (`padding`,
/// `padding.left`, ...) and route commits by atom; this cell carries the
/// tag/queue/lock state they all need.
pub(crate) struct MultiCell {
    pub tag: PropTag,
    pub nlock: u32,
    pub queued: bool,
}

impl MultiCell {
    pub fn new(tag: PropTag) -> Self {
        Self {
            tag,
            nlock: 0,
            queued: false,
        }
    }

    pub fn queue_notify(&mut self, ctx: &mut PropCtx<'_>) {
        if self.nlock > 0 || self.queued {
            return;
        }
        self.queued = true;
        ctx.queue_owner();
    }

    pub fn poll(&mut self) -> Option<PropTag> {
        if self.queued {
            self.queued = false;
            Some(self.tag)
        } else {
            None
        }
    }

    pub fn lock_if(&mut self, tag: PropTag, locked: bool) -> bool {
        if tag != self.tag {
            return false;
        }
        if locked {
            self.nlock += 1;
        } else {
            self.nlock = self.nlock.saturating_sub(1);
        }
        true
    }
}

/// Binding record for compound properties: one node, many atoms.
pub(crate) struct MultiBinding {
    pub node: StyleId,
    pub listener: ListenerId,
    pub atoms: Vec<Atom>,
}

impl MultiBinding {
    /// Intern and bind `base` plus each `base`-prefixed suffix.
    ///
    /// The empty suffix binds the bare base name.
    pub fn bind(
        base: &str,
        suffixes: &[&str],
        style: StyleId,
        ctx: &mut PropCtx<'_>,
    ) -> Result<Self> {
        if base.is_empty() || !ctx.sheet.contains(style) {
            return Err(Status::BadArguments);
        }
        let listener = ctx.listener();
        let mut atoms = Vec::with_capacity(suffixes.len());
        for suffix in suffixes {
            let name = format!("{base}{suffix}");
            let atom = ctx.sheet.atom(&name);
            ctx.sheet.bind(style, atom, listener).map_err(Status::from)?;
            atoms.push(atom);
        }
        Ok(Self {
            node: style,
            listener,
            atoms,
        })
    }

    pub fn unbind(&self, sheet: &mut StyleSheet) {
        for &atom in &self.atoms {
            sheet.unbind(self.node, atom, self.listener);
        }
    }

    pub fn index_of(&self, atom: Atom) -> Option<usize> {
        self.atoms.iter().position(|&a| a == atom)
    }
}
