//! The cascading style sheet.
//!
//! Styles form a tree of nodes: named class nodes carry built-in defaults,
//! and every widget instance gets an anonymous node parented to its class.
//! Attribute lookup walks from the local node up through the inheritance
//! chain until a value is found. Writing an attribute produces the list of
//! bound listeners whose resolved value changed, which the widget layer
//! delivers as property commits.
//!
//! The sheet is an explicit registry: it is constructed once at application
//! startup and passed by reference to everything that needs it. There is no
//! process-global style state.

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::atom::{Atom, AtomTable};
use crate::error::{Error, Result};
use crate::value::{StyleValue, ValueKind};

use horizon_trellis_draw::Color;

new_key_type! {
    /// A node in the style tree.
    pub struct StyleId;
}

/// Identifies the owner of a property binding.
///
/// The widget layer packs its own widget ids into this; the sheet treats it
/// as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One pending property commit produced by a cascade write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleUpdate {
    /// The listener whose bound property must re-read its value.
    pub listener: ListenerId,
    /// The node the listener is bound on.
    pub node: StyleId,
    /// The attribute that changed.
    pub atom: Atom,
}

#[derive(Debug, Default)]
struct StyleNode {
    /// Class name; empty for anonymous widget-instance nodes.
    name: String,
    parent: Option<StyleId>,
    children: Vec<StyleId>,
    attrs: HashMap<Atom, StyleValue>,
    bindings: HashMap<Atom, Vec<ListenerId>>,
}

/// The style registry: atom table, node tree, bindings, config mode.
pub struct StyleSheet {
    atoms: AtomTable,
    nodes: SlotMap<StyleId, StyleNode>,
    classes: HashMap<String, StyleId>,
    /// Nesting depth of config-mode sections.
    config_depth: u32,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self {
            atoms: AtomTable::new(),
            nodes: SlotMap::with_key(),
            classes: HashMap::new(),
            config_depth: 0,
        }
    }

    // =========================================================================
    // Atoms
    // =========================================================================

    /// Intern an attribute name.
    pub fn atom(&mut self, name: &str) -> Atom {
        self.atoms.intern(name)
    }

    /// The name behind an atom.
    pub fn atom_name(&self, atom: Atom) -> &str {
        self.atoms.name(atom)
    }

    /// Look up an already-interned attribute name without interning.
    pub fn lookup_atom(&self, name: &str) -> Option<Atom> {
        self.atoms.lookup(name)
    }

    // =========================================================================
    // Node tree
    // =========================================================================

    /// Register a named class node, optionally inheriting from a parent class.
    pub fn create_class(&mut self, name: &str, parent: Option<StyleId>) -> Result<StyleId> {
        if self.classes.contains_key(name) {
            return Err(Error::NameTaken {
                name: name.to_string(),
            });
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(p) {
                return Err(Error::InvalidNode);
            }
        }
        let id = self.nodes.insert(StyleNode {
            name: name.to_string(),
            parent,
            ..StyleNode::default()
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        self.classes.insert(name.to_string(), id);
        tracing::trace!(target: "horizon_trellis_style::sheet", name, ?id, "registered style class");
        Ok(id)
    }

    /// Look up a registered class node by name.
    pub fn class(&self, name: &str) -> Option<StyleId> {
        self.classes.get(name).copied()
    }

    /// Create an anonymous node inheriting from `parent`.
    ///
    /// Widget instances each own one of these; local writes on it shadow the
    /// class defaults.
    pub fn create_style(&mut self, parent: Option<StyleId>) -> Result<StyleId> {
        if let Some(p) = parent {
            if !self.nodes.contains_key(p) {
                return Err(Error::InvalidNode);
            }
        }
        let id = self.nodes.insert(StyleNode {
            parent,
            ..StyleNode::default()
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        Ok(id)
    }

    /// Remove a node, splicing its children onto its parent.
    pub fn remove_style(&mut self, id: StyleId) -> Result<()> {
        let node = self.nodes.remove(id).ok_or(Error::InvalidNode)?;
        if let Some(p) = node.parent {
            if let Some(parent) = self.nodes.get_mut(p) {
                parent.children.retain(|&c| c != id);
            }
        }
        for child in node.children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.parent = node.parent;
            }
            if let (Some(p), true) = (node.parent, self.nodes.contains_key(child)) {
                self.nodes[p].children.push(child);
            }
        }
        if !node.name.is_empty() {
            self.classes.remove(&node.name);
        }
        Ok(())
    }

    pub fn contains(&self, id: StyleId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn parent(&self, id: StyleId) -> Option<StyleId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    // =========================================================================
    // Config mode
    // =========================================================================

    /// Enter config mode: property writes define defaults by pushing into
    /// the cascade instead of notifying widget listeners.
    pub fn begin_config(&mut self) {
        self.config_depth += 1;
    }

    pub fn end_config(&mut self) {
        debug_assert!(self.config_depth > 0);
        self.config_depth = self.config_depth.saturating_sub(1);
    }

    pub fn config_mode(&self) -> bool {
        self.config_depth > 0
    }

    // =========================================================================
    // Attribute access
    // =========================================================================

    /// Resolve an attribute by walking the inheritance chain.
    pub fn get(&self, node: StyleId, atom: Atom) -> Option<&StyleValue> {
        let mut current = Some(node);
        while let Some(id) = current {
            let n = self.nodes.get(id)?;
            if let Some(v) = n.attrs.get(&atom) {
                return Some(v);
            }
            current = n.parent;
        }
        None
    }

    /// Whether the node itself carries a value for the attribute.
    pub fn has_local(&self, node: StyleId, atom: Atom) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|n| n.attrs.contains_key(&atom))
    }

    pub fn get_int(&self, node: StyleId, atom: Atom) -> Result<i64> {
        self.typed(node, atom, ValueKind::Int, StyleValue::as_int)
    }

    pub fn get_float(&self, node: StyleId, atom: Atom) -> Result<f32> {
        self.typed(node, atom, ValueKind::Float, StyleValue::as_float)
    }

    pub fn get_bool(&self, node: StyleId, atom: Atom) -> Result<bool> {
        self.typed(node, atom, ValueKind::Bool, StyleValue::as_bool)
    }

    pub fn get_string(&self, node: StyleId, atom: Atom) -> Result<String> {
        self.typed(node, atom, ValueKind::String, |v| {
            v.as_str().map(str::to_string)
        })
    }

    pub fn get_color(&self, node: StyleId, atom: Atom) -> Result<Color> {
        self.typed(node, atom, ValueKind::Color, StyleValue::as_color)
    }

    fn typed<T>(
        &self,
        node: StyleId,
        atom: Atom,
        expected: ValueKind,
        access: impl Fn(&StyleValue) -> Option<T>,
    ) -> Result<T> {
        let value = self.get(node, atom).ok_or_else(|| Error::NotFound {
            name: self.atoms.name(atom).to_string(),
        })?;
        access(value).ok_or_else(|| Error::mismatch(expected, value.kind()))
    }

    // =========================================================================
    // Attribute writes
    // =========================================================================

    /// Write an attribute on a node and collect the affected bindings.
    ///
    /// No-op (empty update list) when the resolved value does not change.
    /// The returned updates cover the node itself plus every descendant that
    /// inherits the attribute through it; `origin`, when given, is excluded
    /// so a property pushing its own value does not commit back into itself.
    pub fn set(
        &mut self,
        node: StyleId,
        atom: Atom,
        value: StyleValue,
        origin: Option<ListenerId>,
    ) -> Vec<StyleUpdate> {
        if !self.nodes.contains_key(node) {
            return Vec::new();
        }
        if self.get(node, atom) == Some(&value) {
            // Shadow silently: a local copy of the inherited value changes
            // nothing observable.
            self.nodes[node].attrs.insert(atom, value);
            return Vec::new();
        }
        self.nodes[node].attrs.insert(atom, value);
        tracing::trace!(
            target: "horizon_trellis_style::sheet",
            ?node,
            atom = self.atoms.name(atom),
            "attribute changed"
        );

        let mut updates = Vec::new();
        self.collect_updates(node, atom, origin, true, &mut updates);
        updates
    }

    /// Create a default: write the attribute only when the node has no local
    /// value. Produces no notifications; used while registering built-ins.
    pub fn create_default(&mut self, node: StyleId, atom: Atom, value: StyleValue) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.attrs.entry(atom).or_insert(value);
        }
    }

    fn collect_updates(
        &self,
        node: StyleId,
        atom: Atom,
        origin: Option<ListenerId>,
        is_root: bool,
        out: &mut Vec<StyleUpdate>,
    ) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        // A descendant with its own local value shadows the change for its
        // whole subtree.
        if !is_root && n.attrs.contains_key(&atom) {
            return;
        }
        if let Some(listeners) = n.bindings.get(&atom) {
            for &listener in listeners {
                if Some(listener) == origin {
                    continue;
                }
                out.push(StyleUpdate {
                    listener,
                    node,
                    atom,
                });
            }
        }
        for &child in &n.children {
            self.collect_updates(child, atom, origin, false, out);
        }
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Register a listener for an attribute on a node.
    pub fn bind(&mut self, node: StyleId, atom: Atom, listener: ListenerId) -> Result<()> {
        let n = self.nodes.get_mut(node).ok_or(Error::InvalidNode)?;
        let listeners = n.bindings.entry(atom).or_default();
        if !listeners.contains(&listener) {
            listeners.push(listener);
        }
        Ok(())
    }

    /// Remove one listener binding. Idempotent.
    pub fn unbind(&mut self, node: StyleId, atom: Atom, listener: ListenerId) {
        if let Some(n) = self.nodes.get_mut(node) {
            if let Some(listeners) = n.bindings.get_mut(&atom) {
                listeners.retain(|&l| l != listener);
            }
        }
    }

    /// Remove every binding owned by a listener, across all nodes.
    ///
    /// Called when a widget is destroyed so the cascade never delivers into
    /// a freed widget.
    pub fn unbind_listener(&mut self, listener: ListenerId) {
        for (_, node) in self.nodes.iter_mut() {
            for listeners in node.bindings.values_mut() {
                listeners.retain(|&l| l != listener);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}
