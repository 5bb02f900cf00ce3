//! Named event slots: the publish/subscribe surface of a widget.
//!
//! Slots decouple semantic events (`Submit`, `Change`) and routed input
//! events from the code interested in them. Handlers attach to a slot by key
//! and run in attachment order when the slot executes. A handler may attach
//! further handlers to the slot it is running on; those run from the next
//! execution.

use std::collections::HashMap;

use horizon_trellis_core::{Result, Status, UiEvent};

use crate::tree::TreeCtx;
use crate::widget::traits::Widget;

/// The well-known slot keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Destroy,
    Show,
    Hide,
    Resize,
    Realized,
    MouseDown,
    MouseUp,
    MouseMove,
    MouseScroll,
    MouseIn,
    MouseOut,
    MouseClick,
    MouseDoubleClick,
    MouseTripleClick,
    KeyDown,
    KeyUp,
    FocusIn,
    FocusOut,
    Close,
    /// Semantic: the widget's primary action fired.
    Submit,
    /// Semantic: the widget's value changed.
    Change,
}

/// Identifier of one attached handler within its widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u64);

/// A slot handler.
///
/// Receives the sender (detached from the tree for the duration of the
/// call), the dispatch context, and the triggering event.
pub type SlotHandler =
    Box<dyn FnMut(&mut dyn Widget, &mut TreeCtx<'_>, &UiEvent) -> Result<()>>;

#[derive(Default)]
struct Slot {
    entries: Vec<(HandlerId, SlotHandler)>,
}

/// The per-widget slot table.
#[derive(Default)]
pub struct SlotSet {
    slots: HashMap<SlotKey, Slot>,
    next_id: u64,
}

impl SlotSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handler; it runs after any already attached.
    pub fn add(&mut self, key: SlotKey, handler: SlotHandler) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.slots.entry(key).or_default().entries.push((id, handler));
        id
    }

    /// Detach a handler.
    pub fn remove(&mut self, key: SlotKey, id: HandlerId) -> Result<()> {
        let slot = self.slots.get_mut(&key).ok_or(Status::NotFound)?;
        let before = slot.entries.len();
        slot.entries.retain(|(h, _)| *h != id);
        if slot.entries.len() == before {
            return Err(Status::NotFound);
        }
        Ok(())
    }

    pub fn handler_count(&self, key: SlotKey) -> usize {
        self.slots.get(&key).map_or(0, |s| s.entries.len())
    }

    /// Take the handler list for execution; `None` when the slot is empty.
    pub(crate) fn begin_execute(&mut self, key: SlotKey) -> Option<Vec<(HandlerId, SlotHandler)>> {
        let slot = self.slots.get_mut(&key)?;
        if slot.entries.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut slot.entries))
    }

    /// Return handlers after execution, keeping any attached meanwhile.
    pub(crate) fn end_execute(&mut self, key: SlotKey, mut taken: Vec<(HandlerId, SlotHandler)>) {
        let slot = self.slots.entry(key).or_default();
        let added = std::mem::take(&mut slot.entries);
        taken.extend(added);
        slot.entries = taken;
    }
}

/// Execute a slot on a widget, delivering `event` to each handler in order.
///
/// Stops at the first handler error and reports it; remaining handlers are
/// skipped for this execution but stay attached.
pub fn execute_slot<W: Widget + ?Sized>(
    widget: &mut W,
    ctx: &mut TreeCtx<'_>,
    key: SlotKey,
    event: &UiEvent,
) -> Result<()> {
    let Some(mut handlers) = widget.base_mut().slots.begin_execute(key) else {
        return Ok(());
    };
    let mut result = Ok(());
    for (_, handler) in handlers.iter_mut() {
        result = handler(widget.as_widget_mut(), ctx, event);
        if result.is_err() {
            break;
        }
    }
    widget.base_mut().slots.end_execute(key, handlers);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> SlotHandler {
        Box::new(|_, _, _| Ok(()))
    }

    #[test]
    fn add_and_remove_handlers() {
        let mut slots = SlotSet::new();
        let a = slots.add(SlotKey::Submit, noop());
        let b = slots.add(SlotKey::Submit, noop());
        assert_eq!(slots.handler_count(SlotKey::Submit), 2);

        slots.remove(SlotKey::Submit, a).unwrap();
        assert_eq!(slots.handler_count(SlotKey::Submit), 1);
        assert_eq!(slots.remove(SlotKey::Submit, a), Err(Status::NotFound));
        slots.remove(SlotKey::Submit, b).unwrap();
        assert_eq!(slots.remove(SlotKey::Change, b), Err(Status::NotFound));
    }

    #[test]
    fn execute_round_trip_preserves_handlers() {
        let mut slots = SlotSet::new();
        slots.add(SlotKey::Change, noop());
        let taken = slots.begin_execute(SlotKey::Change).unwrap();
        assert_eq!(taken.len(), 1);
        assert_eq!(slots.handler_count(SlotKey::Change), 0);
        slots.end_execute(SlotKey::Change, taken);
        assert_eq!(slots.handler_count(SlotKey::Change), 1);
    }

    #[test]
    fn handlers_added_during_execution_are_kept() {
        let mut slots = SlotSet::new();
        slots.add(SlotKey::Change, noop());
        let taken = slots.begin_execute(SlotKey::Change).unwrap();
        // Simulates a handler attaching another handler mid-execution.
        slots.add(SlotKey::Change, noop());
        slots.end_execute(SlotKey::Change, taken);
        assert_eq!(slots.handler_count(SlotKey::Change), 2);
    }
}
