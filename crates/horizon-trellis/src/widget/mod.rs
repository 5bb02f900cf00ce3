//! Widget fundamentals: the capability trait, composed base state, dirty
//! flags, and the slot table.

mod base;
mod filler;
mod flags;
mod slots;
mod traits;

pub use base::WidgetBase;
pub use filler::Filler;
pub use flags::WidgetFlags;
pub use slots::{HandlerId, SlotHandler, SlotKey, SlotSet, execute_slot};
pub use traits::{
    Widget, actual_bg_color, default_handle_event, default_property_changed, slot_for_event,
};
