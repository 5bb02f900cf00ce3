//! Style-bindable widget properties.
//!
//! Every widget attribute that participates in the style cascade is a
//! property cell: either a single-slot [`Property`] or one of the compound
//! properties that bind a family of attributes ([`Padding`],
//! [`SizeConstraints`], [`Allocation`], [`Layout`]).
//!
//! Mutation flows one way: `set` detects real changes and either pushes into
//! the cascade (config mode) or queues a notification to the owning widget;
//! external cascade writes come back through `commit`. A per-cell lock
//! counter keeps a change handler from re-notifying itself.

mod allocation;
mod constraints;
mod layout;
mod padding;
mod property;

pub use allocation::{AllocFlags, Allocation};
pub use constraints::SizeConstraints;
pub use layout::{Layout, LayoutValue};
pub use padding::{Padding, PaddingValue};
pub use property::{PropCtx, PropTag, PropValue, Property, tags};
