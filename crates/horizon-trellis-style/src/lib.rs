//! Cascading style storage for Horizon Trellis.
//!
//! Widget properties resolve their values through a [`StyleSheet`]: a tree
//! of style nodes where named class nodes carry built-in defaults and each
//! widget instance owns an anonymous node inheriting from its class.
//!
//! # Cascade Example
//!
//! ```
//! use horizon_trellis_style::{StyleSheet, StyleValue};
//!
//! let mut sheet = StyleSheet::new();
//! let class = sheet.create_class("Widget", None).unwrap();
//! let pad = sheet.atom("padding.left");
//! sheet.create_default(class, pad, StyleValue::Int(2));
//!
//! // A widget instance inherits the class default...
//! let instance = sheet.create_style(Some(class)).unwrap();
//! assert_eq!(sheet.get_int(instance, pad).unwrap(), 2);
//!
//! // ...until it overrides locally.
//! sheet.set(instance, pad, StyleValue::Int(8), None);
//! assert_eq!(sheet.get_int(instance, pad).unwrap(), 8);
//! ```
//!
//! # Literal Grammar
//!
//! Compound property values travel as short tokenized strings; the [`parse`]
//! module implements that grammar. Parse failures are silent — a zero item
//! count means "no change applied" — because malformed style data must never
//! crash a running UI.

mod atom;
mod error;
pub mod parse;
mod sheet;
mod value;

pub use atom::{Atom, AtomTable};
pub use error::{Error, Result};
pub use parse::{EnumDef, find_enum, find_enum_value, format_bit_flags, parse_bit_flags};
pub use sheet::{ListenerId, StyleId, StyleSheet, StyleUpdate};
pub use value::{StyleValue, ValueKind};
