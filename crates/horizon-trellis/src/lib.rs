//! A retained-mode widget toolkit core.
//!
//! Horizon Trellis keeps a tree of widgets with style-bound properties,
//! negotiates geometry in two phases (`size_request`, then `realize`), and
//! routes input events through a window-level state machine (mouse capture,
//! keyboard focus, key tracking). Rendering goes onto an abstract drawing
//! surface; the native window and the rasterizer are host-provided
//! capabilities, never implemented here.
//!
//! # Architecture
//!
//! - [`WidgetTree`] — the arena owning every widget; all mutation flows
//!   through it so property notifications deliver synchronously and in
//!   mutation order
//! - [`Widget`](widget::Widget) — the capability trait each widget kind
//!   implements over a composed [`WidgetBase`](widget::WidgetBase)
//! - [`prop`] — style-bindable property cells with change notification and
//!   a re-entrancy guard
//! - [`Window`](window::Window) — top-level container owning the native
//!   binding and the event-routing state machines
//! - [`style_defaults`] — the built-in class defaults, installed into an
//!   explicit [`StyleSheet`](horizon_trellis_style::StyleSheet) at startup
//!
//! # Example
//!
//! ```
//! use horizon_trellis::container::Align;
//! use horizon_trellis::tree::WidgetTree;
//! use horizon_trellis::widget::Filler;
//! use horizon_trellis::window::Window;
//! use horizon_trellis::style_defaults;
//! use horizon_trellis_style::StyleSheet;
//!
//! let mut sheet = StyleSheet::new();
//! style_defaults::install(&mut sheet).unwrap();
//! let mut tree = WidgetTree::new(sheet);
//!
//! let window = tree.spawn(Window::new()).unwrap();
//! let align = tree.spawn(Align::new()).unwrap();
//! let leaf = tree.spawn(Filler::new()).unwrap();
//!
//! tree.configure_as::<Filler, _>(leaf, |filler, ctx| {
//!     let mut props = ctx.props();
//!     filler.constraints.set_fixed(40, 20, &mut props);
//! })
//! .unwrap();
//!
//! tree.add(window, align).unwrap();
//! tree.add(align, leaf).unwrap();
//!
//! // Resolve layout and verify the negotiated geometry.
//! tree.flush_window(window);
//! let rect = tree.rect(leaf);
//! assert_eq!((rect.width, rect.height), (40, 20));
//! ```

pub mod container;
pub mod input;
pub mod prop;
pub mod style_defaults;
pub mod tree;
pub mod widget;
pub mod window;

pub use container::{Align, Orientation, Stack};
pub use tree::{TreeCtx, WidgetId, WidgetTree};
pub use widget::{Filler, SlotKey, Widget, WidgetBase, WidgetFlags};
pub use window::{Window, WindowPolicy};

// The foundational crates are part of the public API surface.
pub use horizon_trellis_core as core;
pub use horizon_trellis_draw as draw;
pub use horizon_trellis_style as style;
