//! Core systems for Horizon Trellis.
//!
//! This crate provides the foundational pieces of the Horizon Trellis widget
//! toolkit:
//!
//! - **Status codes**: the shared error taxonomy for toolkit operations
//! - **Input events**: the uniform [`UiEvent`] record the host's event pump
//!   feeds into the window layer
//! - **Timers**: a cooperative [`TimerQueue`] polled from the host loop,
//!   used by the toolkit to defer and coalesce redraw
//!
//! Everything here is single-threaded by design: the toolkit runs entirely
//! on the host's event loop and takes no locks.

mod error;
mod event;
mod timer;

pub use error::{Result, Status};
pub use event::{EventKind, Modifiers, MouseButton, UiEvent};
pub use timer::{TimerId, TimerKind, TimerQueue};
