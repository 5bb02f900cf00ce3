//! Drawing-surface and native-window capabilities for Horizon Trellis.
//!
//! This crate defines the two boundaries between the toolkit core and a
//! platform backend:
//!
//! - **Geometry**: integer pixel [`Point`]/[`Size`]/[`Rect`] plus the
//!   [`SizeLimit`] record exchanged during size negotiation
//! - **Drawing**: the [`Surface`] trait consumed by widget rendering, with
//!   [`NullSurface`] (no-op degradation) and [`RecordingSurface`] (headless
//!   testing) implementations
//! - **Windowing**: the [`NativeWindow`] trait wrapping the host's platform
//!   window
//!
//! The toolkit core depends only on these traits; it never touches a real
//! backend directly.

mod color;
mod geometry;
mod native;
mod surface;

pub use color::Color;
pub use geometry::{Point, Rect, Size, SizeLimit};
pub use native::{NativeWindow, NullWindow};
pub use surface::{DrawOp, NullSurface, RecordingSurface, Surface};
