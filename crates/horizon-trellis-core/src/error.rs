//! Status codes for Horizon Trellis.

use std::fmt;

/// The error taxonomy shared by all toolkit operations.
///
/// Structural misuse (bad arguments, wrong binding state) is reported to the
/// immediate caller and never retried internally. Nothing in the core is
/// fatal: style-text parse failures degrade to "no change" and never surface
/// as a `Status` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Invalid, null-equivalent or self-referential input.
    BadArguments,
    /// Removal of a non-child, or a slot/attribute lookup miss.
    NotFound,
    /// Duplicate add, or a single-slot container that is already occupied.
    AlreadyExists,
    /// Operation invalid for the current binding state.
    BadState,
    /// Base-class default for abstract container operations.
    NotImplemented,
    /// The property is already bound to a style slot.
    AlreadyBound,
    /// Style-system slot exhaustion.
    NoMemory,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadArguments => write!(f, "Bad arguments"),
            Self::NotFound => write!(f, "Not found"),
            Self::AlreadyExists => write!(f, "Already exists"),
            Self::BadState => write!(f, "Bad state"),
            Self::NotImplemented => write!(f, "Not implemented"),
            Self::AlreadyBound => write!(f, "Property is already bound"),
            Self::NoMemory => write!(f, "Out of style slots"),
        }
    }
}

impl std::error::Error for Status {}

/// A specialized Result type for toolkit operations.
pub type Result<T> = std::result::Result<T, Status>;
