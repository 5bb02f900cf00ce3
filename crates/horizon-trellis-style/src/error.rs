//! Error types for the styling system.

use horizon_trellis_core::Status;

use crate::value::ValueKind;

/// Result type alias for style operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the styling system.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The attribute is not present anywhere in the cascade.
    #[error("attribute '{name}' not found")]
    NotFound { name: String },

    /// The attribute exists with a different type.
    #[error("attribute type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: &'static str, got: &'static str },

    /// The style node id is stale or foreign.
    #[error("invalid style node")]
    InvalidNode,

    /// A style class with this name is already registered.
    #[error("style class '{name}' already exists")]
    NameTaken { name: String },
}

impl Error {
    pub(crate) fn mismatch(expected: ValueKind, got: ValueKind) -> Self {
        Self::TypeMismatch {
            expected: expected.name(),
            got: got.name(),
        }
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { .. } => Status::NotFound,
            Error::TypeMismatch { .. } => Status::BadArguments,
            Error::InvalidNode => Status::NotFound,
            Error::NameTaken { .. } => Status::AlreadyExists,
        }
    }
}
