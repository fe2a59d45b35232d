//! Error types for annoframe-core.

use thiserror::Error;

/// Result type for annoframe-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for annoframe-core operations.
///
/// A missing slot, frame or annotation is not an error: lookups return
/// `Option::None` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The caller supplied a value of the wrong kind, an unknown identifier,
    /// or tried to rebind a frame that is already owned. The graph is left
    /// unchanged.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operation has no context-free meaning and is deliberately not
    /// implemented (for example ordering a prefix tag against a postfix tag).
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an unsupported operation error.
    #[must_use]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// True if this is an [`Error::InvalidInput`].
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
