//! The error taxonomy of the crate.
//!
//! Errors are reported to the immediate caller and never retried or swallowed
//! internally; a failed materialization publishes nothing, so previously
//! realized sequences stay fully usable.

use std::sync::Arc;

/// The error type carried inside [`Error::ElementProcessing`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Indexed access, update, insertion or removal outside the valid range.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A reducer failed to absorb a source element. Carries the index of the
    /// offending element and the underlying cause; no partial result is
    /// published.
    #[error("failed to process element at index {index}")]
    ElementProcessing {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// A head/reduce-style operation needed at least one element.
    #[error("operation requires a non-empty sequence")]
    EmptySequence,

    /// A deferred producer completed with a failure; the original failure is
    /// re-raised to every blocked and future caller.
    #[error("deferred producer failed: {0}")]
    Failed(Arc<Error>),
}
