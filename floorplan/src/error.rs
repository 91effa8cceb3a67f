//! Error types for editor operations.
//!
//! ERROR HANDLING
//! ==============
//! Interaction-layer errors never crash the view. `InvalidState` covers
//! double-fired or out-of-turn input and is logged and ignored by the engine.
//! `IndexOutOfRange` means a caller held a stale document snapshot and is
//! treated as an invariant violation.

/// Why an interaction request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStateReason {
    /// Another drag session already owns the pointer.
    #[error("a drag session is already active")]
    DragActive,
    /// The surface does not accept edits.
    #[error("surface is read-only")]
    ReadOnly,
    /// The requested item does not exist in the current document.
    #[error("no item at index {index} (document has {len})")]
    NoSuchItem { index: usize, len: usize },
}

/// Errors produced by document and drag operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// An operation was invoked while its preconditions did not hold.
    #[error("invalid state: {0}")]
    InvalidState(InvalidStateReason),
    /// A document operation referenced an item that does not exist.
    #[error("item index {index} out of range (document has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<InvalidStateReason> for EditorError {
    fn from(reason: InvalidStateReason) -> Self {
        Self::InvalidState(reason)
    }
}
