//! Errors raised by a `DocumentStore`.
//!
//! # Design
//! The variants separate the three ways a store call can fail, because the
//! service reports each with a different message: the query itself failing,
//! a stored document that no longer decodes into a `Todo`, and a cursor that
//! breaks while the collection is being enumerated. The payload is the
//! backend's own description, meant for logs only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected the operation or could not be reached.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored document could not be decoded into a todo.
    #[error("failed to decode stored document: {0}")]
    Decode(String),

    /// Enumeration failed part way through a result set.
    #[error("cursor iteration error: {0}")]
    Cursor(String),
}
