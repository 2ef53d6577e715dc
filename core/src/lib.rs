//! Domain types and the storage seam for the todo service.
//!
//! # Overview
//! `Todo` is the single entity. `DocumentStore` is the collaborator the
//! service talks to; it is a trait so the MongoDB backend and the in-memory
//! test double are interchangeable behind an `Arc<dyn DocumentStore>`.
//!
//! # Design
//! - Ids are 12-byte object ids rendered as 24-character hex strings.
//! - Partial updates are loosely typed field maps, merged verbatim.
//! - `InMemoryStore` keeps documents as JSON objects so merges behave like the
//!   real document database, including fields the `Todo` shape does not know.

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use store::DocumentStore;
pub use types::{InvalidTodoId, Todo, TodoId, TodoPatch};
