//! The persistence seam used by the todo service.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{Todo, TodoId, TodoPatch};

/// A flat collection of todo documents keyed by id.
///
/// Counts mirror document-database semantics: an update or replace that
/// matches nothing is `Ok(0)`, not an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document. A todo without an id is assigned a fresh one.
    async fn insert(&self, todo: &Todo) -> Result<TodoId, StoreError>;

    /// Every document, in store order.
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// Merge `patch` into the matching document and return the matched count.
    async fn update_fields(&self, id: &TodoId, patch: &TodoPatch) -> Result<u64, StoreError>;

    /// Overwrite the matching document and return the matched count.
    async fn replace(&self, id: &TodoId, todo: &Todo) -> Result<u64, StoreError>;

    /// Remove the matching document and return the deleted count.
    async fn delete_by_id(&self, id: &TodoId) -> Result<u64, StoreError>;
}
