//! Request validation and persistence mapping for the todo collection.
//!
//! # Design
//! `TodoService` owns no state beyond the injected store handle. Each
//! operation validates its input, makes exactly one store call and maps the
//! outcome to either a value or an `ApiError`. Input errors never reach the
//! store.
//!
//! Two behaviors follow the document database as-is: a partial update that
//! matches no document still succeeds, and replace echoes the document it
//! was sent rather than re-reading it.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use todo_core::{DocumentStore, StoreError, Todo, TodoId, TodoPatch};
use tracing::{error, info, warn};

use crate::error::ApiError;

pub type SharedStore = Arc<dyn DocumentStore>;

#[derive(Clone)]
pub struct TodoService {
    store: SharedStore,
}

impl TodoService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.store.find_all().await.map_err(|err| {
            error!(error = %err, "find todos failed");
            match err {
                StoreError::Backend(_) => ApiError::Internal("Failed to find todos"),
                StoreError::Decode(_) => ApiError::Internal("Failed to decode todo"),
                StoreError::Cursor(_) => ApiError::Internal("Cursor iteration error"),
            }
        })
    }

    pub async fn create_todo(&self, body: &[u8]) -> Result<Todo, ApiError> {
        let mut todo: Todo = parse_body(body)?;

        if todo.title.is_empty() {
            warn!("rejected todo with empty title");
            return Err(ApiError::BadRequest("Todo title cannot be empty"));
        }
        if todo.body.is_empty() {
            warn!("rejected todo with empty body");
            return Err(ApiError::BadRequest("Todo body cannot be empty"));
        }

        let id = *todo.id.get_or_insert_with(TodoId::new);
        self.store.insert(&todo).await.map_err(|err| {
            error!(error = %err, %id, "insert todo failed");
            ApiError::Internal("Failed to create todo")
        })?;

        info!(%id, "todo inserted");
        Ok(todo)
    }

    pub async fn get_todo(&self, raw_id: &str) -> Result<Todo, ApiError> {
        let id = parse_id(raw_id)?;
        match self.store.find_by_id(&id).await {
            Ok(Some(todo)) => Ok(todo),
            Ok(None) => Err(ApiError::NotFound),
            Err(err) => {
                warn!(error = %err, %id, "find todo failed");
                Err(ApiError::NotFound)
            }
        }
    }

    /// Merge the body's fields into the todo. Reports success even when no
    /// document carries `raw_id`.
    pub async fn update_todo(&self, raw_id: &str, body: &[u8]) -> Result<(), ApiError> {
        let id = parse_id(raw_id)?;
        let patch: TodoPatch = parse_body(body)?;

        let matched = self.store.update_fields(&id, &patch).await.map_err(|err| {
            error!(error = %err, %id, "update todo failed");
            ApiError::Internal("Failed to update todo")
        })?;

        info!(%id, matched, "todo updated");
        Ok(())
    }

    /// Overwrite the todo with the body, forcing its id to `raw_id`. Returns
    /// the document as sent.
    pub async fn replace_todo(&self, raw_id: &str, body: &[u8]) -> Result<Todo, ApiError> {
        let id = parse_id(raw_id)?;
        let mut todo: Todo = parse_body(body)?;
        todo.id = Some(id);

        let matched = self.store.replace(&id, &todo).await.map_err(|err| {
            error!(error = %err, %id, "replace todo failed");
            ApiError::Internal("Failed to replace todo")
        })?;

        info!(%id, matched, "todo replaced");
        Ok(todo)
    }

    pub async fn delete_todo(&self, raw_id: &str) -> Result<(), ApiError> {
        let id = parse_id(raw_id)?;

        let deleted = self.store.delete_by_id(&id).await.map_err(|err| {
            error!(error = %err, %id, "delete todo failed");
            ApiError::Internal("Failed to delete todo")
        })?;

        if deleted == 0 {
            warn!(%id, "todo not found");
            return Err(ApiError::NotFound);
        }

        info!(%id, "todo deleted");
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<TodoId, ApiError> {
    raw.parse::<TodoId>().map_err(|err| {
        warn!(error = %err, "invalid todo id");
        ApiError::BadRequest("Invalid todo ID")
    })
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "cannot parse request body");
        ApiError::BadRequest("Cannot parse JSON")
    })
}

#[cfg(test)]
mod tests {
    use todo_core::InMemoryStore;

    use super::*;

    fn service() -> (TodoService, InMemoryStore) {
        let store = InMemoryStore::new();
        (TodoService::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn create_checks_title_before_body() {
        let (service, store) = service();
        let err = service
            .create_todo(br#"{"title":"","body":""}"#)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Todo title cannot be empty"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn create_keeps_a_supplied_id() {
        let (service, _) = service();
        let id = TodoId::new();
        let body = format!(r#"{{"_id":"{id}","title":"t","body":"b"}}"#);

        let todo = service.create_todo(body.as_bytes()).await.unwrap();
        assert_eq!(todo.id, Some(id));
        assert_eq!(service.get_todo(&id.to_hex()).await.unwrap(), todo);
    }

    #[tokio::test]
    async fn create_with_taken_id_is_internal_error() {
        let (service, store) = service();
        let id = TodoId::new();
        let body = format!(r#"{{"_id":"{id}","title":"t","body":"b"}}"#);

        service.create_todo(body.as_bytes()).await.unwrap();
        let err = service.create_todo(body.as_bytes()).await.unwrap_err();
        assert_eq!(err, ApiError::Internal("Failed to create todo"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_may_clear_required_fields() {
        let (service, _) = service();
        let created = service
            .create_todo(br#"{"title":"t","body":"b"}"#)
            .await
            .unwrap();
        let id = created.id.unwrap().to_hex();

        service.update_todo(&id, br#"{"title":""}"#).await.unwrap();
        let todo = service.get_todo(&id).await.unwrap();
        assert!(todo.title.is_empty());
        assert_eq!(todo.body, "b");
    }

    #[tokio::test]
    async fn update_rejects_non_object_body() {
        let (service, _) = service();
        let err = service
            .update_todo(&TodoId::new().to_hex(), b"[1,2]")
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Cannot parse JSON"));
    }

    #[tokio::test]
    async fn list_reports_undecodable_document() {
        let (service, _) = service();
        let created = service
            .create_todo(br#"{"title":"t","body":"b"}"#)
            .await
            .unwrap();
        let id = created.id.unwrap().to_hex();
        service
            .update_todo(&id, br#"{"completed":"not a bool"}"#)
            .await
            .unwrap();

        let err = service.list_todos().await.unwrap_err();
        assert_eq!(err, ApiError::Internal("Failed to decode todo"));
    }

    #[tokio::test]
    async fn invalid_id_is_checked_before_body() {
        let (service, _) = service();
        let err = service.replace_todo("bad", b"not json").await.unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Invalid todo ID"));
    }
}
