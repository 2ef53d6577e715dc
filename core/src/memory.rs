//! In-memory `DocumentStore`.
//!
//! # Design
//! Documents live in insertion order behind a tokio `RwLock`, each one a JSON
//! object carrying its `_id`. Reads decode the object into a `Todo` and
//! ignore fields the shape does not know; partial updates write keys
//! straight into the object. A merged value of the wrong type therefore
//! surfaces on the next read as `StoreError::Decode`, the same way it would
//! from the document database.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::DocumentStore;
use crate::types::{Todo, TodoId, TodoPatch};

const ID_FIELD: &str = "_id";

#[derive(Debug)]
struct StoredDocument {
    id: TodoId,
    fields: Map<String, Value>,
}

impl StoredDocument {
    fn decode(&self) -> Result<Todo, StoreError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| StoreError::Decode(format!("{}: {e}", self.id)))
    }
}

/// Thread-safe store backed by a shared vector. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    documents: Arc<RwLock<Vec<StoredDocument>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn encode(id: TodoId, todo: &Todo) -> Result<Map<String, Value>, StoreError> {
    let value = serde_json::to_value(todo).map_err(|e| StoreError::Backend(e.to_string()))?;
    let Value::Object(mut fields) = value else {
        return Err(StoreError::Backend("todo did not encode to an object".to_string()));
    };
    fields.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
    Ok(fields)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, todo: &Todo) -> Result<TodoId, StoreError> {
        let id = todo.id.unwrap_or_default();
        let fields = encode(id, todo)?;

        let mut documents = self.documents.write().await;
        if documents.iter().any(|doc| doc.id == id) {
            return Err(StoreError::Backend(format!("duplicate key: _id {id}")));
        }
        documents.push(StoredDocument { id, fields });
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let documents = self.documents.read().await;
        documents.iter().map(StoredDocument::decode).collect()
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let documents = self.documents.read().await;
        documents
            .iter()
            .find(|doc| doc.id == *id)
            .map(StoredDocument::decode)
            .transpose()
    }

    async fn update_fields(&self, id: &TodoId, patch: &TodoPatch) -> Result<u64, StoreError> {
        let mut documents = self.documents.write().await;
        let Some(doc) = documents.iter_mut().find(|doc| doc.id == *id) else {
            return Ok(0);
        };

        if patch.contains_key(ID_FIELD) {
            return Err(StoreError::Backend(
                "update would modify the immutable field '_id'".to_string(),
            ));
        }

        for (key, value) in patch {
            doc.fields.insert(key.clone(), value.clone());
        }
        Ok(1)
    }

    async fn replace(&self, id: &TodoId, todo: &Todo) -> Result<u64, StoreError> {
        let fields = encode(*id, todo)?;

        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|doc| doc.id == *id) {
            Some(doc) => {
                doc.fields = fields;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<u64, StoreError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|doc| doc.id != *id);
        Ok((before - documents.len()) as u64)
    }
}
