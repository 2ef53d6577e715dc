//! MongoDB-backed `DocumentStore`.
//!
//! # Design
//! One client is created at startup and shared by every request; the driver
//! pools connections internally. The `todos` collection is typed over
//! `StoredTodo`, whose field names are the persisted layout. Cursor
//! advancement and document decoding are separated so the service can tell
//! a broken cursor from a bad document.

use async_trait::async_trait;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::ClientOptions,
    Client, Collection,
};
use serde::{Deserialize, Serialize};
use todo_core::{DocumentStore, StoreError, Todo, TodoId, TodoPatch};
use tracing::debug;

pub const DATABASE: &str = "golang_db";
pub const COLLECTION: &str = "todos";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTodo {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

impl StoredTodo {
    fn new(id: TodoId, todo: &Todo) -> Self {
        Self {
            id: id.object_id(),
            completed: todo.completed,
            title: todo.title.clone(),
            body: todo.body.clone(),
        }
    }
}

impl From<StoredTodo> for Todo {
    fn from(stored: StoredTodo) -> Self {
        Todo {
            id: Some(stored.id.into()),
            completed: stored.completed,
            title: stored.title,
            body: stored.body,
        }
    }
}

#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<StoredTodo>,
}

impl MongoStore {
    /// Connect and verify the deployment answers a ping.
    pub async fn connect(uri: &str) -> Result<Self, mongodb::error::Error> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        let collection = client.database(DATABASE).collection(COLLECTION);
        Ok(Self { client, collection })
    }

    /// Release the shared client. Call once, at process exit.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

fn by_id(id: &TodoId) -> Document {
    doc! { "_id": id.object_id() }
}

fn backend(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, todo: &Todo) -> Result<TodoId, StoreError> {
        let id = todo.id.unwrap_or_default();
        let result = self
            .collection
            .insert_one(StoredTodo::new(id, todo))
            .await
            .map_err(backend)?;
        debug!(inserted_id = %result.inserted_id, "insert_one");
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let mut cursor = self.collection.find(doc! {}).await.map_err(backend)?;

        let mut todos = Vec::new();
        while cursor
            .advance()
            .await
            .map_err(|e| StoreError::Cursor(e.to_string()))?
        {
            let stored = cursor
                .deserialize_current()
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            todos.push(stored.into());
        }
        Ok(todos)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let stored = self.collection.find_one(by_id(id)).await.map_err(backend)?;
        Ok(stored.map(Todo::from))
    }

    async fn update_fields(&self, id: &TodoId, patch: &TodoPatch) -> Result<u64, StoreError> {
        let fields = bson::to_document(patch).map_err(|e| StoreError::Backend(e.to_string()))?;
        let result = self
            .collection
            .update_one(by_id(id), doc! { "$set": fields })
            .await
            .map_err(backend)?;
        Ok(result.matched_count)
    }

    async fn replace(&self, id: &TodoId, todo: &Todo) -> Result<u64, StoreError> {
        let result = self
            .collection
            .replace_one(by_id(id), StoredTodo::new(*id, todo))
            .await
            .map_err(backend)?;
        Ok(result.matched_count)
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<u64, StoreError> {
        let result = self
            .collection
            .delete_one(by_id(id))
            .await
            .map_err(backend)?;
        Ok(result.deleted_count)
    }
}
