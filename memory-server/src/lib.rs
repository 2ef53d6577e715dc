//! In-memory variant of the todo API.
//!
//! # Design
//! Todos live in a `Vec` behind a tokio `Mutex`, together with the last
//! assigned id. Creating a todo bumps the counter and appends under the same
//! lock, so ids stay unique under concurrent writers and are never reused
//! after a delete. Nothing is persisted; a restart starts from empty.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, Method, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub completed: bool,
    pub title: String,
    pub body: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Default)]
pub struct TodoList {
    todos: Vec<Todo>,
    last_id: u64,
}

pub type Db = Arc<Mutex<TodoList>>;

type HandlerError = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: &str) -> HandlerError {
    (status, Json(json!({ "error": message })))
}

fn not_found() -> HandlerError {
    error(StatusCode::NOT_FOUND, "Todo not found")
}

/// Ids are matched as numbers; a path that is not one matches nothing.
fn parse_id(raw: &str) -> Result<u64, HandlerError> {
    raw.parse().map_err(|_| not_found())
}

pub fn app() -> Router {
    app_with(Db::default())
}

/// Build the router over an existing list, so callers can inspect it.
pub fn app_with(db: Db) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", patch(complete_todo).delete(delete_todo))
        .with_state(db)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let list = db.lock().await;
    Json(list.todos.clone())
}

async fn create_todo(
    State(db): State<Db>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), HandlerError> {
    let input: CreateTodo = serde_json::from_slice(&body).map_err(|err| {
        warn!(error = %err, "cannot parse request body");
        error(StatusCode::BAD_REQUEST, "Cannot parse JSON")
    })?;

    if input.title.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Todo title cannot be empty"));
    }
    if input.body.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Todo body cannot be empty"));
    }

    let mut list = db.lock().await;
    list.last_id += 1;
    let todo = Todo {
        id: list.last_id,
        completed: input.completed,
        title: input.title,
        body: input.body,
    };
    list.todos.push(todo.clone());

    info!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Mark the todo completed and return it.
async fn complete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, HandlerError> {
    let id = parse_id(&id)?;
    let mut list = db.lock().await;
    let todo = list
        .todos
        .iter_mut()
        .find(|todo| todo.id == id)
        .ok_or_else(not_found)?;
    todo.completed = true;
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, HandlerError> {
    let id = parse_id(&id)?;
    let mut list = db.lock().await;
    let index = list
        .todos
        .iter()
        .position(|todo| todo.id == id)
        .ok_or_else(not_found)?;
    list.todos.remove(index);

    info!(id, "todo deleted");
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: 7,
            completed: false,
            title: "Test".to_string(),
            body: "Body".to_string(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["body"], "Body");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn create_todo_defaults_missing_fields() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"Only title"}"#).unwrap();
        assert_eq!(input.title, "Only title");
        assert!(input.body.is_empty());
        assert!(!input.completed);
    }

    #[test]
    fn create_todo_rejects_wrong_types() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"title":1}"#);
        assert!(result.is_err());
    }
}
