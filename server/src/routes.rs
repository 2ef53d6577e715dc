//! HTTP surface of the todo API.
//!
//! # Design
//! Handlers are thin: they pull the path id and the raw body out of the
//! request and hand them to `TodoService`. Bodies are taken as `Bytes`, not
//! `Json<T>`, so a malformed payload is answered with the service's own
//! `{"error":"Cannot parse JSON"}` instead of axum's rejection.

use std::path::Path as FsPath;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use todo_core::Todo;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::service::TodoService;

/// Build the router. When `static_dir` is set, unmatched paths are served
/// from that directory.
pub fn app(service: TodoService, static_dir: Option<&FsPath>) -> Router {
    let mut router = Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo)
                .patch(update_todo)
                .put(replace_todo)
                .delete(delete_todo),
        );

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .with_state(service)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::HEAD,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

async fn list_todos(State(service): State<TodoService>) -> Result<Json<Vec<Todo>>, ApiError> {
    service.list_todos().await.map(Json)
}

async fn create_todo(
    State(service): State<TodoService>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = service.create_todo(&body).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    service.get_todo(&id).await.map(Json)
}

async fn update_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    service.update_todo(&id, &body).await?;
    Ok(success())
}

async fn replace_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    service.replace_todo(&id, &body).await.map(Json)
}

async fn delete_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    service.delete_todo(&id).await?;
    Ok(success())
}
