//! HTTP service for the todo collection.
//!
//! # Overview
//! `TodoService` validates requests and maps them onto a `DocumentStore`;
//! `routes::app` exposes it under `/api/todos`. The binary wires the service
//! to `MongoStore`, the tests wire it to `todo_core::InMemoryStore`.

pub mod config;
pub mod error;
pub mod mongo;
pub mod routes;
pub mod service;

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use mongo::MongoStore;
pub use routes::app;
pub use service::{SharedStore, TodoService};

/// Install the fmt subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
