use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_server::{app, Config, MongoStore, TodoService};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    todo_server::init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;

    let store = MongoStore::connect(&config.mongodb_uri)
        .await
        .context("failed to connect to MongoDB")?;
    info!(database = todo_server::mongo::DATABASE, "connected to MongoDB");

    let service = TodoService::new(Arc::new(store.clone()));
    let static_dir = config.static_dir();
    let app = app(service, static_dir.as_deref());

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, production = config.is_production(), "listening");

    todo_server::run(listener, app, shutdown_signal())
        .await
        .context("server error")?;

    store.shutdown().await;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
