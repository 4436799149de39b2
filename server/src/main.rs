//! Serves the REST API derived from `SCHEMA_PATH`.
//!
//! Run from repo root: `cargo run -p schema-rest-server`

use anyhow::Context;
use schema_rest::{app, init_tracing, load_dump, AppConfig, AppState, Database, MemoryDatabase, MySqlDatabase};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(&config.log_filter);

    let tables = load_dump(&config.schema_path)
        .with_context(|| format!("loading schema {}", config.schema_path.display()))?;
    tracing::info!(tables = tables.len(), schema = %config.schema_path.display(), "schema loaded");

    let db: Arc<dyn Database> = if config.uses_memory_store() {
        tracing::warn!("using in-memory store; data is lost on exit");
        Arc::new(MemoryDatabase::from_schema(&tables))
    } else {
        Arc::new(MySqlDatabase::connect_lazy(&config.database_url, config.max_connections)?)
    };
    if let Err(err) = db.ping().await {
        tracing::warn!(error = %err, "database not reachable at startup");
    }

    let state = AppState::new(db, config.jwt_secret.as_bytes(), config.token_ttl_secs);
    let router = app(state, &tables, &config.protected_paths);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
