//! # TaskTracker API Server
//!
//! The API server for TaskTracker, exposing a REST surface over the
//! entity store for projects and tasks.
//!
//! ## Architecture
//!
//! The server is built with Axum and provides:
//! - Project and task CRUD endpoints under a configurable base path
//! - A public health endpoint with database connectivity status
//! - Owner fallback policy for projects created without an owner
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tasktracker-api
//! ```

use std::sync::Arc;
use tasktracker_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasktracker_shared::{
    db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig},
    },
    ownership::FallbackOwnerResolver,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktracker_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskTracker API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let state = AppState::new(
        pool,
        config.clone(),
        Arc::new(FallbackOwnerResolver::default()),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        "Server listening on http://{} (API rooted at {})",
        config.bind_address(),
        config.api.base_path
    );

    axum::serve(listener, app).await?;

    Ok(())
}
