//! # Obscura API Server
//!
//! REST API for the Obscura studio-management system: clients, photo
//! sessions, quotes, inventory, finances, system configuration, and user
//! administration behind token authentication.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p obscura-api
//! ```

use obscura_api::{
    app::{build_router, AppState},
    config::Config,
};
use obscura_shared::db::{migrations::run_migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "obscura_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Obscura API v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    // Upload storage must exist before the first avatar lands
    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
