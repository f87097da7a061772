/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use obscura_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use obscura_shared::auth::middleware::require_auth;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned per request via Axum's `State`
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                     # public
/// ├── /uploads/*                  # static files (avatars, photos)
/// ├── /auth/                      # public
/// │   ├── POST /register
/// │   └── POST /login
/// └── (verifier middleware)       # everything below requires a token
///     ├── /users/                 # admin CRUD + /me + profile + avatar
///     ├── /clients/               # CRUD
///     ├── /sessions/              # CRUD + status + photos sub-resource
///     ├── /quotes/                # CRUD + status
///     ├── /equipments/            # CRUD + stats
///     ├── /transactions/          # CRUD + stats
///     └── /system/configs/        # keyed CRUD
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route("/me", get(routes::users::me))
        .route("/profile", put(routes::users::update_profile))
        .route(
            "/avatar",
            put(routes::users::update_avatar)
                .layer(DefaultBodyLimit::max(routes::users::MAX_AVATAR_BYTES + 64 * 1024)),
        )
        .route(
            "/:id",
            put(routes::users::update_user).delete(routes::users::delete_user),
        );

    let client_routes = Router::new()
        .route(
            "/",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route(
            "/:id",
            get(routes::clients::get_client)
                .put(routes::clients::update_client)
                .delete(routes::clients::delete_client),
        );

    let session_routes = Router::new()
        .route(
            "/",
            get(routes::sessions::list_sessions).post(routes::sessions::create_session),
        )
        .route(
            "/:id",
            get(routes::sessions::get_session)
                .put(routes::sessions::update_session)
                .delete(routes::sessions::delete_session),
        )
        .route(
            "/:id/status",
            axum::routing::patch(routes::sessions::update_session_status),
        )
        .route(
            "/:id/photos",
            get(routes::sessions::list_photos).post(routes::sessions::add_photo),
        )
        .route(
            "/:id/photos/:photo_id",
            axum::routing::delete(routes::sessions::remove_photo),
        );

    let quote_routes = Router::new()
        .route(
            "/",
            get(routes::quotes::list_quotes).post(routes::quotes::create_quote),
        )
        .route(
            "/:id",
            get(routes::quotes::get_quote)
                .put(routes::quotes::update_quote)
                .delete(routes::quotes::delete_quote),
        )
        .route(
            "/:id/status",
            axum::routing::patch(routes::quotes::update_quote_status),
        );

    let equipment_routes = Router::new()
        .route("/stats", get(routes::equipments::equipment_stats))
        .route(
            "/",
            get(routes::equipments::list_equipments).post(routes::equipments::create_equipment),
        )
        .route(
            "/:id",
            get(routes::equipments::get_equipment)
                .put(routes::equipments::update_equipment)
                .delete(routes::equipments::delete_equipment),
        );

    let transaction_routes = Router::new()
        .route("/stats", get(routes::transactions::transaction_stats))
        .route(
            "/",
            get(routes::transactions::list_transactions)
                .post(routes::transactions::create_transaction),
        )
        .route(
            "/:id",
            get(routes::transactions::get_transaction)
                .put(routes::transactions::update_transaction)
                .delete(routes::transactions::delete_transaction),
        );

    let system_routes = Router::new()
        .route(
            "/configs",
            get(routes::system::list_configs).post(routes::system::create_config),
        )
        .route(
            "/configs/:key",
            get(routes::system::get_config)
                .put(routes::system::update_config)
                .delete(routes::system::delete_config),
        );

    // Everything below the verifier requires a valid Bearer token
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/clients", client_routes)
        .nest("/sessions", session_routes)
        .nest("/quotes", quote_routes)
        .nest("/equipments", equipment_routes)
        .nest("/transactions", transaction_routes)
        .nest("/system", system_routes)
        .layer(axum::middleware::from_fn(require_auth(
            state.jwt_secret().to_string(),
        )));

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(&state.config.uploads.dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
