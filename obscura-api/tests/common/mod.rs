//! Common test utilities for integration tests
//!
//! Provides a TestContext with a fresh router wired to the database from
//! `DATABASE_URL`, plus an admin and a regular user with ready tokens.
//! When the variable is unset or the database is unreachable,
//! `TestContext::new` returns `None` and the tests skip themselves.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use obscura_api::app::{build_router, AppState};
use obscura_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, UploadConfig};
use obscura_shared::auth::{password, token};
use obscura_shared::db::migrations::run_migrations;
use obscura_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

/// Signing secret used by the test router
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Password every test user gets
pub const TEST_PASSWORD: &str = "abcdef";

/// Test context: router, database, and two signed-in users
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub admin: User,
    pub admin_token: String,
    pub user: User,
    pub user_token: String,
}

impl TestContext {
    /// Builds a context against `DATABASE_URL`, or `None` when no
    /// database is available
    pub async fn new() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;

        let db = PgPool::connect(&url).await.ok()?;
        run_migrations(&db).await.ok()?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
            },
            uploads: UploadConfig {
                dir: std::env::temp_dir()
                    .join("obscura-test-uploads")
                    .to_string_lossy()
                    .into_owned(),
            },
        };

        let password_hash = password::hash_password(TEST_PASSWORD).ok()?;

        let admin = User::create(
            &db,
            CreateUser {
                name: "Test Admin".to_string(),
                email: format!("admin-{}@test.com", Uuid::new_v4()),
                password_hash: password_hash.clone(),
                role: UserRole::Admin,
            },
        )
        .await
        .ok()?;

        let user = User::create(
            &db,
            CreateUser {
                name: "Test User".to_string(),
                email: format!("user-{}@test.com", Uuid::new_v4()),
                password_hash,
                role: UserRole::User,
            },
        )
        .await
        .ok()?;

        let admin_token = token::issue_token(admin.id, TEST_SECRET).ok()?;
        let user_token = token::issue_token(user.id, TEST_SECRET).ok()?;

        let app = build_router(AppState::new(db.clone(), config));

        Some(Self {
            db,
            app,
            admin,
            admin_token,
            user,
            user_token,
        })
    }

    /// Removes the context's users
    pub async fn cleanup(self) {
        let _ = User::delete(&self.db, self.admin.id).await;
        let _ = User::delete(&self.db, self.user.id).await;
    }
}

/// Drives one request through the router and returns status + JSON body
/// (`Null` for empty bodies)
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should not hang up");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");

    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, value)
}
