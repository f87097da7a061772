/// System configuration model
///
/// Key/value rows addressed by key in the API. Keys are unique; creating
/// an existing key conflicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A configuration row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SystemConfig {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a configuration row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSystemConfig {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

impl SystemConfig {
    /// Creates a configuration row
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation when the key exists.
    pub async fn create(pool: &PgPool, data: CreateSystemConfig) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SystemConfig>(
            r#"
            INSERT INTO system_configs (key, value, description)
            VALUES ($1, $2, $3)
            RETURNING id, key, value, description, created_at, updated_at
            "#,
        )
        .bind(data.key)
        .bind(data.value)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    /// Finds a configuration row by key
    pub async fn find_by_key(pool: &PgPool, key: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, SystemConfig>(
            r#"
            SELECT id, key, value, description, created_at, updated_at
            FROM system_configs
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(pool)
        .await
    }

    /// Lists all configuration rows, ordered by key
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SystemConfig>(
            r#"
            SELECT id, key, value, description, created_at, updated_at
            FROM system_configs
            ORDER BY key
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Replaces the row addressed by `key` (the body may rename it)
    pub async fn update_by_key(
        pool: &PgPool,
        key: &str,
        data: CreateSystemConfig,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, SystemConfig>(
            r#"
            UPDATE system_configs
            SET key = $2, value = $3, description = $4, updated_at = NOW()
            WHERE key = $1
            RETURNING id, key, value, description, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(data.key)
        .bind(data.value)
        .bind(data.description)
        .fetch_optional(pool)
        .await
    }

    /// Deletes the row addressed by `key`, returning whether a row was
    /// removed
    pub async fn delete_by_key(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM system_configs WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
