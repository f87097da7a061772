/// Photo model: images attached to a photo session
///
/// Photos live and die with their session (ON DELETE CASCADE); the delete
/// operation is scoped by session id so a photo can only be removed
/// through its own session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A photo row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub session_id: Uuid,
    pub url: String,
    pub filename: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for attaching a photo to a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePhoto {
    pub url: String,
    pub filename: String,
    pub description: Option<String>,
}

impl Photo {
    /// Attaches a photo to a session
    pub async fn create(
        pool: &PgPool,
        session_id: Uuid,
        data: CreatePhoto,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (session_id, url, filename, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, session_id, url, filename, description, created_at, updated_at
            "#,
        )
        .bind(session_id)
        .bind(data.url)
        .bind(data.filename)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    /// Lists a session's photos in insertion order
    pub async fn list_by_session(
        pool: &PgPool,
        session_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, session_id, url, filename, description, created_at, updated_at
            FROM photos
            WHERE session_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }

    /// Removes a photo from a session, returning whether a row was removed
    pub async fn delete(
        pool: &PgPool,
        session_id: Uuid,
        photo_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1 AND session_id = $2")
            .bind(photo_id)
            .bind(session_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
