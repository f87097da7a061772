/// Photo session model and database operations
///
/// A session is a booked shoot for a client. The API returns sessions with
/// their photos embedded ([`SessionWithPhotos`]); the status column walks
/// SCHEDULED → IN_PROGRESS → COMPLETED / CANCELLED via the dedicated
/// status endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::photo::Photo;

/// Kind of shoot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    Wedding,
    Birthday,
    Family,
    Portrait,
    Event,
}

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A photo session row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub client_id: Uuid,
    pub date: DateTime<Utc>,

    #[serde(rename = "type")]
    pub session_type: SessionType,

    pub status: SessionStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session with its photos embedded, the shape read endpoints return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionWithPhotos {
    #[serde(flatten)]
    pub session: Session,

    pub photos: Vec<Photo>,
}

/// Input for creating a session
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub client_id: Uuid,
    pub date: DateTime<Utc>,
    pub session_type: SessionType,
    pub status: SessionStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating a session; only `Some` fields are written
#[derive(Debug, Clone, Default)]
pub struct UpdateSession {
    pub client_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub session_type: Option<SessionType>,
    pub status: Option<SessionStatus>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl Session {
    /// Creates a session
    pub async fn create(pool: &PgPool, data: CreateSession) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (client_id, date, session_type, status, location, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, client_id, date, session_type, status, location, notes,
                      created_at, updated_at
            "#,
        )
        .bind(data.client_id)
        .bind(data.date)
        .bind(data.session_type)
        .bind(data.status)
        .bind(data.location)
        .bind(data.notes)
        .fetch_one(pool)
        .await
    }

    /// Finds a session by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT id, client_id, date, session_type, status, location, notes,
                   created_at, updated_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all sessions, most recent shoot first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT id, client_id, date, session_type, status, location, notes,
                   created_at, updated_at
            FROM sessions
            ORDER BY date DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Loads a session together with its photos
    pub async fn find_with_photos(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<SessionWithPhotos>, sqlx::Error> {
        let Some(session) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let photos = Photo::list_by_session(pool, id).await?;
        Ok(Some(SessionWithPhotos { session, photos }))
    }

    /// Updates a session; only the `Some` fields in `data` are written
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateSession,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE sessions SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.client_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", client_id = ${}", bind_count));
        }
        if data.date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", date = ${}", bind_count));
        }
        if data.session_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(", session_type = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.location.is_some() {
            bind_count += 1;
            query.push_str(&format!(", location = ${}", bind_count));
        }
        if data.notes.is_some() {
            bind_count += 1;
            query.push_str(&format!(", notes = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, client_id, date, session_type, status, location, notes, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Session>(&query).bind(id);

        if let Some(client_id) = data.client_id {
            q = q.bind(client_id);
        }
        if let Some(date) = data.date {
            q = q.bind(date);
        }
        if let Some(session_type) = data.session_type {
            q = q.bind(session_type);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(location) = data.location {
            q = q.bind(location);
        }
        if let Some(notes) = data.notes {
            q = q.bind(notes);
        }

        q.fetch_optional(pool).await
    }

    /// Moves a session to a new status
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: SessionStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, client_id, date, session_type, status, location, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a session (photos cascade away), returning whether a row
    /// was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
