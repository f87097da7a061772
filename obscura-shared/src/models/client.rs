/// Client model and database operations
///
/// Studio clients are flat records: contact details and an address line.
/// Updates are full replacements — the PUT body carries the same shape as
/// creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A studio client row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Client {
    /// Creates a new client
    pub async fn create(pool: &PgPool, data: CreateClient) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, email, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.address)
        .fetch_one(pool)
        .await
    }

    /// Finds a client by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all clients, ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM clients
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Replaces a client's fields
    ///
    /// Returns the updated client, or `None` if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: CreateClient,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = $2, email = $3, phone = $4, address = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.address)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a client, returning whether a row was removed
    ///
    /// Sessions and quotes belonging to the client cascade away with it.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
