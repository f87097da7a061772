/// Quote model: quotes with child line items
///
/// A quote owns its line items. Updating a quote replaces the whole item
/// collection — existing rows are deleted and the submitted items inserted
/// fresh, inside one transaction. Item ids are therefore not stable across
/// updates; callers must key on the quote id. Each item's total is computed
/// server-side as quantity × unit price.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Quote lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "quote_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
    Expired,
}

/// A quote row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quote {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub valid_until: DateTime<Utc>,
    pub status: QuoteStatus,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A quote line item row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuoteItem {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A quote with its items embedded, the shape read endpoints return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteWithItems {
    #[serde(flatten)]
    pub quote: Quote,

    pub items: Vec<QuoteItem>,
}

/// Input for one line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuoteItem {
    pub description: String,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Input for creating or replacing a quote
#[derive(Debug, Clone)]
pub struct CreateQuote {
    pub client_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub valid_until: DateTime<Utc>,
    pub status: QuoteStatus,
    pub total: f64,
    pub items: Vec<CreateQuoteItem>,
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    quote_id: Uuid,
    items: &[CreateQuoteItem],
) -> Result<Vec<QuoteItem>, sqlx::Error> {
    let mut rows = Vec::with_capacity(items.len());

    for item in items {
        let row = sqlx::query_as::<_, QuoteItem>(
            r#"
            INSERT INTO quote_items (quote_id, description, quantity, unit_price, total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, quote_id, description, quantity, unit_price, total,
                      created_at, updated_at
            "#,
        )
        .bind(quote_id)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(f64::from(item.quantity) * item.unit_price)
        .fetch_one(&mut **tx)
        .await?;

        rows.push(row);
    }

    Ok(rows)
}

impl Quote {
    /// Creates a quote and its items in one transaction
    pub async fn create(pool: &PgPool, data: CreateQuote) -> Result<QuoteWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (client_id, title, description, valid_until, status, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, client_id, title, description, valid_until, status, total,
                      created_at, updated_at
            "#,
        )
        .bind(data.client_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.valid_until)
        .bind(data.status)
        .bind(data.total)
        .fetch_one(&mut *tx)
        .await?;

        let items = insert_items(&mut tx, quote.id, &data.items).await?;

        tx.commit().await?;

        Ok(QuoteWithItems { quote, items })
    }

    /// Finds a quote by id, without items
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, client_id, title, description, valid_until, status, total,
                   created_at, updated_at
            FROM quotes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Loads a quote together with its items
    pub async fn find_with_items(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<QuoteWithItems>, sqlx::Error> {
        let Some(quote) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let items = Self::list_items(pool, id).await?;
        Ok(Some(QuoteWithItems { quote, items }))
    }

    /// Lists a quote's items in insertion order
    pub async fn list_items(pool: &PgPool, quote_id: Uuid) -> Result<Vec<QuoteItem>, sqlx::Error> {
        sqlx::query_as::<_, QuoteItem>(
            r#"
            SELECT id, quote_id, description, quantity, unit_price, total,
                   created_at, updated_at
            FROM quote_items
            WHERE quote_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(quote_id)
        .fetch_all(pool)
        .await
    }

    /// Lists all quotes with items, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<QuoteWithItems>, sqlx::Error> {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, client_id, title, description, valid_until, status, total,
                   created_at, updated_at
            FROM quotes
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        let mut result = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let items = Self::list_items(pool, quote.id).await?;
            result.push(QuoteWithItems { quote, items });
        }

        Ok(result)
    }

    /// Replaces a quote and its entire item collection in one transaction
    ///
    /// The old items are deleted and the submitted ones inserted fresh, so
    /// item ids change on every update.
    ///
    /// Returns the updated quote, or `None` if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: CreateQuote,
    ) -> Result<Option<QuoteWithItems>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(quote) = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET client_id = $2, title = $3, description = $4, valid_until = $5,
                status = $6, total = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, client_id, title, description, valid_until, status, total,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.client_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.valid_until)
        .bind(data.status)
        .bind(data.total)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM quote_items WHERE quote_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let items = insert_items(&mut tx, id, &data.items).await?;

        tx.commit().await?;

        Ok(Some(QuoteWithItems { quote, items }))
    }

    /// Moves a quote to a new status
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: QuoteStatus,
    ) -> Result<Option<QuoteWithItems>, sqlx::Error> {
        let updated = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, client_id, title, description, valid_until, status, total,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(quote) => {
                let items = Self::list_items(pool, id).await?;
                Ok(Some(QuoteWithItems { quote, items }))
            }
            None => Ok(None),
        }
    }

    /// Deletes a quote and its items in one transaction, returning whether
    /// the quote row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM quote_items WHERE quote_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&QuoteStatus::Draft).unwrap(),
            "\"DRAFT\""
        );
        assert_eq!(
            serde_json::from_str::<QuoteStatus>("\"EXPIRED\"").unwrap(),
            QuoteStatus::Expired
        );
    }

    #[test]
    fn test_quote_with_items_flattens() {
        let quote = Quote {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            title: "Casamento".to_string(),
            description: None,
            valid_until: Utc::now(),
            status: QuoteStatus::Draft,
            total: 1500.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let with_items = QuoteWithItems {
            quote,
            items: vec![],
        };

        let json = serde_json::to_value(&with_items).unwrap();
        assert_eq!(json["title"], "Casamento");
        assert!(json["items"].as_array().unwrap().is_empty());
        assert!(json.get("quote").is_none());
    }
}
