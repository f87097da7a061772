/// Financial transaction model
///
/// Ledger entries for the studio: income and expenses, optionally tied to
/// a client. Cancelled entries are excluded from the totals in
/// [`TransactionStats`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

/// Settlement status of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

/// A ledger entry row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FinancialTransaction {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a ledger entry
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub description: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
    pub client_id: Option<Uuid>,
}

/// Income/expense totals over non-cancelled entries
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionStats {
    pub income_total: f64,
    pub expense_total: f64,
    pub balance: f64,
}

impl FinancialTransaction {
    /// Creates a ledger entry
    pub async fn create(pool: &PgPool, data: CreateTransaction) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, FinancialTransaction>(
            r#"
            INSERT INTO transactions (description, amount, transaction_type, status, date, client_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, description, amount, transaction_type, status, date, client_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.description)
        .bind(data.amount)
        .bind(data.transaction_type)
        .bind(data.status)
        .bind(data.date)
        .bind(data.client_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a ledger entry by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, FinancialTransaction>(
            r#"
            SELECT id, description, amount, transaction_type, status, date, client_id,
                   created_at, updated_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all ledger entries, most recent first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, FinancialTransaction>(
            r#"
            SELECT id, description, amount, transaction_type, status, date, client_id,
                   created_at, updated_at
            FROM transactions
            ORDER BY date DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Replaces a ledger entry's fields
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: CreateTransaction,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, FinancialTransaction>(
            r#"
            UPDATE transactions
            SET description = $2, amount = $3, transaction_type = $4, status = $5,
                date = $6, client_id = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, description, amount, transaction_type, status, date, client_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.description)
        .bind(data.amount)
        .bind(data.transaction_type)
        .bind(data.status)
        .bind(data.date)
        .bind(data.client_id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a ledger entry, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Computes income/expense totals over non-cancelled entries
    pub async fn stats(pool: &PgPool) -> Result<TransactionStats, sqlx::Error> {
        sqlx::query_as::<_, TransactionStats>(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE transaction_type = 'INCOME'), 0) AS income_total,
                COALESCE(SUM(amount) FILTER (WHERE transaction_type = 'EXPENSE'), 0) AS expense_total,
                COALESCE(SUM(amount) FILTER (WHERE transaction_type = 'INCOME'), 0)
                    - COALESCE(SUM(amount) FILTER (WHERE transaction_type = 'EXPENSE'), 0) AS balance
            FROM transactions
            WHERE status != 'CANCELLED'
            "#,
        )
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&TransactionType::Income).unwrap(),
            "\"INCOME\""
        );
        assert_eq!(
            serde_json::from_str::<TransactionStatus>("\"PENDING\"").unwrap(),
            TransactionStatus::Pending
        );
    }

    #[test]
    fn test_transaction_serializes_type_field() {
        let entry = FinancialTransaction {
            id: Uuid::new_v4(),
            description: "Ensaio".to_string(),
            amount: 350.0,
            transaction_type: TransactionType::Income,
            status: TransactionStatus::Completed,
            date: Utc::now(),
            client_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "INCOME");
        assert!(json.get("transaction_type").is_none());
    }
}
