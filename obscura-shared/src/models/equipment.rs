/// Equipment inventory model
///
/// Gear tracked by the studio: cameras, lenses, lighting, supports, and
/// accessories, with stock counts and a minimum-quantity threshold that
/// feeds the low-stock figure in [`EquipmentStats`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Equipment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "equipment_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentCategory {
    Camera,
    Lens,
    Lighting,
    Support,
    Accessory,
}

/// Equipment availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "equipment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    Available,
    InUse,
    Maintenance,
    LowStock,
}

/// An equipment row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: EquipmentCategory,
    pub status: EquipmentStatus,
    pub quantity: i32,
    pub min_quantity: i32,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub purchase_price: Option<f64>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing an equipment record
#[derive(Debug, Clone)]
pub struct CreateEquipment {
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: EquipmentCategory,
    pub status: EquipmentStatus,
    pub quantity: i32,
    pub min_quantity: i32,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub purchase_price: Option<f64>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

/// Inventory counters for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EquipmentStats {
    pub total: i64,
    pub available: i64,
    pub in_use: i64,
    pub maintenance: i64,

    /// Items at or below their minimum quantity
    pub low_stock: i64,
}

const COLUMNS: &str = "id, name, brand, model, serial_number, category, status, quantity, \
                       min_quantity, location, purchase_date, purchase_price, supplier, notes, \
                       created_at, updated_at";

impl Equipment {
    /// Creates an equipment record
    pub async fn create(pool: &PgPool, data: CreateEquipment) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO equipments (name, brand, model, serial_number, category, status,
                                    quantity, min_quantity, location, purchase_date,
                                    purchase_price, supplier, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, Equipment>(&query)
            .bind(data.name)
            .bind(data.brand)
            .bind(data.model)
            .bind(data.serial_number)
            .bind(data.category)
            .bind(data.status)
            .bind(data.quantity)
            .bind(data.min_quantity)
            .bind(data.location)
            .bind(data.purchase_date)
            .bind(data.purchase_price)
            .bind(data.supplier)
            .bind(data.notes)
            .fetch_one(pool)
            .await
    }

    /// Finds an equipment record by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipments WHERE id = $1");

        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists the whole inventory, ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipments ORDER BY name");

        sqlx::query_as::<_, Equipment>(&query).fetch_all(pool).await
    }

    /// Replaces an equipment record's fields
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: CreateEquipment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE equipments
            SET name = $2, brand = $3, model = $4, serial_number = $5, category = $6,
                status = $7, quantity = $8, min_quantity = $9, location = $10,
                purchase_date = $11, purchase_price = $12, supplier = $13, notes = $14,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.brand)
            .bind(data.model)
            .bind(data.serial_number)
            .bind(data.category)
            .bind(data.status)
            .bind(data.quantity)
            .bind(data.min_quantity)
            .bind(data.location)
            .bind(data.purchase_date)
            .bind(data.purchase_price)
            .bind(data.supplier)
            .bind(data.notes)
            .fetch_optional(pool)
            .await
    }

    /// Deletes an equipment record, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM equipments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Computes inventory counters in one pass
    pub async fn stats(pool: &PgPool) -> Result<EquipmentStats, sqlx::Error> {
        sqlx::query_as::<_, EquipmentStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'AVAILABLE') AS available,
                COUNT(*) FILTER (WHERE status = 'IN_USE') AS in_use,
                COUNT(*) FILTER (WHERE status = 'MAINTENANCE') AS maintenance,
                COUNT(*) FILTER (WHERE quantity <= min_quantity) AS low_stock
            FROM equipments
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
    fn test_category_wire_format() {
        assert_eq!(
            serde_json::to_string(&EquipmentCategory::Lens).unwrap(),
            "\"LENS\""
        );
        assert_eq!(
            serde_json::from_str::<EquipmentStatus>("\"LOW_STOCK\"").unwrap(),
            EquipmentStatus::LowStock
        );
    }
}
