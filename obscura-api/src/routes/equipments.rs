/// Equipment inventory endpoints
///
/// Standard CRUD at `/equipments` plus `GET /equipments/stats` for the
/// dashboard counters. Updates are full replacements.

use crate::{
    app::AppState,
    error::{missing_field, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use obscura_shared::models::equipment::{
    CreateEquipment, Equipment, EquipmentCategory, EquipmentStats, EquipmentStatus,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create/replace equipment request
#[derive(Debug, Deserialize, Validate)]
pub struct EquipmentRequest {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: Option<String>,

    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<EquipmentCategory>,
    pub status: Option<EquipmentStatus>,

    #[validate(range(min = 0, message = "Quantidade deve ser maior ou igual a 0"))]
    pub quantity: Option<i32>,

    #[validate(range(min = 0, message = "Quantidade mínima deve ser maior ou igual a 0"))]
    pub min_quantity: Option<i32>,

    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,

    #[validate(range(min = 0.0, message = "Preço de compra deve ser maior ou igual a 0"))]
    pub purchase_price: Option<f64>,

    pub supplier: Option<String>,
    pub notes: Option<String>,
}

impl EquipmentRequest {
    fn into_input(self) -> ApiResult<CreateEquipment> {
        self.validate()?;

        Ok(CreateEquipment {
            name: self.name.ok_or_else(|| missing_field("name"))?,
            brand: self.brand,
            model: self.model,
            serial_number: self.serial_number,
            category: self.category.ok_or_else(|| missing_field("category"))?,
            status: self.status.unwrap_or(EquipmentStatus::Available),
            quantity: self.quantity.ok_or_else(|| missing_field("quantity"))?,
            min_quantity: self.min_quantity.unwrap_or(0),
            location: self.location,
            purchase_date: self.purchase_date,
            purchase_price: self.purchase_price,
            supplier: self.supplier,
            notes: self.notes,
        })
    }
}

/// Create an equipment record
pub async fn create_equipment(
    State(state): State<AppState>,
    Json(req): Json<EquipmentRequest>,
) -> ApiResult<(StatusCode, Json<Equipment>)> {
    let equipment = Equipment::create(&state.db, req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// List the whole inventory
pub async fn list_equipments(State(state): State<AppState>) -> ApiResult<Json<Vec<Equipment>>> {
    Ok(Json(Equipment::list(&state.db).await?))
}

/// Fetch one equipment record
pub async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Equipment>> {
    let equipment = Equipment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipamento não encontrado".to_string()))?;

    Ok(Json(equipment))
}

/// Replace an equipment record's fields
pub async fn update_equipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EquipmentRequest>,
) -> ApiResult<Json<Equipment>> {
    let equipment = Equipment::update(&state.db, id, req.into_input()?)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipamento não encontrado".to_string()))?;

    Ok(Json(equipment))
}

/// Delete an equipment record
pub async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Equipment::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Equipamento não encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Inventory counters for the dashboard
pub async fn equipment_stats(State(state): State<AppState>) -> ApiResult<Json<EquipmentStats>> {
    Ok(Json(Equipment::stats(&state.db).await?))
}
