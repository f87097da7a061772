/// Quote endpoints
///
/// # Endpoints
///
/// - CRUD at `/quotes`; PUT replaces the quote and its whole item
///   collection in one transaction (item ids change on every update)
/// - `PATCH /quotes/:id/status` - move through the status lifecycle
///
/// Read endpoints return the quote with its items embedded.

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
use obscura_shared::models::quote::{
    CreateQuote, CreateQuoteItem, Quote, QuoteStatus, QuoteWithItems,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One line item in a quote request
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct QuoteItemRequest {
    #[validate(length(min = 1, message = "Descrição é obrigatória"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Quantidade deve ser maior que 0"))]
    pub quantity: Option<i32>,

    #[validate(range(min = 0.0, message = "Valor unitário deve ser maior ou igual a 0"))]
    pub unit_price: Option<f64>,
}

/// Create/replace quote request
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    pub client_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Título é obrigatório"))]
    pub title: Option<String>,

    pub description: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
    pub status: Option<QuoteStatus>,

    #[validate(range(min = 0.0, message = "Total deve ser maior ou igual a 0"))]
    pub total: Option<f64>,

    #[validate(nested, length(min = 1, message = "Adicione pelo menos um item"))]
    pub items: Option<Vec<QuoteItemRequest>>,
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct QuoteStatusRequest {
    pub status: QuoteStatus,
}

impl QuoteRequest {
    fn into_input(self) -> ApiResult<CreateQuote> {
        self.validate()?;

        let items = self
            .items
            .ok_or_else(|| missing_field("items"))?
            .into_iter()
            .map(|item| {
                Ok(CreateQuoteItem {
                    description: item
                        .description
                        .ok_or_else(|| missing_field("items.description"))?,
                    quantity: item.quantity.ok_or_else(|| missing_field("items.quantity"))?,
                    unit_price: item
                        .unit_price
                        .ok_or_else(|| missing_field("items.unit_price"))?,
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;

        Ok(CreateQuote {
            client_id: self.client_id.ok_or_else(|| missing_field("client_id"))?,
            title: self.title.ok_or_else(|| missing_field("title"))?,
            description: self.description,
            valid_until: self.valid_until.ok_or_else(|| missing_field("valid_until"))?,
            status: self.status.unwrap_or(QuoteStatus::Draft),
            total: self.total.ok_or_else(|| missing_field("total"))?,
            items,
        })
    }
}

/// Create a quote with its items
pub async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> ApiResult<(StatusCode, Json<QuoteWithItems>)> {
    let quote = Quote::create(&state.db, req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

/// List all quotes with items, newest first
pub async fn list_quotes(State(state): State<AppState>) -> ApiResult<Json<Vec<QuoteWithItems>>> {
    Ok(Json(Quote::list(&state.db).await?))
}

/// Fetch one quote with its items
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<QuoteWithItems>> {
    let quote = Quote::find_with_items(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Orçamento não encontrado".to_string()))?;

    Ok(Json(quote))
}

/// Replace a quote and its entire item collection
pub async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<QuoteRequest>,
) -> ApiResult<Json<QuoteWithItems>> {
    let quote = Quote::update(&state.db, id, req.into_input()?)
        .await?
        .ok_or_else(|| ApiError::NotFound("Orçamento não encontrado".to_string()))?;

    Ok(Json(quote))
}

/// Move a quote to a new status
pub async fn update_quote_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<QuoteStatusRequest>,
) -> ApiResult<Json<QuoteWithItems>> {
    let quote = Quote::update_status(&state.db, id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Orçamento não encontrado".to_string()))?;

    Ok(Json(quote))
}

/// Delete a quote and its items
pub async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Quote::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Orçamento não encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
