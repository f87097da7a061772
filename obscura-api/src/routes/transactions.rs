/// Financial transaction endpoints
///
/// Standard CRUD at `/transactions` plus `GET /transactions/stats` for
/// income/expense totals. Updates are full replacements.

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
use obscura_shared::models::transaction::{
    CreateTransaction, FinancialTransaction, TransactionStats, TransactionStatus, TransactionType,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create/replace transaction request
#[derive(Debug, Deserialize, Validate)]
pub struct TransactionRequest {
    #[validate(length(min = 1, message = "Descrição é obrigatória"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Valor deve ser maior ou igual a 0"))]
    pub amount: Option<f64>,

    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,

    pub status: Option<TransactionStatus>,
    pub date: Option<DateTime<Utc>>,
    pub client_id: Option<Uuid>,
}

impl TransactionRequest {
    fn into_input(self) -> ApiResult<CreateTransaction> {
        self.validate()?;

        Ok(CreateTransaction {
            description: self.description.ok_or_else(|| missing_field("description"))?,
            amount: self.amount.ok_or_else(|| missing_field("amount"))?,
            transaction_type: self
                .transaction_type
                .ok_or_else(|| missing_field("type"))?,
            status: self.status.unwrap_or(TransactionStatus::Pending),
            date: self.date.ok_or_else(|| missing_field("date"))?,
            client_id: self.client_id,
        })
    }
}

/// Create a ledger entry
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(req): Json<TransactionRequest>,
) -> ApiResult<(StatusCode, Json<FinancialTransaction>)> {
    let transaction = FinancialTransaction::create(&state.db, req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// List all ledger entries, most recent first
pub async fn list_transactions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<FinancialTransaction>>> {
    Ok(Json(FinancialTransaction::list(&state.db).await?))
}

/// Fetch one ledger entry
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FinancialTransaction>> {
    let transaction = FinancialTransaction::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transação não encontrada".to_string()))?;

    Ok(Json(transaction))
}

/// Replace a ledger entry's fields
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TransactionRequest>,
) -> ApiResult<Json<FinancialTransaction>> {
    let transaction = FinancialTransaction::update(&state.db, id, req.into_input()?)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transação não encontrada".to_string()))?;

    Ok(Json(transaction))
}

/// Delete a ledger entry
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = FinancialTransaction::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Transação não encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Income/expense totals over non-cancelled entries
pub async fn transaction_stats(
    State(state): State<AppState>,
) -> ApiResult<Json<TransactionStats>> {
    Ok(Json(FinancialTransaction::stats(&state.db).await?))
}
