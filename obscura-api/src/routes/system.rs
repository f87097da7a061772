/// System configuration endpoints
///
/// Key/value rows addressed by key: `/system/configs` and
/// `/system/configs/:key`. Creating an existing key answers 409.

use crate::{
    app::AppState,
    error::{missing_field, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use obscura_shared::models::system_config::{CreateSystemConfig, SystemConfig};
use serde::Deserialize;
use validator::Validate;

/// Create/replace configuration request
#[derive(Debug, Deserialize, Validate)]
pub struct ConfigRequest {
    #[validate(length(min = 1, message = "Chave é obrigatória"))]
    pub key: Option<String>,

    pub value: Option<String>,
    pub description: Option<String>,
}

impl ConfigRequest {
    fn into_input(self) -> ApiResult<CreateSystemConfig> {
        self.validate()?;

        Ok(CreateSystemConfig {
            key: self.key.ok_or_else(|| missing_field("key"))?,
            value: self.value.ok_or_else(|| missing_field("value"))?,
            description: self.description,
        })
    }
}

/// Create a configuration row
pub async fn create_config(
    State(state): State<AppState>,
    Json(req): Json<ConfigRequest>,
) -> ApiResult<(StatusCode, Json<SystemConfig>)> {
    let input = req.into_input()?;

    if SystemConfig::find_by_key(&state.db, &input.key)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Configuração já existe".to_string()));
    }

    let config = SystemConfig::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(config)))
}

/// List all configuration rows
pub async fn list_configs(State(state): State<AppState>) -> ApiResult<Json<Vec<SystemConfig>>> {
    Ok(Json(SystemConfig::list(&state.db).await?))
}

/// Fetch one configuration row by key
pub async fn get_config(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<SystemConfig>> {
    let config = SystemConfig::find_by_key(&state.db, &key)
        .await?
        .ok_or_else(|| ApiError::NotFound("Configuração não encontrada".to_string()))?;

    Ok(Json(config))
}

/// Replace the configuration row addressed by key
pub async fn update_config(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ConfigRequest>,
) -> ApiResult<Json<SystemConfig>> {
    let config = SystemConfig::update_by_key(&state.db, &key, req.into_input()?)
        .await?
        .ok_or_else(|| ApiError::NotFound("Configuração não encontrada".to_string()))?;

    Ok(Json(config))
}

/// Delete the configuration row addressed by key
pub async fn delete_config(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = SystemConfig::delete_by_key(&state.db, &key).await?;
    if !deleted {
        return Err(ApiError::NotFound("Configuração não encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
