/// Client endpoints
///
/// Standard CRUD at `/clients`. Updates are full replacements: PUT takes
/// the same body as POST.

use crate::{
    app::AppState,
    error::{missing_field, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use obscura_shared::models::client::{Client, CreateClient};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create/replace client request
#[derive(Debug, Deserialize, Validate)]
pub struct ClientRequest {
    #[validate(length(min = 2, message = "Nome deve ter pelo menos 2 caracteres"))]
    pub name: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ClientRequest {
    fn into_input(self) -> ApiResult<CreateClient> {
        self.validate()?;

        Ok(CreateClient {
            name: self.name.ok_or_else(|| missing_field("name"))?,
            email: self.email,
            phone: self.phone,
            address: self.address,
        })
    }
}

/// Create a client
pub async fn create_client(
    State(state): State<AppState>,
    Json(req): Json<ClientRequest>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = Client::create(&state.db, req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// List all clients
pub async fn list_clients(State(state): State<AppState>) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(Client::list(&state.db).await?))
}

/// Fetch one client
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Client>> {
    let client = Client::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cliente não encontrado".to_string()))?;

    Ok(Json(client))
}

/// Replace a client's fields
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ClientRequest>,
) -> ApiResult<Json<Client>> {
    let client = Client::update(&state.db, id, req.into_input()?)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cliente não encontrado".to_string()))?;

    Ok(Json(client))
}

/// Delete a client
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Client::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Cliente não encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
