/// Photo session endpoints
///
/// # Endpoints
///
/// - CRUD at `/sessions` (PUT is a partial update, matching the original
///   contract for this resource)
/// - `PATCH /sessions/:id/status` - move through the status lifecycle
/// - `GET /sessions/:id/photos` / `POST /sessions/:id/photos` /
///   `DELETE /sessions/:id/photos/:photo_id` - photo sub-resource
///
/// Read endpoints return the session with its photos embedded.

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
use obscura_shared::models::{
    photo::{CreatePhoto, Photo},
    session::{
        CreateSession, Session, SessionStatus, SessionType, SessionWithPhotos, UpdateSession,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create session request
#[derive(Debug, Deserialize, Validate)]
pub struct SessionRequest {
    pub client_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,

    #[serde(rename = "type")]
    pub session_type: Option<SessionType>,

    pub status: Option<SessionStatus>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Partial update request; absent fields stay untouched
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSessionRequest {
    pub client_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,

    #[serde(rename = "type")]
    pub session_type: Option<SessionType>,

    pub status: Option<SessionStatus>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct SessionStatusRequest {
    pub status: SessionStatus,
}

/// Attach-photo request
#[derive(Debug, Deserialize, Validate)]
pub struct PhotoRequest {
    #[validate(url(message = "URL inválida"))]
    pub url: Option<String>,

    #[validate(length(min = 1, message = "Nome do arquivo é obrigatório"))]
    pub filename: Option<String>,

    pub description: Option<String>,
}

/// Create a session
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> ApiResult<(StatusCode, Json<SessionWithPhotos>)> {
    req.validate()?;

    let input = CreateSession {
        client_id: req.client_id.ok_or_else(|| missing_field("client_id"))?,
        date: req.date.ok_or_else(|| missing_field("date"))?,
        session_type: req.session_type.ok_or_else(|| missing_field("type"))?,
        status: req.status.unwrap_or(SessionStatus::Scheduled),
        location: req.location,
        notes: req.notes,
    };

    let session = Session::create(&state.db, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionWithPhotos {
            session,
            photos: vec![],
        }),
    ))
}

/// List all sessions with their photos, most recent shoot first
pub async fn list_sessions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SessionWithPhotos>>> {
    let sessions = Session::list(&state.db).await?;

    let mut result = Vec::with_capacity(sessions.len());
    for session in sessions {
        let photos = Photo::list_by_session(&state.db, session.id).await?;
        result.push(SessionWithPhotos { session, photos });
    }

    Ok(Json(result))
}

/// Fetch one session with its photos
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionWithPhotos>> {
    let session = Session::find_with_photos(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sessão não encontrada".to_string()))?;

    Ok(Json(session))
}

/// Partially update a session
pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSessionRequest>,
) -> ApiResult<Json<SessionWithPhotos>> {
    req.validate()?;

    let updated = Session::update(
        &state.db,
        id,
        UpdateSession {
            client_id: req.client_id,
            date: req.date,
            session_type: req.session_type,
            status: req.status,
            location: req.location,
            notes: req.notes,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Sessão não encontrada".to_string()))?;

    let photos = Photo::list_by_session(&state.db, updated.id).await?;
    Ok(Json(SessionWithPhotos {
        session: updated,
        photos,
    }))
}

/// Move a session to a new status
pub async fn update_session_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SessionStatusRequest>,
) -> ApiResult<Json<SessionWithPhotos>> {
    let updated = Session::update_status(&state.db, id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sessão não encontrada".to_string()))?;

    let photos = Photo::list_by_session(&state.db, updated.id).await?;
    Ok(Json(SessionWithPhotos {
        session: updated,
        photos,
    }))
}

/// Delete a session (its photos go with it)
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Session::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Sessão não encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// List a session's photos
pub async fn list_photos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Photo>>> {
    // 404 for a missing session rather than an empty list
    Session::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sessão não encontrada".to_string()))?;

    Ok(Json(Photo::list_by_session(&state.db, id).await?))
}

/// Attach a photo to a session
pub async fn add_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PhotoRequest>,
) -> ApiResult<(StatusCode, Json<Photo>)> {
    req.validate()?;

    Session::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sessão não encontrada".to_string()))?;

    let photo = Photo::create(
        &state.db,
        id,
        CreatePhoto {
            url: req.url.ok_or_else(|| missing_field("url"))?,
            filename: req.filename.ok_or_else(|| missing_field("filename"))?,
            description: req.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(photo)))
}

/// Remove a photo from a session
pub async fn remove_photo(
    State(state): State<AppState>,
    Path((id, photo_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let deleted = Photo::delete(&state.db, id, photo_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Foto não encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
