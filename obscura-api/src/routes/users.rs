/// User management, profile, and avatar endpoints
///
/// # Endpoints
///
/// - `GET    /users` - list users (ADMIN)
/// - `POST   /users` - create user with an explicit role (ADMIN)
/// - `PUT    /users/:id` - update name/email/role (ADMIN)
/// - `DELETE /users/:id` - delete user (ADMIN)
/// - `GET    /users/me` - the caller's own record
/// - `PUT    /users/profile` - self-service name/email/password change
/// - `PUT    /users/avatar` - multipart avatar upload (≤ 5 MB, image/*)
///
/// Every response uses [`UserView`] — the password hash never leaves the
/// store. The admin gate runs on every management mutation; profile and
/// avatar are self-service and cannot touch the role column.

use crate::{
    app::AppState,
    error::{missing_field, ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use obscura_shared::{
    auth::{authorization::require_admin, middleware::AuthContext, password},
    models::user::{CreateUser, UpdateUser, User, UserRole, UserView},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Upload ceiling for avatar files
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Admin create-user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, message = "Nome deve ter pelo menos 2 caracteres"))]
    pub name: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "Senha deve ter pelo menos 6 caracteres"))]
    pub password: Option<String>,

    pub role: Option<UserRole>,
}

/// Admin update-user request; password changes go through the profile
/// endpoint of the account itself
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, message = "Nome deve ter pelo menos 2 caracteres"))]
    pub name: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    pub role: Option<UserRole>,
}

/// Self-service profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, message = "Nome deve ter pelo menos 2 caracteres"))]
    pub name: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    /// Required when `new_password` is set
    pub current_password: Option<String>,

    #[validate(length(min = 6, message = "Senha deve ter pelo menos 6 caracteres"))]
    pub new_password: Option<String>,
}

/// List all users (ADMIN)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<UserView>>> {
    require_admin(&state.db, &auth).await?;

    let users = User::list(&state.db).await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// Create a user with an explicit role (ADMIN)
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    require_admin(&state.db, &auth).await?;
    req.validate()?;

    let name = req.name.ok_or_else(|| missing_field("name"))?;
    let email = req.email.ok_or_else(|| missing_field("email"))?;
    let password = req.password.ok_or_else(|| missing_field("password"))?;
    let role = req.role.ok_or_else(|| missing_field("role"))?;

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict("Email já cadastrado".to_string()));
    }

    let password_hash = password::hash_password(&password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name,
            email,
            password_hash,
            role,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// The caller's own record
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserView>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuário não encontrado".to_string()))?;

    Ok(Json(UserView::from(user)))
}

/// Update another user's name, email, or role (ADMIN)
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserView>> {
    require_admin(&state.db, &auth).await?;
    req.validate()?;

    if let Some(ref email) = req.email {
        if User::email_taken(&state.db, email, Some(id)).await? {
            return Err(ApiError::Conflict("Email já cadastrado".to_string()));
        }
    }

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            name: req.name,
            email: req.email,
            role: req.role,
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Usuário não encontrado".to_string()))?;

    Ok(Json(UserView::from(user)))
}

/// Delete a user (ADMIN)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_admin(&state.db, &auth).await?;

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Usuário não encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Self-service profile update
///
/// Changing the password requires the current one; changing the email
/// re-checks uniqueness. The role cannot be changed here.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserView>> {
    req.validate()?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuário não encontrado".to_string()))?;

    if let Some(ref email) = req.email {
        if email != &user.email && User::email_taken(&state.db, email, Some(user.id)).await? {
            return Err(ApiError::Conflict("Email já está em uso".to_string()));
        }
    }

    let password_hash = match req.new_password {
        Some(ref new_password) => {
            let current = req.current_password.as_deref().ok_or_else(|| {
                ApiError::BadRequest(
                    "Senha atual é necessária para alterar a senha".to_string(),
                )
            })?;

            if !password::verify_password(current, &user.password_hash)? {
                return Err(ApiError::BadRequest("Senha atual incorreta".to_string()));
            }

            Some(password::hash_password(new_password)?)
        }
        None => None,
    };

    let updated = User::update(
        &state.db,
        user.id,
        UpdateUser {
            name: req.name,
            email: req.email,
            password_hash,
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Usuário não encontrado".to_string()))?;

    Ok(Json(UserView::from(updated)))
}

/// Multipart avatar upload
///
/// Accepts a single `avatar` part, image MIME only, at most 5 MB. The
/// file lands under `<upload_dir>/avatars/` and is served back at
/// `/uploads/avatars/<name>`.
pub async fn update_avatar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> ApiResult<Json<UserView>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuário não encontrado".to_string()))?;

    let mut stored: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Upload inválido: {}", e)))?
    {
        if field.name() != Some("avatar") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::BadRequest(
                "Apenas imagens são permitidas".to_string(),
            ));
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit('.').next())
            .unwrap_or("png")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Upload inválido: {}", e)))?;

        if data.len() > MAX_AVATAR_BYTES {
            return Err(ApiError::BadRequest(
                "Arquivo excede o limite de 5MB".to_string(),
            ));
        }

        let filename = format!("avatar-{}.{}", Uuid::new_v4(), extension);
        let dir = std::path::Path::new(&state.config.uploads.dir).join("avatars");

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::InternalError(format!("Upload storage failed: {}", e)))?;
        tokio::fs::write(dir.join(&filename), &data)
            .await
            .map_err(|e| ApiError::InternalError(format!("Upload storage failed: {}", e)))?;

        stored = Some(format!("/uploads/avatars/{}", filename));
        break;
    }

    let avatar_url = stored.ok_or_else(|| ApiError::BadRequest("Nenhum arquivo enviado".to_string()))?;

    let updated = User::update(
        &state.db,
        user.id,
        UpdateUser {
            avatar_url: Some(avatar_url),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Usuário não encontrado".to_string()))?;

    Ok(Json(UserView::from(updated)))
}
