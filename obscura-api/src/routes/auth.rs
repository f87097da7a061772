/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - register a new account, returns a token
/// - `POST /auth/login` - exchange credentials for a token
///
/// Both credential failures at login (unknown email, wrong password)
/// answer the same generic 401 so callers cannot enumerate accounts; the
/// distinguishing reason goes to the server log only.

use crate::{
    app::AppState,
    error::{missing_field, ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use obscura_shared::{
    auth::{password, token},
    models::user::{CreateUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 2, message = "Nome deve ter pelo menos 2 caracteres"))]
    pub name: Option<String>,

    /// Email address
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 6, message = "Senha deve ter pelo menos 6 caracteres"))]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    pub password: Option<String>,
}

/// Token response for both register and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Signed access token, valid 24 hours
    pub token: String,
}

/// Register a new account
///
/// Always creates a `USER`-role account; the other roles are assigned only
/// through the admin user-management endpoints.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// { "name": "Ana", "email": "ana@studio.com", "password": "abcdef" }
/// ```
///
/// # Errors
///
/// - `400`: validation failed
/// - `409`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    req.validate()?;

    let name = req.name.ok_or_else(|| missing_field("name"))?;
    let email = req.email.ok_or_else(|| missing_field("email"))?;
    let password = req.password.ok_or_else(|| missing_field("password"))?;

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
            role: UserRole::User,
        },
    )
    .await?;

    let token = token::issue_token(user.id, state.jwt_secret())?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Exchange credentials for a token
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "ana@studio.com", "password": "abcdef" }
/// ```
///
/// # Errors
///
/// - `400`: validation failed
/// - `401`: invalid credentials (same body for unknown email and wrong
///   password)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let email = req.email.ok_or_else(|| missing_field("email"))?;
    let password = req.password.ok_or_else(|| missing_field("password"))?;

    let user = User::find_by_email(&state.db, &email).await?.ok_or_else(|| {
        tracing::debug!(email = %email, "login failed: unknown email");
        ApiError::Unauthorized("Credenciais inválidas".to_string())
    })?;

    let valid = password::verify_password(&password, &user.password_hash)?;
    if !valid {
        tracing::debug!(email = %email, "login failed: wrong password");
        return Err(ApiError::Unauthorized("Credenciais inválidas".to_string()));
    }

    let token = token::issue_token(user.id, state.jwt_secret())?;

    Ok(Json(TokenResponse { token }))
}
