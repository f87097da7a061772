/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `ApiResult<T>` and let `?` do the mapping.
///
/// # Taxonomy
///
/// - 400 `validation_error` — field-level messages, one entry per field
/// - 400 `bad_request` — malformed request outside schema validation
/// - 401 `unauthorized` — missing/invalid/expired token, bad credentials
/// - 403 `forbidden` — role insufficient
/// - 404 `not_found`
/// - 409 `conflict` — duplicate email or config key
/// - 500 `internal_error` — generic body, detail only in the server log
///
/// The response body is always `{error, message, details?}`. User-facing
/// messages are Portuguese, matching the rest of the product.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate email or key
    Conflict(String),

    /// Validation errors (400, field-level details)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// One failed field in a validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "unauthorized", "validation_error")
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Field-level details, present only for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

/// Builds the 400 returned when a required field is absent from the body
pub fn missing_field(field: &str) -> ApiError {
    ApiError::ValidationError(vec![ValidationErrorDetail {
        field: field.to_string(),
        message: "Campo obrigatório".to_string(),
    }])
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Dados inválidos".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log the detail, return a generic body
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Erro interno do servidor".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Recurso não encontrado".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email já cadastrado".to_string());
                    }
                    if constraint.contains("key") {
                        return ApiError::Conflict("Configuração já existe".to_string());
                    }
                    return ApiError::Conflict(format!("Violação de restrição: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert request-schema failures to the structured 400
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Valor inválido".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

/// Convert token errors to API errors
impl From<obscura_shared::auth::token::TokenError> for ApiError {
    fn from(err: obscura_shared::auth::token::TokenError) -> Self {
        use obscura_shared::auth::token::TokenError;

        match err {
            TokenError::Expired => ApiError::Unauthorized("Token expirado".to_string()),
            TokenError::Invalid(_) => ApiError::Unauthorized("Token inválido".to_string()),
            TokenError::CreateError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert password errors to API errors
///
/// Hash-mismatch is not an error (verify returns Ok(false)); anything that
/// reaches here is a broken stored hash or an operational failure.
impl From<obscura_shared::auth::password::PasswordError> for ApiError {
    fn from(err: obscura_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert authorization errors to API errors
impl From<obscura_shared::auth::authorization::AuthzError> for ApiError {
    fn from(err: obscura_shared::auth::authorization::AuthzError) -> Self {
        use obscura_shared::auth::authorization::AuthzError;

        match err {
            AuthzError::UnknownCaller => {
                ApiError::Unauthorized("Usuário não autenticado".to_string())
            }
            AuthzError::InsufficientRole { .. } => ApiError::Forbidden("Acesso negado".to_string()),
            AuthzError::DatabaseError(err) => {
                ApiError::InternalError(format!("Database error: {}", err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("Cliente não encontrado".to_string());
        assert_eq!(err.to_string(), "Not found: Cliente não encontrado");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ApiError::BadRequest("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthorized("x".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Forbidden("x".to_string()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".to_string()), StatusCode::CONFLICT),
            (
                ApiError::ValidationError(vec![]),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::InternalError("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_missing_field_detail() {
        let err = missing_field("name");

        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "name");
                assert_eq!(details[0].message, "Campo obrigatório");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_token_error_maps_to_401() {
        use obscura_shared::auth::token::TokenError;

        let err: ApiError = TokenError::Expired.into();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
