/// Bearer-token verifier middleware for Axum
///
/// One verifier, one contract: every protected route sits behind this
/// middleware. It reads the `Authorization: Bearer <token>` header, checks
/// the signature and expiry against the shared secret, and injects an
/// [`AuthContext`] into the request extensions for downstream handlers.
///
/// Every authentication failure — missing header, malformed header, bad
/// signature, expired token — maps to HTTP 401; only the message differs.
/// No database lookup happens here, so a token minted for a since-deleted
/// user still passes (role-gated endpoints catch that case at their own
/// lookup).
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use obscura_shared::auth::middleware::{require_auth, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     format!("user {}", auth.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(require_auth("shared-secret".to_string())));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::token::{verify_token, TokenError};

/// Identity derived from a verified token, available to handlers via
/// Axum's `Extension` extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id (token subject)
    pub user_id: Uuid,
}

/// Authentication failure
#[derive(Debug)]
pub enum AuthError {
    /// Authorization header absent
    MissingToken,

    /// Header present but not `Bearer <token>`
    MalformedHeader,

    /// Signature, issuer, or format check failed
    InvalidToken(String),

    /// Token past its expiry
    ExpiredToken,
}

impl AuthError {
    fn message(&self) -> String {
        match self {
            AuthError::MissingToken => "Token não fornecido".to_string(),
            AuthError::MalformedHeader => "Cabeçalho de autorização inválido".to_string(),
            AuthError::InvalidToken(_) => "Token inválido".to_string(),
            AuthError::ExpiredToken => "Token expirado".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "unauthorized",
            "message": self.message(),
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Verifies the Bearer token on a request and forwards it with an
/// [`AuthContext`] attached
///
/// # Errors
///
/// Returns 401 Unauthorized (before the downstream handler runs) if the
/// header is missing or malformed, or the token fails verification.
pub async fn verify_request(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?;

    let claims = verify_token(token, &secret).map_err(|e| match e {
        TokenError::Expired => AuthError::ExpiredToken,
        other => AuthError::InvalidToken(other.to_string()),
    })?;

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
    });

    Ok(next.run(req).await)
}

/// Creates the verifier middleware closure for a given secret
///
/// Helper that captures the shared secret so the result can be handed
/// straight to `axum::middleware::from_fn`.
pub fn require_auth(
    secret: String,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    move |req, next| {
        let secret = secret.clone();
        Box::pin(verify_request(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_is_always_401() {
        for err in [
            AuthError::MissingToken,
            AuthError::MalformedHeader,
            AuthError::InvalidToken("bad signature".to_string()),
            AuthError::ExpiredToken,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(AuthError::MissingToken.message(), "Token não fornecido");
        assert_eq!(AuthError::ExpiredToken.message(), "Token expirado");
        assert_eq!(
            AuthError::InvalidToken("whatever".to_string()).message(),
            "Token inválido"
        );
    }
}
