/// Access token generation and validation
///
/// Tokens are self-contained HS256 JWTs carrying the user id. They are never
/// persisted server-side: validity is purely a function of the signature and
/// the expiry timestamp, so a leaked token stays valid until it expires.
/// Every token lives for exactly 24 hours.
///
/// # Example
///
/// ```
/// use obscura_shared::auth::token::{issue_token, verify_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "secret-key-at-least-32-bytes-long!!";
///
/// let token = issue_token(user_id, secret)?;
/// let claims = verify_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed token lifetime in hours
pub const TOKEN_TTL_HOURS: i64 = 24;

const ISSUER: &str = "obscura";

/// The fixed token lifetime as a [`Duration`]
pub fn token_ttl() -> Duration {
    Duration::hours(TOKEN_TTL_HOURS)
}

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, format, or issuer check failed
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Claims embedded in an access token
///
/// Standard JWT claims only: the subject is the user id, the issuer is
/// always `"obscura"`. There are no custom claims — role lookups happen
/// against the store at authorization time, not from the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Issuer - always "obscura"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for a user with the fixed 24 h expiry
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, token_ttl())
    }

    /// Creates claims with a custom expiry (used by tests to mint
    /// already-expired tokens)
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a fresh 24 h token for a user
///
/// Convenience wrapper for the login/register flow.
pub fn issue_token(user_id: Uuid, secret: &str) -> Result<String, TokenError> {
    create_token(&Claims::new(user_id), secret)
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, the expiry, the not-before time, and the issuer.
///
/// # Errors
///
/// - `TokenError::Expired` when the token is past its expiry
/// - `TokenError::Invalid` for a bad signature, wrong issuer, or garbage input
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "obscura");
        assert_eq!(claims.exp - claims.iat, token_ttl().num_seconds());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_and_verify() {
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, SECRET).expect("should issue token");
        let claims = verify_token(&token, SECRET).expect("should verify token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "obscura");
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), SECRET).unwrap();

        let result = verify_token(&token, "a-completely-different-secret-value!!");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_expired_token() {
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        let result = verify_token(&token, SECRET);

        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_garbage_token() {
        assert!(matches!(
            verify_token("not.a.token", SECRET),
            Err(TokenError::Invalid(_))
        ));
        assert!(matches!(
            verify_token("", SECRET),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_verify_wrong_issuer() {
        // Mint a token whose issuer is not "obscura"
        let mut claims = Claims::new(Uuid::new_v4());
        claims.iss = "someone-else".to_string();

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(TokenError::Invalid(_))
        ));
    }
}
