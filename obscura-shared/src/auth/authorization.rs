/// Role checks for admin-only operations
///
/// Access tokens carry only the user id, so the caller's role is loaded
/// from the store at authorization time. The check is applied by the
/// handlers that need it (user management), not by the verifier
/// middleware.
///
/// # Example
///
/// ```no_run
/// use obscura_shared::auth::authorization::require_admin;
/// use obscura_shared::auth::middleware::AuthContext;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, auth: AuthContext) -> Result<(), Box<dyn std::error::Error>> {
/// // 403 unless the caller's stored role is ADMIN
/// require_admin(&pool, &auth).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;

use super::middleware::AuthContext;
use crate::models::user::{User, UserRole};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The token verified but its user row no longer exists
    #[error("Caller no longer exists")]
    UnknownCaller,

    /// Caller's role doesn't permit the operation
    #[error("Insufficient role: requires {required:?}, has {actual:?}")]
    InsufficientRole {
        required: UserRole,
        actual: UserRole,
    },

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Loads the caller's stored role
///
/// # Errors
///
/// Returns `AuthzError::UnknownCaller` when the user row is gone — the
/// one place a stale-but-valid token gets caught.
pub async fn caller_role(pool: &PgPool, auth: &AuthContext) -> Result<UserRole, AuthzError> {
    User::find_role(pool, auth.user_id)
        .await?
        .ok_or(AuthzError::UnknownCaller)
}

/// Requires the caller to hold the ADMIN role
///
/// # Errors
///
/// - `AuthzError::InsufficientRole` when the caller is not an admin
/// - `AuthzError::UnknownCaller` when the caller's row no longer exists
pub async fn require_admin(pool: &PgPool, auth: &AuthContext) -> Result<(), AuthzError> {
    let actual = caller_role(pool, auth).await?;

    if !actual.can_manage_users() {
        return Err(AuthzError::InsufficientRole {
            required: UserRole::Admin,
            actual,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.can_manage_users());
        assert!(!UserRole::User.can_manage_users());
        assert!(!UserRole::Photographer.can_manage_users());
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::InsufficientRole {
            required: UserRole::Admin,
            actual: UserRole::User,
        };
        assert!(err.to_string().contains("Insufficient role"));

        assert!(AuthzError::UnknownCaller
            .to_string()
            .contains("no longer exists"));
    }
}
