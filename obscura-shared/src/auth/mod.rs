/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: access token generation and validation
/// - [`middleware`]: the Bearer-token verifier for protected routes
/// - [`authorization`]: role checks for admin-only operations
///
/// # Example
///
/// ```no_run
/// use obscura_shared::auth::password::{hash_password, verify_password};
/// use obscura_shared::auth::token::{issue_token, verify_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = issue_token(Uuid::new_v4(), "secret-key-at-least-32-bytes-long!!")?;
/// let claims = verify_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod middleware;
pub mod password;
pub mod token;
