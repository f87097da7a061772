/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'USER',
///     avatar_url VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Passwords exist only as Argon2id hashes. No read path returns the hash:
/// handlers serialize [`UserView`], and `User` itself skips the field even
/// if serialized directly.
///
/// # Example
///
/// ```no_run
/// use obscura_shared::models::user::{CreateUser, User, UserRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         name: "Ana".to_string(),
///         email: "ana@studio.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         role: UserRole::User,
///     },
/// )
/// .await?;
///
/// let found = User::find_by_email(&pool, "ana@studio.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Closed role set governing which mutations a user may perform
///
/// Registration always produces `User`; only an admin can assign the
/// other roles through the user-management endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Full access, including user management
    Admin,

    /// Regular back-office account
    User,

    /// Photographer account
    Photographer,
}

impl UserRole {
    /// Role as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::User => "USER",
            UserRole::Photographer => "PHOTOGRAPHER",
        }
    }

    /// Can create, edit, and delete other users
    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// A user account row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Optional avatar path under the upload prefix
    pub avatar_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user shape every read endpoint returns — no hash, ever
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,

    /// Argon2id hash, not the plaintext password
    pub password_hash: String,

    pub role: UserRole,
}

/// Input for updating a user; only `Some` fields are written
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub avatar_url: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation when the email is taken.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, role, avatar_url, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, role, avatar_url, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, role, avatar_url, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Loads only the role column, for authorization checks
    pub async fn find_role(pool: &PgPool, id: Uuid) -> Result<Option<UserRole>, sqlx::Error> {
        sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Checks whether an email is already taken, optionally ignoring one
    /// user (the one being updated)
    pub async fn email_taken(
        pool: &PgPool,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR id != $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(pool)
        .await?;

        Ok(taken)
    }

    /// Lists all users
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, role, avatar_url, created_at, updated_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Updates a user; only the `Some` fields in `data` are written and
    /// `updated_at` is refreshed
    ///
    /// Returns the updated user, or `None` if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the UPDATE dynamically from the fields that are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }
        if data.avatar_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar_url = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, email, name, password_hash, role, avatar_url, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(avatar_url) = data.avatar_url {
            q = q.bind(avatar_url);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a user, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "ADMIN");
        assert_eq!(UserRole::User.as_str(), "USER");
        assert_eq!(UserRole::Photographer.as_str(), "PHOTOGRAPHER");
    }

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&UserRole::User).unwrap(), "\"USER\"");
        assert_eq!(
            serde_json::from_str::<UserRole>("\"PHOTOGRAPHER\"").unwrap(),
            UserRole::Photographer
        );
    }

    #[test]
    fn test_user_serialization_omits_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ana@studio.com".to_string(),
            name: "Ana".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::User,
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_user_view_from_user() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ana@studio.com".to_string(),
            name: "Ana".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Admin,
            avatar_url: Some("/uploads/avatars/a.png".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let id = user.id;

        let view = UserView::from(user);
        assert_eq!(view.id, id);
        assert_eq!(view.role, UserRole::Admin);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("password"));
    }
}
