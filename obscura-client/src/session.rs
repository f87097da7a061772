/// Client-side session context
///
/// Tracks who is signed in as an explicit three-state machine:
///
/// ```text
/// start ──(no stored token)──────────────► Unauthenticated
/// start ──(token found)──► Loading ──ok──► Authenticated(user)
///                             └─────err──► Unauthenticated (token discarded)
/// Authenticated ──sign_out / any 401────► Unauthenticated (token discarded)
/// ```
///
/// The context is an explicit object passed where it is needed — there is
/// no ambient singleton. `requires_login()` answers the route-gate
/// question and must be consulted on every navigation, not only at
/// startup, because the state can flip asynchronously (a background call
/// hitting a 401).
///
/// Token persistence sits behind [`TokenStore`]; the in-memory
/// implementation suits tests and short-lived tools, applications with a
/// real keychain implement the trait themselves.

use crate::error::ClientError;
use crate::http::{ApiClient, UserSnapshot};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Persistence for the session token between runs
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the stored token, if any
    async fn load(&self) -> Option<String>;

    /// Persists a token
    async fn save(&self, token: &str);

    /// Forgets the stored token
    async fn clear(&self);
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|slot| slot.clone())
    }

    async fn save(&self, token: &str) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
    }

    async fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

/// The three session states
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No valid token cached
    Unauthenticated,

    /// A token exists and the user fetch is in flight
    Loading,

    /// The user is loaded
    Authenticated(UserSnapshot),
}

impl SessionState {
    /// Whether a user is currently loaded
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Holder of the current user and the token lifecycle
pub struct SessionContext {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: SessionState,
}

impl SessionContext {
    /// Creates a context in the `Unauthenticated` state
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            state: SessionState::Unauthenticated,
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The loaded user, when authenticated
    pub fn user(&self) -> Option<&UserSnapshot> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether a protected route must redirect to the login screen
    ///
    /// Re-evaluate on every navigation: the state can change between
    /// renders.
    pub fn requires_login(&self) -> bool {
        !self.state.is_authenticated()
    }

    /// The gateway this context drives, for making API calls
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Hydrates the session from the token store at application start
    ///
    /// No stored token leaves the context `Unauthenticated`. A stored
    /// token moves it through `Loading`; if the user fetch fails for any
    /// reason the token is discarded.
    pub async fn start(&mut self) {
        let Some(token) = self.store.load().await else {
            self.state = SessionState::Unauthenticated;
            return;
        };

        self.state = SessionState::Loading;
        self.api.set_token(&token);

        match self.api.me().await {
            Ok(user) => {
                self.state = SessionState::Authenticated(user);
            }
            Err(error) => {
                tracing::debug!("stored token rejected: {}", error);
                self.discard().await;
            }
        }
    }

    /// Signs in with credentials, loading the user on success
    ///
    /// # Errors
    ///
    /// Login and user-fetch failures propagate; a user-fetch failure also
    /// discards the freshly issued token.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        self.state = SessionState::Loading;

        let token = match self.api.login(email, password).await {
            Ok(token) => token,
            Err(error) => {
                self.state = SessionState::Unauthenticated;
                return Err(error);
            }
        };

        self.store.save(&token).await;

        match self.api.me().await {
            Ok(user) => {
                self.state = SessionState::Authenticated(user);
                Ok(())
            }
            Err(error) => {
                self.discard().await;
                Err(error)
            }
        }
    }

    /// Explicit sign-out: token discarded, back to `Unauthenticated`
    pub async fn sign_out(&mut self) {
        self.discard().await;
    }

    /// Reacts to a failed API call: a 401 from any request ends the
    /// session exactly like a sign-out
    pub async fn handle_error(&mut self, error: &ClientError) {
        if error.is_unauthorized() {
            self.discard().await;
        }
    }

    async fn discard(&mut self) {
        self.store.clear().await;
        self.api.clear_token();
        self.state = SessionState::Unauthenticated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn api_with_no_server() -> ApiClient {
        // Nothing listens on port 9; every request is a transport error
        ApiClient::new("http://127.0.0.1:9").unwrap()
    }

    fn snapshot() -> UserSnapshot {
        UserSnapshot {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@studio.com".to_string(),
            role: "USER".to_string(),
            avatar_url: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_start_without_token_stays_unauthenticated() {
        let mut session =
            SessionContext::new(api_with_no_server(), Arc::new(MemoryTokenStore::default()));

        session.start().await;

        assert_eq!(*session.state(), SessionState::Unauthenticated);
        assert!(session.requires_login());
    }

    #[tokio::test]
    async fn test_start_with_bad_token_discards_it() {
        let store = Arc::new(MemoryTokenStore::default());
        store.save("stale-token").await;

        let mut session = SessionContext::new(api_with_no_server(), store.clone());
        session.start().await;

        // Fetch failed, so the token is gone and we are unauthenticated
        assert_eq!(*session.state(), SessionState::Unauthenticated);
        assert!(store.load().await.is_none());
        assert!(session.api().token().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_in_stays_unauthenticated() {
        let mut session =
            SessionContext::new(api_with_no_server(), Arc::new(MemoryTokenStore::default()));

        let result = session.sign_in("ana@studio.com", "abcdef").await;

        assert!(result.is_err());
        assert!(session.requires_login());
    }

    #[tokio::test]
    async fn test_unauthorized_response_ends_session() {
        let store = Arc::new(MemoryTokenStore::default());
        store.save("some-token").await;

        let mut session = SessionContext::new(api_with_no_server(), store.clone());
        session.api().set_token("some-token");

        // Simulate an authenticated session
        let user = snapshot();
        session.state = SessionState::Authenticated(user);
        assert!(!session.requires_login());

        // Any 401 from any request has the same effect as sign-out
        let err = ClientError::Unauthorized {
            message: "Token expirado".to_string(),
        };
        session.handle_error(&err).await;

        assert!(session.requires_login());
        assert!(store.load().await.is_none());
        assert!(session.api().token().is_none());
    }

    #[tokio::test]
    async fn test_other_errors_keep_session() {
        let mut session =
            SessionContext::new(api_with_no_server(), Arc::new(MemoryTokenStore::default()));
        session.state = SessionState::Authenticated(snapshot());

        let err = ClientError::Api {
            status: 500,
            message: "Erro interno do servidor".to_string(),
        };
        session.handle_error(&err).await;

        assert!(!session.requires_login());
    }

    #[tokio::test]
    async fn test_sign_out_clears_everything() {
        let store = Arc::new(MemoryTokenStore::default());
        store.save("some-token").await;

        let mut session = SessionContext::new(api_with_no_server(), store.clone());
        session.state = SessionState::Authenticated(snapshot());

        session.sign_out().await;

        assert_eq!(*session.state(), SessionState::Unauthenticated);
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::default();

        assert!(store.load().await.is_none());
        store.save("abc").await;
        assert_eq!(store.load().await.as_deref(), Some("abc"));
        store.clear().await;
        assert!(store.load().await.is_none());
    }
}
