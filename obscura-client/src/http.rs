/// HTTP gateway to the Obscura API
///
/// One `reqwest::Client` instance for the whole application. The gateway
/// owns the current token: once set, every outgoing request carries
/// `Authorization: Bearer <token>`. Failures map to [`ClientError`] in one
/// place — a 401 always becomes [`ClientError::Unauthorized`], whatever
/// endpoint produced it.
///
/// # Example
///
/// ```no_run
/// use obscura_client::http::ApiClient;
///
/// # async fn example() -> Result<(), obscura_client::error::ClientError> {
/// let api = ApiClient::new("http://localhost:3001")?;
///
/// let token = api.login("ana@studio.com", "abcdef").await?;
/// let me = api.me().await?;
/// println!("signed in as {}", me.name);
/// # Ok(())
/// # }
/// ```

use crate::error::{ClientError, ErrorBody};
use chrono::{DateTime, Utc};
use reqwest::{header, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The current user as read paths return it — never includes a password
/// field of any kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSnapshot {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for login and register
#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
    password: &'a str,
}

/// `{token}` answer from login and register
#[derive(Debug, Deserialize)]
struct TokenBody {
    token: String,
}

/// API gateway holding the base URL and the current token
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Creates a gateway for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Stores the token attached to every subsequent request
    pub fn set_token(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.into());
        }
    }

    /// Discards the stored token
    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }

    /// The currently stored token, if any
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let mut request = self.http.request(method, self.url(path));

        if let Some(token) = self.token() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.to_string());

        tracing::warn!(%status, path, "request failed: {}", message);

        if status == StatusCode::UNAUTHORIZED {
            Err(ClientError::Unauthorized { message })
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    /// POST a JSON body, returning the created resource
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// PUT a JSON body, returning the updated resource
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// PATCH a JSON body, returning the updated resource
    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let mut request = self.http.request(Method::DELETE, self.url(path));

        if let Some(token) = self.token() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.to_string());

        if status == StatusCode::UNAUTHORIZED {
            Err(ClientError::Unauthorized { message })
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Exchanges credentials for a token and stores it
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let body: TokenBody = self
            .post(
                "/auth/login",
                &CredentialsBody {
                    name: None,
                    email,
                    password,
                },
            )
            .await?;

        self.set_token(&body.token);
        Ok(body.token)
    }

    /// Registers an account, storing the returned token
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ClientError> {
        let body: TokenBody = self
            .post(
                "/auth/register",
                &CredentialsBody {
                    name: Some(name),
                    email,
                    password,
                },
            )
            .await?;

        self.set_token(&body.token);
        Ok(body.token)
    }

    /// Fetches the current user
    pub async fn me(&self) -> Result<UserSnapshot, ClientError> {
        self.get("/users/me").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let api = ApiClient::new("http://localhost:3001/").unwrap();
        assert_eq!(api.url("/clients"), "http://localhost:3001/clients");
    }

    #[test]
    fn test_token_roundtrip() {
        let api = ApiClient::new("http://localhost:3001").unwrap();
        assert!(api.token().is_none());

        api.set_token("abc");
        assert_eq!(api.token().as_deref(), Some("abc"));

        api.clear_token();
        assert!(api.token().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Nothing listens on this port
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();

        let result = api.me().await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }
}
