//! # Obscura API Client
//!
//! Typed client for the Obscura REST API: a single HTTP gateway that
//! attaches the stored token to every request and centralizes error
//! mapping, plus the session context that tracks who is signed in.
//!
//! ## Modules
//!
//! - `http`: the [`http::ApiClient`] gateway
//! - `session`: the [`session::SessionContext`] state machine and
//!   [`session::TokenStore`] persistence trait
//! - `error`: [`error::ClientError`]
//!
//! ## Example
//!
//! ```no_run
//! use obscura_client::http::ApiClient;
//! use obscura_client::session::{MemoryTokenStore, SessionContext};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), obscura_client::error::ClientError> {
//! let api = ApiClient::new("http://localhost:3001")?;
//! let mut session = SessionContext::new(api, Arc::new(MemoryTokenStore::default()));
//!
//! // Hydrate from a previously stored token, if any
//! session.start().await;
//!
//! if session.requires_login() {
//!     session.sign_in("ana@studio.com", "abcdef").await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod session;
