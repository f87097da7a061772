/// Client-side error type
///
/// Every API failure surfaces exactly once to the caller; nothing is
/// retried or de-duplicated. A 401 is its own variant so the session
/// context can react to it regardless of which call produced it.

use serde::Deserialize;

/// Error type for API client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered 401; the session should be discarded
    #[error("Não autenticado: {message}")]
    Unauthorized {
        /// Server-provided message
        message: String,
    },

    /// Any other non-2xx answer
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,

        /// Server-provided message
        message: String,
    },

    /// Connection, timeout, or decoding failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Whether this failure invalidates the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }
}

/// The `{error, message, details?}` body the API uses for failures
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[allow(dead_code)]
    pub error: Option<String>,

    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unauthorized() {
        let err = ClientError::Unauthorized {
            message: "Token expirado".to_string(),
        };
        assert!(err.is_unauthorized());

        let err = ClientError::Api {
            status: 500,
            message: "Erro interno do servidor".to_string(),
        };
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_error_body_parsing() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"unauthorized","message":"Credenciais inválidas"}"#)
                .unwrap();
        assert_eq!(body.message.as_deref(), Some("Credenciais inválidas"));
    }
}
