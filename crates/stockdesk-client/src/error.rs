//! # Client Error Types
//!
//! Error types for everything that talks to the dashboard backend.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │ Authentication  │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  InvalidCreds   │  │  Validation (422)       │ │
//! │  │  InvalidUrl     │  │  Unauthorized   │  │  Api { status }         │ │
//! │  │  ConfigLoad     │  │  NotSignedIn    │  │  Parse                  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Transport    │  │   Token Store   │                              │
//! │  │                 │  │                 │                              │
//! │  │  Http           │  │  TokenStore     │                              │
//! │  │  Timeout        │  │  (file I/O)     │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockdesk_core::FieldErrors;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Message shown when the server rejects a login without saying why.
pub const DEFAULT_LOGIN_ERROR: &str = "Invalid credentials.";

/// Client error type covering every backend failure.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    /// Login was rejected.
    ///
    /// ## When This Occurs
    /// - Wrong email or password
    /// - The account is disabled server side
    ///
    /// The message is the server's `message` field when present.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The server answered 401 to an authenticated request.
    ///
    /// ## When This Occurs
    /// - The persisted token expired or was revoked
    ///
    /// The token and session are already cleared when this is returned.
    #[error("Session expired, please sign in again")]
    Unauthorized,

    /// An authenticated call was attempted without a stored token.
    #[error("Not signed in")]
    NotSignedIn,

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// The server rejected the payload (422).
    #[error("{message}")]
    Validation { message: String, fields: FieldErrors },

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection, TLS or timeout failure.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    // =========================================================================
    // Token Store Errors
    // =========================================================================
    /// Reading or writing the persisted token failed.
    #[error("Token store error: {0}")]
    TokenStore(#[from] std::io::Error),
}

impl ClientError {
    /// Returns true if retrying the same call might succeed.
    ///
    /// Nothing retries automatically; this only drives the message shown.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true for failures that end or prevent a session.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidCredentials(_)
                | ClientError::Unauthorized
                | ClientError::NotSignedIn
        )
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
        )
    }

    /// Field-keyed messages from a 422, if this is one.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert!(ClientError::Unauthorized.is_auth_error());
        assert!(ClientError::InvalidCredentials("nope".into()).is_auth_error());
        assert!(!ClientError::Parse("x".into()).is_auth_error());

        assert!(ClientError::Api {
            status: 503,
            message: "down".into()
        }
        .is_retryable());
        assert!(!ClientError::Api {
            status: 404,
            message: "missing".into()
        }
        .is_retryable());

        assert!(ClientError::InvalidUrl("ftp://x".into()).is_config_error());
    }

    #[test]
    fn test_validation_exposes_fields() {
        let mut fields = FieldErrors::new();
        fields.add("phone", "The phone field is required.");
        let err = ClientError::Validation {
            message: "The given data was invalid.".into(),
            fields,
        };

        assert_eq!(err.to_string(), "The given data was invalid.");
        assert!(err.field_errors().and_then(|f| f.get("phone")).is_some());
    }
}
