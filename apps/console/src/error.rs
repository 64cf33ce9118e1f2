//! # API Error Type
//!
//! Unified error type for StockDesk commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in StockDesk                              │
//! │                                                                         │
//! │  Front end                   Rust Commands                              │
//! │  ─────────                   ─────────────                              │
//! │                                                                         │
//! │  submit_transaction()                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Wizard Error? ──── WizardError::MissingMerchant ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Client Error? ──── ClientError::Validation ───── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "VALIDATION_ERROR",                                          │
//! │    "message": "The products field is required.",                        │
//! │    "fields": { "products": ["The products field is required."] } }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use stockdesk_client::ClientError;
use stockdesk_core::{CoreError, FieldErrors, WizardError};

/// Error returned from every command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "PRECONDITION",
///   "message": "No merchant is assigned to this account"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Field-keyed messages for form errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No session, or the session was rejected (401)
    Unauthenticated,

    /// Signed in without any of the required roles
    Forbidden,

    /// Input validation failed, client or server side (422)
    ValidationError,

    /// A precondition for the action is missing (no merchant)
    Precondition,

    /// Action not available in the current wizard state
    BusinessLogic,

    /// Resource not found (404)
    NotFound,

    /// Cart operation failed
    CartError,

    /// Insufficient stock
    InsufficientStock,

    /// The backend could not be reached or failed (5xx)
    Network,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error carrying field messages.
    pub fn validation(message: impl Into<String>, fields: FieldErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: message.into(),
            fields: Some(fields),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Creates an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthenticated, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts cart errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::CartTooLarge { .. }
            | CoreError::LineNotFound { .. }
            | CoreError::AmountOverflow => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::QuantityTooLarge { .. } => {
                let mut fields = FieldErrors::new();
                fields.add("quantity", err.to_string());
                ApiError::validation(err.to_string(), fields)
            }
            CoreError::Validation(e) => {
                let mut fields = FieldErrors::new();
                fields.push(&e);
                ApiError::validation(e.to_string(), fields)
            }
        }
    }
}

/// Converts wizard errors to API errors.
impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::InvalidCustomer(fields) => {
                let message = fields
                    .first_message()
                    .unwrap_or("Customer details are invalid")
                    .to_string();
                ApiError::validation(message, fields)
            }
            WizardError::MissingMerchant => ApiError::new(ErrorCode::Precondition, err.to_string()),
            WizardError::Cart(e) => e.into(),
            WizardError::WrongStep { .. }
            | WizardError::AtFirstStep
            | WizardError::SubmissionInFlight
            | WizardError::NoPendingSubmission
            | WizardError::StaleSubmission { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
        }
    }
}

/// Converts backend errors to API errors.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidCredentials(message) => ApiError::unauthenticated(message),
            ClientError::Unauthorized | ClientError::NotSignedIn => {
                ApiError::unauthenticated(err.to_string())
            }
            ClientError::Validation { message, fields } => ApiError::validation(message, fields),
            ClientError::Api { status: 404, message } => ApiError::new(ErrorCode::NotFound, message),
            ClientError::Api { status: 403, message } => ApiError::forbidden(message),
            ClientError::Api { status, .. } if status >= 500 => {
                tracing::error!("Backend failed: {}", err);
                ApiError::new(ErrorCode::Network, "The server could not complete the request")
            }
            ClientError::Api { message, .. } => ApiError::new(ErrorCode::BusinessLogic, message),
            ClientError::Http(e) => {
                tracing::error!("Request failed: {}", e);
                ApiError::new(ErrorCode::Network, "Could not reach the server, please try again")
            }
            ClientError::Parse(e) => {
                tracing::error!("Unexpected response: {}", e);
                ApiError::internal("Unexpected response from the server")
            }
            ClientError::TokenStore(e) => {
                tracing::error!("Token store failed: {}", e);
                ApiError::internal("Could not access the saved session")
            }
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_merchant_is_precondition() {
        let err = ApiError::from(WizardError::MissingMerchant);
        assert_eq!(err.code, ErrorCode::Precondition);
    }

    #[test]
    fn test_cart_and_submission_refusals() {
        assert_eq!(
            ApiError::from(CoreError::AmountOverflow).code,
            ErrorCode::CartError
        );
        assert_eq!(
            ApiError::from(WizardError::StaleSubmission { submission: 2 }).code,
            ErrorCode::BusinessLogic
        );
        assert_eq!(
            ApiError::from(WizardError::Cart(CoreError::InsufficientStock {
                product: "Kopi".into(),
                available: 3,
                requested: 999,
            }))
            .code,
            ErrorCode::InsufficientStock
        );
    }

    #[test]
    fn test_invalid_customer_keeps_fields() {
        let mut fields = FieldErrors::new();
        fields.add("name", "name is required");
        let err = ApiError::from(WizardError::InvalidCustomer(fields));

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "name is required");
        assert!(err.fields.as_ref().and_then(|f| f.get("name")).is_some());
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(
            ApiError::from(ClientError::Unauthorized).code,
            ErrorCode::Unauthenticated
        );
        assert_eq!(
            ApiError::from(ClientError::Api {
                status: 502,
                message: "Bad Gateway".into()
            })
            .code,
            ErrorCode::Network
        );
        assert_eq!(
            ApiError::from(ClientError::Api {
                status: 404,
                message: "No query results".into()
            })
            .code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_serialises_screaming_code() {
        let json = serde_json::to_value(ApiError::forbidden("nope")).unwrap();
        assert_eq!(json["code"], "FORBIDDEN");
        assert!(json.get("fields").is_none());
    }
}
