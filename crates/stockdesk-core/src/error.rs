//! # Error Types
//!
//! Domain-specific error types for stockdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockdesk-core errors (this file)                                      │
//! │  ├── CoreError        - Cart / draft rule violations                    │
//! │  ├── ValidationError  - Single-field input failures                     │
//! │  └── WizardError      - Step machine and submission refusals            │
//! │                                                                         │
//! │  stockdesk-client errors (separate crate)                               │
//! │  └── ClientError      - HTTP, auth and server-side 422 failures         │
//! │                                                                         │
//! │  App errors (apps/console)                                              │
//! │  └── ApiError         - What the front end sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → WizardError → ApiError → UI        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::validation::FieldErrors;
use crate::wizard::WizardStep;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while building a transaction draft.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The merchant listing does not hold enough of the product.
    ///
    /// ## When This Occurs
    /// - Picker quantity exceeds `pivot.stock` of the merchant listing
    ///
    /// ## User Workflow
    /// ```text
    /// Pick "Kopi Susu" (qty: 5)
    ///      │
    ///      ▼
    /// Listing stock: 3
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Kopi Susu", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Kopi Susu in stock"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Cart has reached the maximum number of lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// No cart line exists at the given position.
    #[error("No cart line at position {index} (cart has {len} lines)")]
    LineNotFound { index: usize, len: usize },

    /// A cart amount no longer fits the decimal range.
    ///
    /// ## When This Occurs
    /// - A huge unit price times the line quantity
    /// - Summing line totals or adding VAT to such a subtotal
    #[error("Amount is too large to calculate")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any request is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., phone number with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the form field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Wizard Error
// =============================================================================

/// Refusals from the transaction wizard.
///
/// None of these leave the wizard in a different state than before the call.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The action is not available on the current step.
    ///
    /// ## When This Occurs
    /// - Adding a cart line while still on Customer Detail
    /// - Submitting from Assign Products
    #[error("{action} is not available on step {step}")]
    WrongStep {
        action: &'static str,
        step: WizardStep,
    },

    /// `back()` was called on the first step.
    #[error("Already on the first step")]
    AtFirstStep,

    /// Customer form failed validation; keyed by field.
    #[error("Customer details are invalid: {0}")]
    InvalidCustomer(FieldErrors),

    /// The operator has no merchant to sell from.
    ///
    /// ## When This Occurs
    /// - The session user carries no merchant and `/my-toko` returned nothing
    #[error("No merchant is assigned to this operator")]
    MissingMerchant,

    /// A submission of this draft is already pending.
    #[error("A submission for this transaction is already in progress")]
    SubmissionInFlight,

    /// Completion or failure was reported without a pending submission.
    #[error("No submission is pending")]
    NoPendingSubmission,

    /// Completion was reported for a submission that is no longer the
    /// pending one.
    ///
    /// ## When This Occurs
    /// - The draft was reset while the request was in flight and a newer
    ///   submission has started since
    #[error("Submission {submission} is no longer pending")]
    StaleSubmission { submission: u64 },

    /// Cart rule violation.
    #[error(transparent)]
    Cart(#[from] CoreError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
