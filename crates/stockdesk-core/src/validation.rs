//! # Validation Module
//!
//! Input validation for the login form, the wizard's customer step and the
//! product picker.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                     │
//! │  └── Immediate feedback while typing                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Wizard (Rust)                                                 │
//! │  └── THIS MODULE: gates CustomerDetail → AssignProducts                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                       │
//! │  └── 422 { errors: { field: [messages] } } → FieldErrors                │
//! │                                                                         │
//! │  Both client and server failures end up keyed by field name            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockdesk_core::validation::{validate_phone, validate_quantity};
//!
//! assert_eq!(validate_phone(" 0812-3456 ").unwrap(), "0812-3456");
//! assert_eq!(validate_quantity(5).unwrap(), 5);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::draft::CustomerInfo;
use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 100;
const MIN_PHONE_DIGITS: usize = 5;
const MAX_PHONE_DIGITS: usize = 15;

// =============================================================================
// Field Errors
// =============================================================================

/// Validation messages keyed by form field.
///
/// Serialises as `{ "phone": ["phone is required"] }`, the same shape as the
/// backend's 422 `errors` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Records a single-field validation failure.
    pub fn push(&mut self, err: &ValidationError) {
        self.add(err.field(), err.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// First message overall, used as a summary line.
    pub fn first_message(&self) -> Option<&str> {
        self.0
            .values()
            .flat_map(|messages| messages.iter())
            .map(String::as_str)
            .next()
    }

    /// Converts to `Err` when any field failed.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<BTreeMap<String, Vec<String>>> for FieldErrors {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        FieldErrors(map)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Customer Validators
// =============================================================================

/// Validates and trims the customer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates and trims a phone number.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Optional leading `+`, then digits with optional spaces or hyphens
/// - Between 5 and 15 digits
///
/// ## Example
/// ```rust
/// use stockdesk_core::validation::validate_phone;
///
/// assert!(validate_phone("08123").is_ok());
/// assert!(validate_phone("+62 812-3456-7890").is_ok());
/// assert!(validate_phone("call me").is_err());
/// assert!(validate_phone("0812").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, hyphens and a leading +".to_string(),
        });
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: format!(
                "must have between {} and {} digits",
                MIN_PHONE_DIGITS, MAX_PHONE_DIGITS
            ),
        });
    }

    Ok(phone.to_string())
}

/// Validates the whole customer form, collecting every field failure.
pub fn validate_customer(name: &str, phone: &str) -> Result<CustomerInfo, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = validate_customer_name(name).map_err(|e| errors.push(&e)).ok();
    let phone = validate_phone(phone).map_err(|e| errors.push(&e)).ok();

    match (name, phone) {
        (Some(name), Some(phone)) => Ok(CustomerInfo { name, phone }),
        _ => Err(errors),
    }
}

// =============================================================================
// Login Validators
// =============================================================================

/// Checks the login form before any request is sent.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = email.trim();

    if email.is_empty() {
        errors.push(&ValidationError::Required {
            field: "email".to_string(),
        });
    } else if !email.contains('@') {
        errors.push(&ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be an email address".to_string(),
        });
    }

    if password.is_empty() {
        errors.push(&ValidationError::Required {
            field: "password".to_string(),
        });
    }

    errors.into_result()
}

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a picker quantity.
///
/// ## Rules
/// - Between 1 and 999 inclusive
pub fn validate_quantity(quantity: i64) -> ValidationResult<u32> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    u32::try_from(quantity).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: MAX_LINE_QUANTITY,
    })
}

/// Validates a role name for assignment.
///
/// ## Rules
/// - Trimmed, must not be empty
/// - Letters, digits, `-` and `_` only
pub fn validate_role_name(role: &str) -> ValidationResult<String> {
    let role = role.trim();

    if role.is_empty() {
        return Err(ValidationError::Required {
            field: "role".to_string(),
        });
    }

    if !role
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "role".to_string(),
            reason: "only letters, digits, - and _ are allowed".to_string(),
        });
    }

    Ok(role.to_string())
}

/// Validates a unit price (must not be negative).
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
