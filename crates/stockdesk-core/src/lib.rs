//! # stockdesk-core: Pure Business Logic for StockDesk
//!
//! This crate is the **heart** of the StockDesk dashboard. It contains the
//! session model, the role guard and the transaction wizard as pure
//! functions and plain state machines with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StockDesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front end (web view / CLI)                      │   │
//! │  │   Login ──► Guarded pages ──► Wizard (1 → 2 → 3) ──► Receipt    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/console commands                        │   │
//! │  │    login, enter_route, submit_customer, add_to_cart, submit     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐  │   │
//! │  │  │ session │ │  guard  │ │  draft  │ │ wizard  │ │ receipt  │  │   │
//! │  │  │  roles  │ │ routes  │ │CartLine │ │  steps  │ │ VAT 10%  │  │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO HTTP • NO STORAGE • PURE FUNCTIONS                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              stockdesk-client (REST + session store)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Merchant, Product, Transaction, etc.)
//! - [`money`] - Exact decimal money with Rupiah display
//! - [`error`] - Domain error types
//! - [`validation`] - Form and cart validation rules
//! - [`session`] - Session snapshot and role normalisation
//! - [`routes`] - Route table, landing pages, sidebar menu
//! - [`guard`] - Role guard decisions
//! - [`draft`] - In-progress transaction (customer + cart lines)
//! - [`receipt`] - Derived receipt totals
//! - [`wizard`] - Three-step transaction wizard
//!
//! ## Example Usage
//!
//! ```rust
//! use stockdesk_core::money::Money;
//! use stockdesk_core::VAT_RATE;
//!
//! let subtotal = Money::from_rupiah(35_000);
//! let tax = subtotal.calculate_tax(VAT_RATE).unwrap();
//!
//! assert_eq!(tax, Money::from_rupiah(3_500));
//! assert_eq!((subtotal + tax).to_string(), "Rp 38.500");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod guard;
pub mod money;
pub mod receipt;
pub mod routes;
pub mod session;
pub mod types;
pub mod validation;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{CartLine, CustomerInfo, TransactionDraft};
pub use error::{CoreError, CoreResult, ValidationError, WizardError};
pub use guard::GuardDecision;
pub use money::Money;
pub use receipt::{Receipt, ReceiptTotals};
pub use routes::Route;
pub use session::{RoleName, RoleSet, Session};
pub use types::*;
pub use validation::FieldErrors;
pub use wizard::{
    CustomerForm, PendingSubmission, ReviewReadiness, Wizard, WizardSnapshot, WizardStep,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fixed value-added tax applied to every transaction (10%).
pub const VAT_RATE: TaxRate = TaxRate::from_bps(1000);

/// Maximum number of lines in a single transaction cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity on a single cart line.
///
/// Guards against typing 1000 instead of 10 in the product picker.
pub const MAX_LINE_QUANTITY: i64 = 999;
