//! # Commands
//!
//! Everything a front end can ask the application to do.
//!
//! ## Command Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  pub async fn add_to_cart(                                              │
//! │      client: &ClientState,     ◄── Only the state it needs             │
//! │      session: &SessionState,                                            │
//! │      wizard: &WizardState,                                              │
//! │      product_id: i64,          ◄── Plain arguments                      │
//! │      quantity: i64,                                                     │
//! │  ) -> Result<WizardSnapshot, ApiError>                                  │
//! │         │                                                               │
//! │         │ (serde serialization)                                         │
//! │         ▼                                                               │
//! │  Front end receives: WizardSnapshot or { code, message, fields }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands that open a page first run the role guard for that page against
//! the current session snapshot.

pub mod auth;
pub mod catalog;
pub mod merchant;
pub mod navigation;
pub mod transaction;
pub mod user;
pub mod warehouse;
pub mod wizard;
