//! # Wizard Commands
//!
//! Steps one and two of the add-transaction page, plus navigation between
//! steps. Submission lives in `transaction.rs`.
//!
//! ## Wizard Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌────────────┐ submit_customer ┌────────────┐ proceed  ┌────────────┐ │
//! │  │ 1 Customer │────────────────►│ 2 Assign   │─────────►│ 3 Review   │ │
//! │  │   Detail   │◄────────────────│  Products  │◄─────────│  + Submit  │ │
//! │  └────────────┘     go_back     └────────────┘  go_back └─────┬──────┘ │
//! │                                   add_to_cart                 │        │
//! │                                   remove_from_cart            │        │
//! │                                   update_cart_line   submit_transaction │
//! │                                                               ▼        │
//! │  cancel_wizard (any step, not while submitting) ──► draft discarded     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use stockdesk_core::{CustomerForm, Product, ReviewReadiness, Route, WizardSnapshot};
use tracing::{debug, info};

use crate::commands::navigation::require_route;
use crate::error::ApiError;
use crate::state::{ClientState, SessionState, WizardState};

/// Review step entry: emptiness flag plus the full view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub readiness: ReviewReadiness,
    pub wizard: WizardSnapshot,
}

/// Returns the wizard as the page should render it.
pub fn get_wizard(session: &SessionState, wizard: &WizardState) -> Result<WizardSnapshot, ApiError> {
    require_route(session, &Route::TransactionAdd)?;
    Ok(wizard.with_wizard(|w| w.snapshot()))
}

/// Step one: validates the customer and moves to product assignment.
///
/// Field errors come back keyed by field name and the wizard stays put.
pub fn submit_customer(
    session: &SessionState,
    wizard: &WizardState,
    form: &CustomerForm,
) -> Result<WizardSnapshot, ApiError> {
    debug!("submit_customer command");
    require_route(session, &Route::TransactionAdd)?;

    wizard.with_wizard_mut(|w| -> Result<_, ApiError> {
        w.submit_customer(form)?;
        Ok(w.snapshot())
    })
}

/// Products the operator's merchant holds, with per-merchant stock.
pub async fn list_merchant_products(
    client: &ClientState,
    session: &SessionState,
) -> Result<Vec<Product>, ApiError> {
    debug!("list_merchant_products command");
    require_route(session, &Route::TransactionAdd)?;

    let merchant = client.api().my_merchant().await?;
    Ok(merchant.products)
}

/// Step two: appends a line for a product from the merchant's stock.
///
/// ## Errors
/// - `NOT_FOUND` if the merchant does not list the product
/// - `VALIDATION_ERROR` for a quantity outside 1..=999
/// - `INSUFFICIENT_STOCK` if the merchant holds less than requested
/// - `CART_ERROR` if the cart is full
pub async fn add_to_cart(
    client: &ClientState,
    session: &SessionState,
    wizard: &WizardState,
    product_id: i64,
    quantity: i64,
    warehouse_id: Option<i64>,
) -> Result<WizardSnapshot, ApiError> {
    debug!(product_id, quantity, ?warehouse_id, "add_to_cart command");
    require_route(session, &Route::TransactionAdd)?;

    // Fetched before locking; the lock is never held across .await
    let merchant = client.api().my_merchant().await?;
    let product = merchant
        .find_product(product_id)
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    wizard.with_wizard_mut(|w| -> Result<_, ApiError> {
        let line = w.add_product(product, quantity, warehouse_id)?;
        info!(product_id, quantity = line.quantity, "Line added to cart");
        Ok(w.snapshot())
    })
}

/// Step two: removes the line at `index`.
pub fn remove_from_cart(
    session: &SessionState,
    wizard: &WizardState,
    index: usize,
) -> Result<WizardSnapshot, ApiError> {
    debug!(index, "remove_from_cart command");
    require_route(session, &Route::TransactionAdd)?;

    wizard.with_wizard_mut(|w| -> Result<_, ApiError> {
        w.remove_line(index)?;
        Ok(w.snapshot())
    })
}

/// Step two: changes the quantity of the line at `index`.
pub fn update_cart_line(
    session: &SessionState,
    wizard: &WizardState,
    index: usize,
    quantity: i64,
) -> Result<WizardSnapshot, ApiError> {
    debug!(index, quantity, "update_cart_line command");
    require_route(session, &Route::TransactionAdd)?;

    wizard.with_wizard_mut(|w| -> Result<_, ApiError> {
        w.set_quantity(index, quantity)?;
        Ok(w.snapshot())
    })
}

/// Moves from step two to the review step.
pub fn proceed_to_review(
    session: &SessionState,
    wizard: &WizardState,
) -> Result<ReviewResponse, ApiError> {
    debug!("proceed_to_review command");
    require_route(session, &Route::TransactionAdd)?;

    wizard.with_wizard_mut(|w| -> Result<_, ApiError> {
        let readiness = w.proceed_to_review()?;
        Ok(ReviewResponse {
            readiness,
            wizard: w.snapshot(),
        })
    })
}

/// Goes back one step, keeping the draft.
pub fn go_back(session: &SessionState, wizard: &WizardState) -> Result<WizardSnapshot, ApiError> {
    debug!("go_back command");
    require_route(session, &Route::TransactionAdd)?;

    wizard.with_wizard_mut(|w| -> Result<_, ApiError> {
        w.back()?;
        Ok(w.snapshot())
    })
}

/// Leaves the wizard, discarding the draft. Returns the page to show.
///
/// ## Errors
/// - `BUSINESS_LOGIC` while a submission is in flight; the draft is kept
pub fn cancel_wizard(wizard: &WizardState) -> Result<String, ApiError> {
    debug!("cancel_wizard command");
    wizard.with_wizard_mut(|w| w.cancel())?;
    Ok(Route::Transactions.path())
}
