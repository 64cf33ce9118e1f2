//! # Transaction Commands
//!
//! Submitting the wizard's draft, the success view and the transaction
//! lists.
//!
//! ## Submission Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Guard /transactions/add + check_submittable (no network yet)        │
//! │           │                                                             │
//! │  2. Resolve merchant: session user.merchant, else GET /my-toko          │
//! │           │                                                             │
//! │  3. begin_submission ── none? ──► PRECONDITION, nothing sent            │
//! │           │                                                             │
//! │  4. POST /transaksi { name, phone, merchant_id, products }              │
//! │           │                                                             │
//! │     ┌─────┴──────┐                                                      │
//! │     ok          err ──► fail_submission: draft kept, stays on Review    │
//! │     │                                                                   │
//! │  5. invalidate cached transaction list                                  │
//! │  6. complete_submission: receipt from pre-clear totals, draft cleared,  │
//! │     receipt carried to the success view                                 │
//! │     (draft reset meanwhile? outcome is stale, nothing carried)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use stockdesk_client::ClientError;
use stockdesk_core::receipt::resolve_success_view;
use stockdesk_core::{MerchantRef, Receipt, Route, Transaction};
use tracing::{debug, info, warn};

use crate::commands::navigation::require_route;
use crate::error::ApiError;
use crate::state::{ClientState, SessionState, WizardState};

/// What the success page renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessViewResponse {
    pub receipt: Option<Receipt>,
    /// Set when there is no carried receipt.
    pub redirect: Option<String>,
}

/// Finds the merchant the signed-in operator keeps.
///
/// Returns `Ok(None)` when the backend says the operator has none.
pub async fn resolve_merchant(
    client: &ClientState,
    session: &SessionState,
) -> Result<Option<MerchantRef>, ApiError> {
    if let Some(merchant) = session.merchant() {
        return Ok(Some(merchant));
    }

    match client.api().my_merchant().await {
        Ok(merchant) => Ok(Some(merchant.to_ref())),
        Err(ClientError::Api { status: 404, .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Submits the draft as a new transaction.
///
/// ## Errors
/// - `BUSINESS_LOGIC` if a submission is already in flight or the wizard is
///   not on the review step
/// - `PRECONDITION` if the operator has no merchant
/// - `VALIDATION_ERROR` with field messages when the backend rejects the
///   payload; the draft is left untouched
pub async fn submit_transaction(
    client: &ClientState,
    session: &SessionState,
    wizard: &WizardState,
) -> Result<Receipt, ApiError> {
    debug!("submit_transaction command");
    require_route(session, &Route::TransactionAdd)?;

    wizard.with_wizard(|w| w.check_submittable())?;
    let merchant = resolve_merchant(client, session).await?;

    let pending = wizard.with_wizard_mut(|w| w.begin_submission(merchant.as_ref()))?;

    let result = client.api().create_transaction(pending.request()).await;

    match result {
        Ok(transaction_id) => {
            client.api().invalidate_transactions().await;

            match wizard.with_wizard_mut(|w| w.complete_submission(&pending, transaction_id)) {
                Ok(receipt) => {
                    wizard.carry_receipt(receipt.clone());
                    info!(
                        transaction_id,
                        grand_total = %receipt.grand_total,
                        "Sale recorded"
                    );
                    Ok(receipt)
                }
                Err(e) => {
                    // The sale exists on the server; the draft it came from
                    // was discarded while the request was in flight.
                    warn!(
                        transaction_id,
                        submission = pending.id(),
                        error = %e,
                        "Sale recorded after its draft was discarded"
                    );
                    Ok(pending.receipt(transaction_id))
                }
            }
        }
        Err(e) => {
            if !wizard.with_wizard_mut(|w| w.fail_submission(&pending)) {
                debug!(submission = pending.id(), "Failed submission was already discarded");
            }
            warn!(error = %e, "Transaction submission failed");
            Err(e.into())
        }
    }
}

/// Opens the success page. Without a carried receipt the caller is sent to
/// the transaction list.
pub fn open_success_view(
    session: &SessionState,
    wizard: &WizardState,
) -> Result<SuccessViewResponse, ApiError> {
    debug!("open_success_view command");
    require_route(session, &Route::TransactionSuccess)?;

    Ok(match resolve_success_view(wizard.take_receipt()) {
        Ok(receipt) => SuccessViewResponse {
            receipt: Some(receipt),
            redirect: None,
        },
        Err(route) => SuccessViewResponse {
            receipt: None,
            redirect: Some(route.path()),
        },
    })
}

/// Transactions of the operator's merchant.
pub async fn list_transactions(
    client: &ClientState,
    session: &SessionState,
) -> Result<Vec<Transaction>, ApiError> {
    debug!("list_transactions command");
    require_route(session, &Route::Transactions)?;

    Ok(client.api().merchant_transactions().await?)
}

/// Every merchant's transactions, for the admin dashboard.
pub async fn list_all_transactions(
    client: &ClientState,
    session: &SessionState,
) -> Result<Vec<Transaction>, ApiError> {
    debug!("list_all_transactions command");
    require_route(session, &Route::Dashboard)?;

    Ok(client.api().transactions().await?)
}

/// One transaction with its lines.
pub async fn get_transaction(
    client: &ClientState,
    session: &SessionState,
    id: i64,
) -> Result<Transaction, ApiError> {
    debug!(id, "get_transaction command");
    require_route(session, &Route::TransactionDetails { id })?;

    match client.api().transaction(id).await {
        Err(ClientError::Api { status: 404, .. }) => Err(ApiError::not_found("Transaction", id)),
        other => Ok(other?),
    }
}
