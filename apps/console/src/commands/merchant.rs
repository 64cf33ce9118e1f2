//! # Merchant Commands
//!
//! Admin merchant pages plus the operator's own merchant page.

use stockdesk_client::ClientError;
use stockdesk_core::{Merchant, Route};
use tracing::debug;

use crate::commands::navigation::require_route;
use crate::error::{ApiError, ErrorCode};
use crate::state::{ClientState, SessionState};

/// Every merchant with its keeper.
pub async fn list_merchants(
    client: &ClientState,
    session: &SessionState,
) -> Result<Vec<Merchant>, ApiError> {
    debug!("list_merchants command");
    require_route(session, &Route::Merchants)?;

    Ok(client.api().merchants().await?)
}

/// One merchant with its assigned products and their stock.
pub async fn get_merchant_products(
    client: &ClientState,
    session: &SessionState,
    merchant_id: i64,
) -> Result<Merchant, ApiError> {
    debug!(merchant_id, "get_merchant_products command");
    require_route(session, &Route::MerchantProducts { merchant_id })?;

    match client.api().merchant(merchant_id).await {
        Err(ClientError::Api { status: 404, .. }) => {
            Err(ApiError::not_found("Merchant", merchant_id))
        }
        other => Ok(other?),
    }
}

/// The merchant kept by the signed-in operator.
///
/// ## Errors
/// - `PRECONDITION` when the backend has no merchant for this operator
pub async fn get_my_merchant(
    client: &ClientState,
    session: &SessionState,
) -> Result<Merchant, ApiError> {
    debug!("get_my_merchant command");
    require_route(session, &Route::MyMerchant)?;

    match client.api().my_merchant().await {
        Err(ClientError::Api { status: 404, .. }) => Err(ApiError::new(
            ErrorCode::Precondition,
            "No merchant is assigned to this operator",
        )),
        other => Ok(other?),
    }
}
