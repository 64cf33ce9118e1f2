//! # Catalog Commands
//!
//! Read-only access to the admin category and product pages.

use stockdesk_client::ClientError;
use stockdesk_core::{Category, Product, Route};
use tracing::debug;

use crate::commands::navigation::require_route;
use crate::error::ApiError;
use crate::state::{ClientState, SessionState};

/// Every category.
pub async fn list_categories(
    client: &ClientState,
    session: &SessionState,
) -> Result<Vec<Category>, ApiError> {
    debug!("list_categories command");
    require_route(session, &Route::Categories)?;

    Ok(client.api().categories().await?)
}

/// The whole product catalogue.
pub async fn list_products(
    client: &ClientState,
    session: &SessionState,
) -> Result<Vec<Product>, ApiError> {
    debug!("list_products command");
    require_route(session, &Route::Products)?;

    Ok(client.api().products().await?)
}

/// One product, as the edit page loads it.
pub async fn get_product(
    client: &ClientState,
    session: &SessionState,
    id: i64,
) -> Result<Product, ApiError> {
    debug!(id, "get_product command");
    require_route(session, &Route::ProductEdit { id })?;

    match client.api().product(id).await {
        Err(ClientError::Api { status: 404, .. }) => Err(ApiError::not_found("Product", id)),
        other => Ok(other?),
    }
}
