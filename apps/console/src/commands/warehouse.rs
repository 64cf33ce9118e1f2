//! # Warehouse Commands
//!
//! Warehouse list and per-warehouse stock for the admin pages.

use stockdesk_client::ClientError;
use stockdesk_core::{Route, Warehouse};
use tracing::debug;

use crate::commands::navigation::require_route;
use crate::error::ApiError;
use crate::state::{ClientState, SessionState};

/// Every warehouse.
pub async fn list_warehouses(
    client: &ClientState,
    session: &SessionState,
) -> Result<Vec<Warehouse>, ApiError> {
    debug!("list_warehouses command");
    require_route(session, &Route::Warehouses)?;

    Ok(client.api().warehouses().await?)
}

/// One warehouse with the products it stocks (`pivot.stock` per product).
pub async fn get_warehouse_stock(
    client: &ClientState,
    session: &SessionState,
    warehouse_id: i64,
) -> Result<Warehouse, ApiError> {
    debug!(warehouse_id, "get_warehouse_stock command");
    require_route(session, &Route::WarehouseProducts { warehouse_id })?;

    match client.api().warehouse(warehouse_id).await {
        Err(ClientError::Api { status: 404, .. }) => {
            Err(ApiError::not_found("Warehouse", warehouse_id))
        }
        other => Ok(other?),
    }
}
