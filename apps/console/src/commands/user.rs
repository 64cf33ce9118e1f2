//! # User Commands
//!
//! Admin user list, role assignment and removal.
//!
//! ```text
//!   list_users ──► GET /pengguna
//!   assign_role ─► validate role name ──► POST /pengguna/role
//!   delete_user ─► refuse own account ──► DELETE /users/{id}
//! ```

use stockdesk_client::ClientError;
use stockdesk_core::validation::validate_role_name;
use stockdesk_core::{AssignRoleRequest, CoreError, Route, User};
use tracing::{debug, info};

use crate::commands::navigation::require_route;
use crate::error::{ApiError, ErrorCode};
use crate::state::{ClientState, SessionState};

/// Every dashboard user with their roles.
pub async fn list_users(
    client: &ClientState,
    session: &SessionState,
) -> Result<Vec<User>, ApiError> {
    debug!("list_users command");
    require_route(session, &Route::Users)?;

    Ok(client.api().users().await?)
}

/// One user, as the edit page loads it.
pub async fn get_user(
    client: &ClientState,
    session: &SessionState,
    id: i64,
) -> Result<User, ApiError> {
    debug!(id, "get_user command");
    require_route(session, &Route::UserEdit { id })?;

    match client.api().user(id).await {
        Err(ClientError::Api { status: 404, .. }) => Err(ApiError::not_found("User", id)),
        other => Ok(other?),
    }
}

/// Gives `user_id` the named role.
///
/// ## Errors
/// - `VALIDATION_ERROR` for a blank or malformed role name; nothing is sent
pub async fn assign_role(
    client: &ClientState,
    session: &SessionState,
    user_id: i64,
    role: &str,
) -> Result<(), ApiError> {
    debug!(user_id, role, "assign_role command");
    require_route(session, &Route::Users)?;

    let role = validate_role_name(role).map_err(CoreError::from)?;
    client
        .api()
        .assign_role(&AssignRoleRequest { user_id, role })
        .await?;

    info!(user_id, "Role assigned");
    Ok(())
}

/// Deletes a user account. The signed-in user cannot delete themselves.
pub async fn delete_user(
    client: &ClientState,
    session: &SessionState,
    id: i64,
) -> Result<(), ApiError> {
    debug!(id, "delete_user command");
    require_route(session, &Route::Users)?;

    if session.snapshot().user.as_ref().map(|u| u.id) == Some(id) {
        return Err(ApiError::new(
            ErrorCode::BusinessLogic,
            "You cannot delete the account you are signed in with",
        ));
    }

    match client.api().delete_user(id).await {
        Err(ClientError::Api { status: 404, .. }) => Err(ApiError::not_found("User", id)),
        other => {
            other?;
            info!(id, "User deleted");
            Ok(())
        }
    }
}
