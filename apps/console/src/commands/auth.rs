//! # Auth Commands
//!
//! Sign in, sign out and session restore.
//!
//! ```text
//!  app start ──► initialize_session ──► Session { user?, loading: false }
//!  login form ─► login ──────────────► { user, redirect: landing page }
//!  sidebar ────► logout ─────────────► { redirect: "/login" }
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use stockdesk_core::validation::validate_credentials;
use stockdesk_core::{Session, User};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{SessionState, WizardState};

/// Successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    /// Landing page for the user's roles.
    pub redirect: String,
}

/// Where to go after logging out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub redirect: String,
}

/// Restores a persisted session. Call once at startup; until it returns
/// every guarded page is pending.
pub async fn initialize_session(session: &SessionState) -> Session {
    debug!("initialize_session command");
    session.store().initialize().await
}

/// Returns the current session snapshot.
pub fn current_session(session: &SessionState) -> Session {
    session.snapshot()
}

/// Signs in with email and password.
///
/// ## Errors
/// - `VALIDATION_ERROR` for a blank field or malformed email (no request
///   is sent)
/// - `UNAUTHENTICATED` with the server's message when rejected
pub async fn login(
    session: &SessionState,
    email: &str,
    password: SecretString,
) -> Result<LoginResponse, ApiError> {
    debug!(email, "login command");

    validate_credentials(email, password.expose_secret()).map_err(|fields| {
        let message = fields
            .first_message()
            .unwrap_or("Email and password are required")
            .to_string();
        ApiError::validation(message, fields)
    })?;

    let (user, landing) = session.store().login(email.trim(), &password).await?;

    Ok(LoginResponse {
        user,
        redirect: landing.path(),
    })
}

/// Signs out and abandons any sale in progress.
pub async fn logout(session: &SessionState, wizard: &WizardState) -> LogoutResponse {
    debug!("logout command");

    wizard.with_wizard_mut(|w| w.reset());
    wizard.take_receipt();
    let next = session.store().logout().await;
    info!("Session closed");

    LogoutResponse {
        redirect: next.path(),
    }
}
