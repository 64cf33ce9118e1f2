//! # Session Store
//!
//! Owns the signed-in user for the lifetime of the app and tells everyone
//! when it changes.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   app start ──► Session::loading()                                      │
//! │                      │                                                  │
//! │                initialize()                                             │
//! │              ┌───────┴────────┐                                         │
//! │         no token          token stored                                  │
//! │              │                │ GET /me                                 │
//! │              ▼          ┌─────┴──────┐                                  │
//! │         anonymous       ok        any error ──► clear token ─► anonymous│
//! │                         │                                               │
//! │                         ▼                                               │
//! │                   authenticated ◄──── login()                           │
//! │                         │                                               │
//! │          logout() / 401 from any call                                   │
//! │                         ▼                                               │
//! │                     anonymous                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition is published on a `watch` channel; the role guard is
//! re-run against the latest snapshot by whoever subscribes.

use secrecy::SecretString;
use stockdesk_core::{Route, Session, User};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Session state shared by every command.
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Latest session snapshot.
    pub fn current(&self) -> Session {
        self.api.session()
    }

    /// Receiver that observes login, logout, rejection and initialize.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.api.subscribe()
    }

    /// Restores the session from a persisted token.
    ///
    /// Without a token no request is made. Any failure fetching the user
    /// clears the token; the error is not returned because an anonymous
    /// session is the correct outcome.
    pub async fn initialize(&self) -> Session {
        let token = match self.api.tokens().load() {
            Ok(token) => token,
            Err(e) => {
                warn!(?e, "Failed to read stored token");
                None
            }
        };

        if token.is_none() {
            debug!("No stored token, starting signed out");
            self.api.publish(Session::anonymous());
            return self.current();
        }

        match self.api.me().await {
            Ok(user) => {
                info!(user_id = user.id, roles = user.roles.len(), "Session restored");
                self.api.publish(Session::authenticated(user));
            }
            Err(e) => {
                warn!(?e, "Stored token rejected, starting signed out");
                if let Err(e) = self.api.tokens().clear() {
                    warn!(?e, "Failed to clear stored token");
                }
                self.api.publish(Session::anonymous());
            }
        }

        self.current()
    }

    /// Signs in and persists the token.
    ///
    /// Returns the user and the landing page for their roles.
    ///
    /// ## Errors
    /// - `InvalidCredentials` with a message fit for the login form
    /// - `TokenStore` if the token could not be persisted; the session stays
    ///   signed out
    ///
    /// Any failure leaves no token behind, including one from an earlier
    /// session.
    pub async fn login(&self, email: &str, password: &SecretString) -> ClientResult<(User, Route)> {
        let (token, user) = match self.api.login(email, password).await {
            Ok(accepted) => accepted,
            Err(e) => {
                if let Err(clear_err) = self.api.tokens().clear() {
                    warn!(?clear_err, "Failed to clear stored token");
                }
                self.api.clear_cache();
                self.api.publish(Session::anonymous());
                return Err(e);
            }
        };

        self.api.tokens().save(&token)?;
        self.api.clear_cache();

        let session = Session::authenticated(user.clone());
        let landing = session.landing_route();
        info!(user_id = user.id, landing = %landing, "Signed in");
        self.api.publish(session);

        Ok((user, landing))
    }

    /// Signs out. Server-side revocation is best effort; the local token and
    /// user are always cleared. Returns the page to show next.
    pub async fn logout(&self) -> Route {
        match self.api.logout().await {
            Ok(()) => debug!("Token revoked on server"),
            // 401 has already cleared everything
            Err(ClientError::Unauthorized) | Err(ClientError::NotSignedIn) => {}
            Err(e) => warn!(?e, "Failed to revoke token on server"),
        }

        if let Err(e) = self.api.tokens().clear() {
            warn!(?e, "Failed to clear stored token");
        }
        self.api.clear_cache();
        self.api.publish(Session::anonymous());

        info!("Signed out");
        Route::Login
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
