//! # Session State
//!
//! Wraps the session store and evaluates the role guard against its latest
//! snapshot.

use stockdesk_client::SessionStore;
use stockdesk_core::guard::{self, GuardDecision};
use stockdesk_core::{MerchantRef, Session};
use tokio::sync::watch;

use crate::state::ClientState;

/// Managed session state.
#[derive(Clone)]
pub struct SessionState {
    store: SessionStore,
}

impl SessionState {
    pub fn new(client: &ClientState) -> Self {
        Self {
            store: SessionStore::new(client.api().clone()),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> Session {
        self.store.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.store.subscribe()
    }

    /// Runs the role guard for a location against the current session.
    pub fn check_path(&self, path: &str) -> GuardDecision {
        guard::check_path(path, &self.snapshot())
    }

    /// Merchant carried on the session user, if any.
    pub fn merchant(&self) -> Option<MerchantRef> {
        self.snapshot().merchant().cloned()
    }
}
