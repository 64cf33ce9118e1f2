//! # Navigation Commands
//!
//! Route access checks and the sidebar menu.

use serde::Serialize;
use stockdesk_core::guard::{self, GuardDecision};
use stockdesk_core::routes::{menu_for, MenuSection};
use stockdesk_core::{Route, RoleSet};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};

/// Result of asking whether a location may be opened.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    pub path: String,
    pub decision: GuardDecision,
    /// Where to go instead, if anywhere.
    pub redirect: Option<String>,
}

/// One visible sidebar entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub section: MenuSection,
    pub label: &'static str,
    pub path: String,
}

/// Sidebar contents for the signed-in user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub title: String,
    pub items: Vec<MenuItem>,
}

/// Evaluates the role guard for a location.
pub fn check_access(session: &SessionState, path: &str) -> AccessResponse {
    let decision = session.check_path(path);
    debug!(path, ?decision, "check_access command");

    AccessResponse {
        path: path.to_string(),
        redirect: decision.redirect_target().map(|r| r.path()),
        decision,
    }
}

/// Fails unless the current session may open `route`.
///
/// Used by every command that belongs to a guarded page.
pub fn require_route(session: &SessionState, route: &Route) -> Result<(), ApiError> {
    match guard::check_route(route, &session.snapshot()) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Pending => Err(ApiError::unauthenticated("Session check still in progress")),
        GuardDecision::RedirectLogin { .. } => Err(ApiError::unauthenticated("Please sign in first")),
        GuardDecision::RedirectUnauthorized => Err(ApiError::forbidden(format!(
            "Your role does not give access to {}",
            route
        ))),
    }
}

/// Returns the sidebar entries visible to the current user.
pub fn get_menu(session: &SessionState, config: &ConfigState) -> MenuResponse {
    let roles = session
        .snapshot()
        .roles()
        .cloned()
        .unwrap_or_else(RoleSet::new);

    MenuResponse {
        title: config.store_title.clone(),
        items: menu_for(&roles)
            .into_iter()
            .map(|entry| MenuItem {
                section: entry.section,
                label: entry.label,
                path: entry.route.path(),
            })
            .collect(),
    }
}
