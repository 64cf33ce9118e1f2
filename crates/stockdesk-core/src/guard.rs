//! # Role Guard
//!
//! Decides whether the current session may enter a page.
//!
//! ## Decision Flow
//! ```text
//!   session.loading? ──yes──► Pending
//!          │ no
//!          ▼
//!   session.user?    ──no───► RedirectLogin { from }
//!          │ yes
//!          ▼
//!   required empty or roles ∩ required ≠ ∅ ──yes──► Allow
//!          │ no
//!          ▼
//!   RedirectUnauthorized
//! ```
//!
//! The guard is a pure function of its inputs. Callers re-run it against a
//! fresh session snapshot whenever a page is entered or the session changes.

use serde::Serialize;

use crate::routes::Route;
use crate::session::{RoleSet, Session};

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Render the page.
    Allow,
    /// Session check still running; render nothing yet.
    Pending,
    /// Not signed in. `from` is the attempted location for a post-login
    /// redirect.
    RedirectLogin { from: Option<String> },
    /// Signed in but missing every required role.
    RedirectUnauthorized,
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Page to navigate to instead, if any.
    pub fn redirect_target(&self) -> Option<Route> {
        match self {
            GuardDecision::RedirectLogin { .. } => Some(Route::Login),
            GuardDecision::RedirectUnauthorized => Some(Route::Unauthorized),
            GuardDecision::Allow | GuardDecision::Pending => None,
        }
    }
}

/// Evaluates a required-role set against a session.
///
/// An empty `required` set means any signed-in user passes.
///
/// ## Example
/// ```rust
/// use stockdesk_core::guard::{evaluate, GuardDecision};
/// use stockdesk_core::session::{role_set, Session};
///
/// let decision = evaluate(&role_set(["admin"]), &Session::anonymous(), Some("/dashboard"));
/// assert_eq!(decision, GuardDecision::RedirectLogin { from: Some("/dashboard".into()) });
/// ```
pub fn evaluate(required: &RoleSet, session: &Session, destination: Option<&str>) -> GuardDecision {
    if session.loading {
        return GuardDecision::Pending;
    }

    let Some(user) = session.user.as_ref() else {
        return GuardDecision::RedirectLogin {
            from: destination.map(str::to_string),
        };
    };

    if !required.is_empty() && user.roles.is_disjoint(required) {
        return GuardDecision::RedirectUnauthorized;
    }

    GuardDecision::Allow
}

/// Guards a parsed route. Public routes always pass.
pub fn check_route(route: &Route, session: &Session) -> GuardDecision {
    match route.required_roles() {
        Some(required) => evaluate(&required, session, Some(&route.path())),
        None => GuardDecision::Allow,
    }
}

/// Guards a raw location path. Unknown paths are not guarded.
pub fn check_path(path: &str, session: &Session) -> GuardDecision {
    match Route::parse(path) {
        Some(route) => check_route(&route, session),
        None => GuardDecision::Allow,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::role_set;
    use crate::types::User;

    fn session_with(roles: &[&str]) -> Session {
        Session::authenticated(User {
            id: 1,
            name: "Sari".to_string(),
            email: None,
            phone: None,
            photo: None,
            roles: role_set(roles.iter().copied()),
            merchant: None,
        })
    }

    #[test]
    fn test_pending_while_loading() {
        let decision = evaluate(&role_set(["admin"]), &Session::loading(), None);
        assert_eq!(decision, GuardDecision::Pending);
        assert_eq!(decision.redirect_target(), None);
    }

    #[test]
    fn test_no_session_redirects_to_login() {
        let decision = check_route(&Route::Dashboard, &Session::anonymous());
        assert_eq!(
            decision,
            GuardDecision::RedirectLogin {
                from: Some("/dashboard".to_string())
            }
        );
        assert_eq!(decision.redirect_target(), Some(Route::Login));
    }

    #[test]
    fn test_operator_on_admin_route_is_unauthorized() {
        let decision = evaluate(&role_set(["admin"]), &session_with(&["operator"]), None);
        assert_eq!(decision, GuardDecision::RedirectUnauthorized);
        assert_eq!(decision.redirect_target(), Some(Route::Unauthorized));
    }

    #[test]
    fn test_intersection_allows() {
        let session = session_with(&["operator", "admin"]);
        assert!(evaluate(&role_set(["admin"]), &session, None).is_allowed());
        assert!(check_route(&Route::TransactionAdd, &session).is_allowed());
    }

    #[test]
    fn test_empty_requirement_allows_any_user() {
        let session = session_with(&[]);
        assert!(evaluate(&RoleSet::new(), &session, None).is_allowed());
        assert!(check_route(&Route::Profile, &session).is_allowed());
        assert_eq!(
            check_route(&Route::Profile, &Session::anonymous()),
            GuardDecision::RedirectLogin {
                from: Some("/profile".to_string())
            }
        );
    }

    #[test]
    fn test_public_and_unknown_paths_pass() {
        let session = Session::anonymous();
        assert!(check_path("/login", &session).is_allowed());
        assert!(check_path("/reports/2024", &session).is_allowed());
        assert_eq!(
            check_path("/transactions/add", &session).redirect_target(),
            Some(Route::Login)
        );
    }

    #[test]
    fn test_reevaluates_on_session_change() {
        let required = role_set(["operator"]);
        assert_eq!(
            evaluate(&required, &Session::loading(), None),
            GuardDecision::Pending
        );
        assert!(evaluate(&required, &session_with(&["operator"]), None).is_allowed());
        assert!(matches!(
            evaluate(&required, &Session::anonymous(), None),
            GuardDecision::RedirectLogin { .. }
        ));
    }
}
