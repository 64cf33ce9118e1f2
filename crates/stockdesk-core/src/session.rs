//! # Session Model
//!
//! The in-memory view of who is signed in, plus role normalisation.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   app start ──► Session::loading() ──► token on disk? ──no──► anonymous │
//! │                                             │                           │
//! │                                            yes                          │
//! │                                             ▼                           │
//! │                                   GET /me ──ok──► authenticated(user)   │
//! │                                             │                           │
//! │                                           fail ──► anonymous            │
//! │                                                                         │
//! │   login ok ──► authenticated(user)                                      │
//! │   logout / any 401 ──► anonymous                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bearer token never lives here; it is owned by the client's token
//! store. A `Session` is a plain snapshot that guards and menus read.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::routes::Route;
use crate::types::{MerchantRef, User};

// =============================================================================
// Roles
// =============================================================================

/// A normalised role name (`"admin"`, `"operator"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub const ADMIN: &'static str = "admin";
    pub const OPERATOR: &'static str = "operator";

    pub fn new(name: impl AsRef<str>) -> Self {
        RoleName(name.as_ref().trim().to_string())
    }

    pub fn admin() -> Self {
        RoleName::new(Self::ADMIN)
    }

    pub fn operator() -> Self {
        RoleName::new(Self::OPERATOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of role names held by a user or required by a route.
pub type RoleSet = BTreeSet<RoleName>;

/// Builds a role set from plain names.
pub fn role_set<I, S>(names: I) -> RoleSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(RoleName::new).collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRepr {
    Name(String),
    Record { name: String },
}

/// Deserialises roles sent either as `"admin"` or as `{ "name": "admin" }`.
///
/// `null` and a missing array both yield an empty set; blank names are
/// dropped.
pub fn deserialize_roles<'de, D>(deserializer: D) -> Result<RoleSet, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RoleRepr>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|repr| match repr {
            RoleRepr::Name(name) | RoleRepr::Record { name } => RoleName::new(name),
        })
        .filter(|role| !role.as_str().is_empty())
        .collect())
}

// =============================================================================
// Session
// =============================================================================

/// Snapshot of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub user: Option<User>,
    /// True only while the startup `/me` check is in flight.
    pub loading: bool,
}

impl Session {
    /// Initial state before the persisted token has been checked.
    pub fn loading() -> Self {
        Session {
            user: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Session {
            user: None,
            loading: false,
        }
    }

    pub fn authenticated(user: User) -> Self {
        Session {
            user: Some(user),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Roles of the current user, `None` when signed out.
    pub fn roles(&self) -> Option<&RoleSet> {
        self.user.as_ref().map(|u| &u.roles)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles()
            .map(|roles| roles.iter().any(|r| r.as_str() == role))
            .unwrap_or(false)
    }

    /// Merchant the current user keeps, if the session carries one.
    pub fn merchant(&self) -> Option<&MerchantRef> {
        self.user.as_ref().and_then(|u| u.merchant.as_ref())
    }

    /// Page to open after a successful login.
    pub fn landing_route(&self) -> Route {
        match self.roles() {
            Some(roles) => crate::routes::landing_route(roles),
            None => Route::Login,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::loading()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
