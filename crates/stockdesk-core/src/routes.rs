//! # Routes
//!
//! The dashboard's page table: which paths exist, who may open them, where a
//! user lands after login and which sidebar entries they see.
//!
//! ## Route Access
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────────────┐
//! │ Access                       │ Routes                                   │
//! ├──────────────────────────────┼──────────────────────────────────────────┤
//! │ Public                       │ /, /login, /unauthorized                 │
//! │ Any authenticated user       │ /profile                                 │
//! │ admin                        │ /dashboard, /categories/*, /products/*,  │
//! │                              │ /warehouses/*, /users/*, /roles,         │
//! │                              │ /merchants/*, /merchant-products/*,      │
//! │                              │ /warehouse-products/*                    │
//! │ operator                     │ /overview-merchant, /my-merchant,        │
//! │                              │ /transactions/*                          │
//! └──────────────────────────────┴──────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;

use crate::session::{role_set, RoleName, RoleSet};

const ADMIN_ONLY: &[&str] = &[RoleName::ADMIN];
const OPERATOR_ONLY: &[&str] = &[RoleName::OPERATOR];

// =============================================================================
// Route
// =============================================================================

/// Every page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    Login,
    Unauthorized,
    Profile,

    // Admin
    Dashboard,
    Categories,
    CategoryAdd,
    CategoryEdit { id: i64 },
    Products,
    ProductAdd,
    ProductEdit { id: i64 },
    Warehouses,
    WarehouseAdd,
    WarehouseEdit { id: i64 },
    Users,
    UserAdd,
    UserEdit { id: i64 },
    Roles,
    Merchants,
    MerchantAdd,
    MerchantEdit { id: i64 },
    MerchantProducts { merchant_id: i64 },
    MerchantProductAssign { merchant_id: i64 },
    MerchantProductEdit { merchant_id: i64, product_id: i64 },
    WarehouseProducts { warehouse_id: i64 },
    WarehouseProductAssign { warehouse_id: i64 },
    WarehouseProductEdit { warehouse_id: i64, product_id: i64 },

    // Operator
    OverviewMerchant,
    MyMerchant,
    Transactions,
    TransactionAdd,
    TransactionDetails { id: i64 },
    TransactionSuccess,
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No guard at all.
    Public,
    /// Guarded; any signed-in user passes (empty role set).
    Authenticated,
    /// Guarded; the user needs at least one of these roles.
    Roles(&'static [&'static str]),
}

impl Route {
    /// Parses a location path. Unknown paths yield `None` and are not guarded.
    ///
    /// ## Example
    /// ```rust
    /// use stockdesk_core::routes::Route;
    ///
    /// assert_eq!(Route::parse("/transactions/details/42"),
    ///            Some(Route::TransactionDetails { id: 42 }));
    /// assert_eq!(Route::parse("/nowhere"), None);
    /// ```
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let id = |s: &str| s.parse::<i64>().ok();

        let route = match segments[..] {
            [] | ["login"] => Route::Login,
            ["unauthorized"] => Route::Unauthorized,
            ["profile"] => Route::Profile,
            ["dashboard"] => Route::Dashboard,

            ["categories"] => Route::Categories,
            ["categories", "add"] => Route::CategoryAdd,
            ["categories", "edit", n] => Route::CategoryEdit { id: id(n)? },
            ["products"] => Route::Products,
            ["products", "add"] => Route::ProductAdd,
            ["products", "edit", n] => Route::ProductEdit { id: id(n)? },
            ["warehouses"] => Route::Warehouses,
            ["warehouses", "add"] => Route::WarehouseAdd,
            ["warehouses", "edit", n] => Route::WarehouseEdit { id: id(n)? },
            ["users"] => Route::Users,
            ["users", "add"] => Route::UserAdd,
            ["users", "edit", n] => Route::UserEdit { id: id(n)? },
            ["roles"] => Route::Roles,
            ["merchants"] => Route::Merchants,
            ["merchants", "add"] => Route::MerchantAdd,
            ["merchants", "edit", n] => Route::MerchantEdit { id: id(n)? },
            ["merchant-products", m] => Route::MerchantProducts {
                merchant_id: id(m)?,
            },
            ["merchant-products", m, "assign"] => Route::MerchantProductAssign {
                merchant_id: id(m)?,
            },
            ["merchant-products", m, "edit-assign", p] => Route::MerchantProductEdit {
                merchant_id: id(m)?,
                product_id: id(p)?,
            },
            ["warehouse-products", w] => Route::WarehouseProducts {
                warehouse_id: id(w)?,
            },
            ["warehouse-products", w, "assign"] => Route::WarehouseProductAssign {
                warehouse_id: id(w)?,
            },
            ["warehouse-products", w, "edit-assign", p] => Route::WarehouseProductEdit {
                warehouse_id: id(w)?,
                product_id: id(p)?,
            },

            ["overview-merchant"] => Route::OverviewMerchant,
            ["my-merchant"] => Route::MyMerchant,
            ["transactions"] => Route::Transactions,
            ["transactions", "add"] => Route::TransactionAdd,
            ["transactions", "details", n] => Route::TransactionDetails { id: id(n)? },
            ["transactions", "success"] => Route::TransactionSuccess,
            _ => return None,
        };
        Some(route)
    }

    /// Canonical location path.
    pub fn path(&self) -> String {
        match *self {
            Route::Login => "/login".to_string(),
            Route::Unauthorized => "/unauthorized".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Categories => "/categories".to_string(),
            Route::CategoryAdd => "/categories/add".to_string(),
            Route::CategoryEdit { id } => format!("/categories/edit/{id}"),
            Route::Products => "/products".to_string(),
            Route::ProductAdd => "/products/add".to_string(),
            Route::ProductEdit { id } => format!("/products/edit/{id}"),
            Route::Warehouses => "/warehouses".to_string(),
            Route::WarehouseAdd => "/warehouses/add".to_string(),
            Route::WarehouseEdit { id } => format!("/warehouses/edit/{id}"),
            Route::Users => "/users".to_string(),
            Route::UserAdd => "/users/add".to_string(),
            Route::UserEdit { id } => format!("/users/edit/{id}"),
            Route::Roles => "/roles".to_string(),
            Route::Merchants => "/merchants".to_string(),
            Route::MerchantAdd => "/merchants/add".to_string(),
            Route::MerchantEdit { id } => format!("/merchants/edit/{id}"),
            Route::MerchantProducts { merchant_id } => format!("/merchant-products/{merchant_id}"),
            Route::MerchantProductAssign { merchant_id } => {
                format!("/merchant-products/{merchant_id}/assign")
            }
            Route::MerchantProductEdit {
                merchant_id,
                product_id,
            } => format!("/merchant-products/{merchant_id}/edit-assign/{product_id}"),
            Route::WarehouseProducts { warehouse_id } => {
                format!("/warehouse-products/{warehouse_id}")
            }
            Route::WarehouseProductAssign { warehouse_id } => {
                format!("/warehouse-products/{warehouse_id}/assign")
            }
            Route::WarehouseProductEdit {
                warehouse_id,
                product_id,
            } => format!("/warehouse-products/{warehouse_id}/edit-assign/{product_id}"),
            Route::OverviewMerchant => "/overview-merchant".to_string(),
            Route::MyMerchant => "/my-merchant".to_string(),
            Route::Transactions => "/transactions".to_string(),
            Route::TransactionAdd => "/transactions/add".to_string(),
            Route::TransactionDetails { id } => format!("/transactions/details/{id}"),
            Route::TransactionSuccess => "/transactions/success".to_string(),
        }
    }

    /// Access rule for this route.
    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Unauthorized => Access::Public,
            Route::Profile => Access::Authenticated,
            Route::OverviewMerchant
            | Route::MyMerchant
            | Route::Transactions
            | Route::TransactionAdd
            | Route::TransactionDetails { .. }
            | Route::TransactionSuccess => Access::Roles(OPERATOR_ONLY),
            _ => Access::Roles(ADMIN_ONLY),
        }
    }

    /// Required role set for the guard; `None` for public routes.
    pub fn required_roles(&self) -> Option<RoleSet> {
        match self.access() {
            Access::Public => None,
            Access::Authenticated => Some(RoleSet::new()),
            Access::Roles(names) => Some(role_set(names.iter().copied())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Page to open after login: admin → dashboard, operator → merchant
/// overview, anyone else → profile.
pub fn landing_route(roles: &RoleSet) -> Route {
    if roles.contains(&RoleName::admin()) {
        Route::Dashboard
    } else if roles.contains(&RoleName::operator()) {
        Route::OverviewMerchant
    } else {
        Route::Profile
    }
}

// =============================================================================
// Sidebar Menu
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuSection {
    #[serde(rename = "Main Menu")]
    Main,
    #[serde(rename = "Account Settings")]
    Account,
}

impl MenuSection {
    pub fn title(&self) -> &'static str {
        match self {
            MenuSection::Main => "Main Menu",
            MenuSection::Account => "Account Settings",
        }
    }
}

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub section: MenuSection,
    pub label: &'static str,
    pub route: Route,
    #[serde(skip)]
    pub roles: &'static [&'static str],
}

impl MenuEntry {
    fn visible_to(&self, roles: &RoleSet) -> bool {
        self.roles.iter().any(|r| roles.contains(&RoleName::new(r)))
    }
}

static MENU: &[MenuEntry] = &[
    MenuEntry {
        section: MenuSection::Main,
        label: "Home",
        route: Route::Dashboard,
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        section: MenuSection::Main,
        label: "Home",
        route: Route::OverviewMerchant,
        roles: OPERATOR_ONLY,
    },
    MenuEntry {
        section: MenuSection::Main,
        label: "Products",
        route: Route::Products,
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        section: MenuSection::Main,
        label: "Transactions",
        route: Route::Transactions,
        roles: OPERATOR_ONLY,
    },
    MenuEntry {
        section: MenuSection::Main,
        label: "Categories",
        route: Route::Categories,
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        section: MenuSection::Main,
        label: "Warehouses",
        route: Route::Warehouses,
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        section: MenuSection::Main,
        label: "Merchants",
        route: Route::Merchants,
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        section: MenuSection::Main,
        label: "Merchant",
        route: Route::MyMerchant,
        roles: OPERATOR_ONLY,
    },
    MenuEntry {
        section: MenuSection::Account,
        label: "Role Management",
        route: Route::Roles,
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        section: MenuSection::Account,
        label: "User Management",
        route: Route::Users,
        roles: ADMIN_ONLY,
    },
];

/// Sidebar entries visible to the given roles, in declaration order.
pub fn menu_for(roles: &RoleSet) -> Vec<&'static MenuEntry> {
    MENU.iter().filter(|entry| entry.visible_to(roles)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_path_agree() {
        let paths = [
            "/login",
            "/profile",
            "/categories/edit/3",
            "/merchant-products/2/edit-assign/9",
            "/warehouse-products/5/assign",
            "/transactions/details/42",
            "/transactions/success",
        ];
        for path in paths {
            let route = Route::parse(path).unwrap();
            assert_eq!(route.path(), path);
        }
    }

    #[test]
    fn test_parse_edge_cases() {
        assert_eq!(Route::parse("/"), Some(Route::Login));
        assert_eq!(Route::parse("/transactions/"), Some(Route::Transactions));
        assert_eq!(Route::parse("/transactions?page=2"), Some(Route::Transactions));
        assert_eq!(Route::parse("/products/edit/abc"), None);
        assert_eq!(Route::parse("/reports"), None);
    }

    #[test]
    fn test_access_rules() {
        assert_eq!(Route::Login.required_roles(), None);
        assert_eq!(Route::Profile.required_roles(), Some(RoleSet::new()));
        assert_eq!(
            Route::Dashboard.required_roles(),
            Some(role_set(["admin"]))
        );
        assert_eq!(
            Route::TransactionAdd.required_roles(),
            Some(role_set(["operator"]))
        );
        assert_eq!(
            Route::WarehouseProductEdit {
                warehouse_id: 1,
                product_id: 2
            }
            .access(),
            Access::Roles(ADMIN_ONLY)
        );
    }

    #[test]
    fn test_landing_route() {
        assert_eq!(landing_route(&role_set(["admin", "operator"])), Route::Dashboard);
        assert_eq!(landing_route(&role_set(["operator"])), Route::OverviewMerchant);
        assert_eq!(landing_route(&role_set(["cashier"])), Route::Profile);
    }

    #[test]
    fn test_menu_for_operator() {
        let labels: Vec<_> = menu_for(&role_set(["operator"]))
            .into_iter()
            .map(|e| (e.label, e.route))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Home", Route::OverviewMerchant),
                ("Transactions", Route::Transactions),
                ("Merchant", Route::MyMerchant),
            ]
        );
    }

    #[test]
    fn test_menu_for_admin_and_nobody() {
        let admin = menu_for(&role_set(["admin"]));
        assert_eq!(admin.len(), 7);
        assert_eq!(admin[0].route, Route::Dashboard);
        assert_eq!(admin.last().map(|e| e.section), Some(MenuSection::Account));

        assert!(menu_for(&RoleSet::new()).is_empty());
    }
}
