//! # Domain Types
//!
//! Wire-level domain types shared by the client and the app.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Merchant     │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  roles (set)    │──►│  keeper         │──►│  price (Money)  │       │
//! │  │  merchant?      │   │  products[]     │   │  pivot.stock    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Warehouse     │   │  Transaction    │   │ CreateTx        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │ Request         │       │
//! │  │  products[]     │   │  grand_total    │   │  product_id+qty │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Spelling
//! The backend mixes English and Indonesian column names (`nama`, `no_hp`,
//! `foto`). Deserialisation accepts both through serde aliases; serialisation
//! always writes the English name.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::session::{deserialize_roles, RoleSet};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10% VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact decimal fraction (1000 bps = 0.1000).
    #[inline]
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }
}

// =============================================================================
// User
// =============================================================================

/// The authenticated dashboard user as returned by `/login` and `/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    #[serde(alias = "nama")]
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default, alias = "no_hp")]
    pub phone: Option<String>,

    #[serde(default, alias = "foto")]
    pub photo: Option<String>,

    /// Normalised role names; the backend sends strings or `{name}` records.
    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: RoleSet,

    /// The merchant this user keeps, if any (operators only).
    #[serde(default)]
    pub merchant: Option<MerchantRef>,
}

/// Summary of a merchant carried on the session user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantRef {
    pub id: i64,
    #[serde(default, alias = "nama")]
    pub name: String,
}

// =============================================================================
// Reference Data
// =============================================================================

/// Product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(default, alias = "foto")]
    pub photo: Option<String>,
}

/// Join-table data present when a product is listed through a merchant or
/// warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPivot {
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub warehouse_id: Option<i64>,
    #[serde(default)]
    pub merchant_id: Option<i64>,
}

/// A product from the catalogue or from a merchant/warehouse listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,

    #[serde(alias = "nama")]
    pub name: String,

    #[serde(default)]
    pub thumbnail: Option<String>,

    #[serde(default)]
    pub about: Option<String>,

    pub price: Money,

    #[serde(default)]
    pub category_id: Option<i64>,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_popular: bool,

    #[serde(default)]
    pub pivot: Option<ProductPivot>,
}

impl Product {
    /// Category name for display, empty when the category was not loaded.
    pub fn category_label(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    /// Stock held by the listing this product came from.
    pub fn listed_stock(&self) -> Option<i64> {
        self.pivot.as_ref().and_then(|p| p.stock)
    }

    /// Checks the requested quantity against the listing stock.
    ///
    /// Catalogue products (no pivot) carry no stock figure and always pass.
    pub fn can_supply(&self, quantity: i64) -> bool {
        match self.listed_stock() {
            Some(stock) => stock >= quantity,
            None => true,
        }
    }
}

/// A warehouse with the products it stocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: i64,
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(default, alias = "alamat")]
    pub address: Option<String>,
    #[serde(default, alias = "no_hp")]
    pub phone: Option<String>,
    #[serde(default, alias = "foto")]
    pub photo: Option<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Minimal person record (merchant keeper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keeper {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(alias = "nama")]
    pub name: String,
}

/// A merchant (shop) with its assigned products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub id: i64,
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(default, alias = "alamat")]
    pub address: Option<String>,
    #[serde(default, alias = "no_hp")]
    pub phone: Option<String>,
    #[serde(default, alias = "foto")]
    pub photo: Option<String>,
    #[serde(default)]
    pub keeper_id: Option<i64>,
    #[serde(default)]
    pub keeper: Option<Keeper>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Merchant {
    /// Summary suitable for the submission payload.
    pub fn to_ref(&self) -> MerchantRef {
        MerchantRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Finds a product in this merchant's listing.
    pub fn find_product(&self, product_id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// One product line of a recorded transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionProduct {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub sub_total: Option<Money>,
    #[serde(default)]
    pub product: Option<Product>,
}

/// A transaction as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(alias = "no_hp")]
    pub phone: String,
    #[serde(default)]
    pub merchant_id: Option<i64>,
    #[serde(default)]
    pub sub_total: Option<Money>,
    #[serde(default)]
    pub tax_total: Option<Money>,
    #[serde(default)]
    pub grand_total: Option<Money>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transaction_products: Vec<TransactionProduct>,
}

/// Product reference inside a create-transaction request.
///
/// Unit price is deliberately absent; the backend prices lines itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLineRequest {
    pub product_id: i64,
    pub quantity: u32,
}

/// Body of `POST /transaksi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub name: String,
    pub phone: String,
    pub merchant_id: i64,
    pub products: Vec<TransactionLineRequest>,
}

// =============================================================================
// Users
// =============================================================================

/// Body of `POST /pengguna/role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRoleRequest {
    #[serde(rename = "pengguna_id")]
    pub user_id: i64,
    pub role: String,
}

// Laravel serialises tinyint booleans as 0/1.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        None => false,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::RoleName;
    use serde_json::json;

    #[test]
    fn test_user_accepts_string_and_record_roles() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "name": "Sari",
            "email": "sari@toko.id",
            "roles": ["operator", {"name": "admin"}],
            "merchant": {"id": 3, "name": "Toko Sari"}
        }))
        .unwrap();

        assert!(user.roles.contains(&RoleName::new("operator")));
        assert!(user.roles.contains(&RoleName::new("admin")));
        assert_eq!(user.merchant.map(|m| m.id), Some(3));
    }

    #[test]
    fn test_user_without_roles() {
        let user: User = serde_json::from_value(json!({"id": 1, "name": "Budi"})).unwrap();
        assert!(user.roles.is_empty());
        assert!(user.merchant.is_none());
    }

    #[test]
    fn test_indonesian_aliases() {
        let merchant: Merchant = serde_json::from_value(json!({
            "id": 2,
            "nama": "Toko Maju",
            "no_hp": "0811",
            "foto": "/storage/maju.png",
            "keeper": {"name": "Sari"}
        }))
        .unwrap();

        assert_eq!(merchant.name, "Toko Maju");
        assert_eq!(merchant.phone.as_deref(), Some("0811"));
        assert_eq!(merchant.photo.as_deref(), Some("/storage/maju.png"));
        assert_eq!(merchant.to_ref().name, "Toko Maju");
    }

    #[test]
    fn test_product_stock_and_flags() {
        let product: Product = serde_json::from_value(json!({
            "id": 11,
            "name": "Kopi Susu",
            "price": "10000.00",
            "is_popular": 1,
            "category": {"id": 1, "name": "Minuman"},
            "pivot": {"stock": 4}
        }))
        .unwrap();

        assert_eq!(product.price, Money::from_rupiah(10_000));
        assert!(product.is_popular);
        assert_eq!(product.category_label(), "Minuman");
        assert!(product.can_supply(4));
        assert!(!product.can_supply(5));
    }

    #[test]
    fn test_catalogue_product_has_no_stock_limit() {
        let product: Product =
            serde_json::from_value(json!({"id": 1, "name": "Teh", "price": 5000})).unwrap();
        assert_eq!(product.listed_stock(), None);
        assert!(product.can_supply(999));
        assert_eq!(product.category_label(), "");
    }

    #[test]
    fn test_create_request_has_no_price() {
        let request = CreateTransactionRequest {
            name: "Budi".to_string(),
            phone: "08123".to_string(),
            merchant_id: 3,
            products: vec![TransactionLineRequest {
                product_id: 11,
                quantity: 1,
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "Budi",
                "phone": "08123",
                "merchant_id": 3,
                "products": [{"product_id": 11, "quantity": 1}]
            })
        );
    }

    #[test]
    fn test_assign_role_uses_backend_key() {
        let request = AssignRoleRequest {
            user_id: 7,
            role: "operator".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"pengguna_id": 7, "role": "operator"})
        );
    }

    #[test]
    fn test_tax_rate_fraction() {
        assert_eq!(TaxRate::from_bps(1000).as_fraction(), Decimal::new(1, 1));
        assert_eq!(TaxRate::from_bps(1000).bps(), 1000);
    }
}
