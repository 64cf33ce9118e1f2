//! Cache types for read-mostly backend lists.

use stockdesk_core::{Category, Product, Transaction, Warehouse};

/// Cache key for list endpoints.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Categories,
    Warehouses,
    MerchantTransactions,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Categories(Vec<Category>),
    Warehouses(Vec<Warehouse>),
    Transactions(Vec<Transaction>),
}
