//! # Transaction Draft
//!
//! The in-progress sale: who is buying and which products are in the cart.
//!
//! ## Draft Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Mutations                                      │
//! │                                                                         │
//! │  Wizard Step              Operation               Draft Change          │
//! │  ───────────              ─────────               ────────────          │
//! │                                                                         │
//! │  1 Customer Detail ─────► set_customer() ───────► customer = {..}       │
//! │                                                                         │
//! │  2 Assign Products ─────► add_product() ────────► cart.push(line)       │
//! │                    ─────► set_quantity(i, n) ───► cart[i].quantity = n  │
//! │                    ─────► remove_line(i) ───────► cart.remove(i)        │
//! │                                                                         │
//! │  3 Review + Submit ─────► clear() (on success) ─► empty draft           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every line has quantity in 1..=999 and a non-negative unit price
//! - At most 100 lines
//! - Insertion order is display order; removal keeps the order of the rest
//! - The same product may appear on several lines, and their quantities
//!   together never exceed the listed stock
//! - Totals are recomputed on every edit; an edit whose totals overflow is
//!   refused and leaves the draft unchanged

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::receipt::ReceiptTotals;
use crate::types::{Product, TransactionLineRequest};
use crate::validation::{validate_quantity, validate_unit_price};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Customer
// =============================================================================

/// Validated customer fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
}

impl CustomerInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.phone.is_empty()
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product line in the cart.
///
/// Product data is copied when the line is added so the review step shows
/// what the operator picked even if the listing is refetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub thumbnail: Option<String>,
    #[ts(as = "String")]
    pub unit_price: Money,
    pub quantity: u32,
    pub category: String,
    /// Warehouse the line was picked from (display only).
    pub warehouse_id: Option<i64>,
    /// Stock of the merchant listing when the product was last added.
    #[serde(default)]
    pub stock: Option<i64>,
}

impl CartLine {
    /// Line total (unit price × quantity).
    pub fn line_total(&self) -> CoreResult<Money> {
        self.unit_price.multiply_quantity(self.quantity)
    }

    fn from_product(product: &Product, quantity: u32, warehouse_id: Option<i64>) -> Self {
        CartLine {
            product_id: product.id,
            name: product.name.clone(),
            thumbnail: product.thumbnail.clone(),
            unit_price: product.price,
            quantity,
            category: product.category_label().to_string(),
            warehouse_id: warehouse_id.or_else(|| product.pivot.as_ref().and_then(|p| p.warehouse_id)),
            stock: product.listed_stock(),
        }
    }
}

// =============================================================================
// Draft
// =============================================================================

/// Customer plus ordered cart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct TransactionDraft {
    customer: CustomerInfo,
    cart: Vec<CartLine>,
    #[serde(skip)]
    #[ts(skip)]
    totals: ReceiptTotals,
}

impl TransactionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Overwrites the customer fields.
    pub fn set_customer(&mut self, customer: CustomerInfo) {
        self.customer = customer;
    }

    /// Total quantity of `product_id` across all cart lines.
    pub fn quantity_of(&self, product_id: i64) -> i64 {
        self.cart
            .iter()
            .filter(|line| line.product_id == product_id)
            .map(|line| i64::from(line.quantity))
            .sum()
    }

    /// Runs `edit` on a copy of the cart and keeps it only if the new
    /// totals can be computed.
    fn apply<T>(
        &mut self,
        edit: impl FnOnce(&mut Vec<CartLine>) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut cart = self.cart.clone();
        let out = edit(&mut cart)?;
        self.totals = ReceiptTotals::from_lines(&cart)?;
        self.cart = cart;
        Ok(out)
    }

    /// Appends a line for `product`.
    ///
    /// ## Errors
    /// - `Validation` if the quantity is outside 1..=999 or the price is negative
    /// - `InsufficientStock` if the listing carries less stock than the
    ///   cart would then hold of this product
    /// - `CartTooLarge` if the cart already holds 100 lines
    /// - `AmountOverflow` if the new totals leave the decimal range
    pub fn add_product(
        &mut self,
        product: &Product,
        quantity: i64,
        warehouse_id: Option<i64>,
    ) -> CoreResult<&CartLine> {
        let quantity = validate_quantity(quantity)?;
        validate_unit_price(product.price)?;

        let listed = product.listed_stock();
        if let Some(available) = listed {
            let requested = self.quantity_of(product.id) + i64::from(quantity);
            if !product.can_supply(requested) {
                return Err(CoreError::InsufficientStock {
                    product: product.name.clone(),
                    available,
                    requested,
                });
            }
        }

        if self.cart.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let index = self.apply(|cart| {
            if listed.is_some() {
                for line in cart.iter_mut().filter(|l| l.product_id == product.id) {
                    line.stock = listed;
                }
            }
            cart.push(CartLine::from_product(product, quantity, warehouse_id));
            Ok(cart.len() - 1)
        })?;
        Ok(&self.cart[index])
    }

    /// Removes the line at `index`, keeping the order of the others.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<CartLine> {
        if index >= self.cart.len() {
            return Err(CoreError::LineNotFound {
                index,
                len: self.cart.len(),
            });
        }
        self.apply(|cart| Ok(cart.remove(index)))
    }

    /// Changes the quantity of an existing line.
    ///
    /// The stock recorded on the line bounds the new quantity together with
    /// every other line of the same product.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }
        let quantity = validate_quantity(quantity)?;
        let line = self.cart.get(index).ok_or(CoreError::LineNotFound {
            index,
            len: self.cart.len(),
        })?;

        if let Some(available) = line.stock {
            let requested = self.quantity_of(line.product_id) - i64::from(line.quantity)
                + i64::from(quantity);
            if requested > available {
                return Err(CoreError::InsufficientStock {
                    product: line.name.clone(),
                    available,
                    requested,
                });
            }
        }

        self.apply(|cart| {
            cart[index].quantity = quantity;
            Ok(())
        })
    }

    /// Empties both customer and cart.
    pub fn clear(&mut self) {
        self.customer = CustomerInfo::default();
        self.cart.clear();
        self.totals = ReceiptTotals::default();
    }

    /// Derived receipt totals for the current cart.
    pub fn totals(&self) -> ReceiptTotals {
        self.totals.clone()
    }

    /// Product references for the create-transaction request.
    pub fn line_requests(&self) -> Vec<TransactionLineRequest> {
        self.cart
            .iter()
            .map(|line| TransactionLineRequest {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::ProductPivot;

    fn product(id: i64, name: &str, price: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            thumbnail: None,
            about: None,
            price: Money::from_rupiah(price),
            category_id: None,
            category: None,
            is_popular: false,
            pivot: None,
        }
    }

    fn stocked(id: i64, price: i64, stock: i64) -> Product {
        Product {
            pivot: Some(ProductPivot {
                stock: Some(stock),
                warehouse_id: Some(4),
                merchant_id: Some(3),
            }),
            ..product(id, "Kopi Susu", price)
        }
    }

    #[test]
    fn test_new_draft_is_empty() {
        let draft = TransactionDraft::new();
        assert!(draft.is_empty());
        assert!(draft.customer().is_empty());
    }

    #[test]
    fn test_add_product_copies_listing() {
        let mut draft = TransactionDraft::new();
        let line = draft.add_product(&stocked(11, 10_000, 5), 2, None).unwrap();

        assert_eq!(line.product_id, 11);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.warehouse_id, Some(4));
        assert_eq!(line.stock, Some(5));
        assert_eq!(line.line_total().unwrap(), Money::from_rupiah(20_000));
    }

    #[test]
    fn test_same_product_appends_new_line() {
        let mut draft = TransactionDraft::new();
        let p = product(1, "Teh", 5_000);
        draft.add_product(&p, 1, None).unwrap();
        draft.add_product(&p, 2, Some(9)).unwrap();

        assert_eq!(draft.cart().len(), 2);
        assert_eq!(draft.cart()[1].warehouse_id, Some(9));
    }

    #[test]
    fn test_quantity_rules() {
        let mut draft = TransactionDraft::new();
        let p = product(1, "Teh", 5_000);

        assert!(matches!(
            draft.add_product(&p, 0, None),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(draft.add_product(&p, 1000, None).is_err());
        assert!(draft.is_empty());
    }

    #[test]
    fn test_stock_limit() {
        let mut draft = TransactionDraft::new();
        let err = draft.add_product(&stocked(11, 10_000, 3), 5, None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            }
        ));
        assert!(draft.is_empty());
    }

    #[test]
    fn test_stock_limit_counts_every_line_of_a_product() {
        let mut draft = TransactionDraft::new();
        let kopi = stocked(11, 10_000, 5);
        draft.add_product(&kopi, 3, None).unwrap();

        let err = draft.add_product(&kopi, 3, None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            }
        ));
        assert_eq!(draft.cart().len(), 1);

        draft.add_product(&kopi, 2, Some(9)).unwrap();
        assert_eq!(draft.quantity_of(11), 5);

        // another product is counted separately
        draft.add_product(&stocked(12, 1_000, 1), 1, None).unwrap();
        assert_eq!(draft.quantity_of(12), 1);
    }

    #[test]
    fn test_set_quantity_respects_stock() {
        let mut draft = TransactionDraft::new();
        let kopi = stocked(11, 10_000, 3);
        draft.add_product(&kopi, 3, None).unwrap();

        assert!(matches!(
            draft.set_quantity(0, 999),
            Err(CoreError::InsufficientStock {
                available: 3,
                requested: 999,
                ..
            })
        ));
        assert_eq!(draft.cart()[0].quantity, 3);

        assert!(matches!(
            draft.add_product(&kopi, 3, None),
            Err(CoreError::InsufficientStock { requested: 6, .. })
        ));
        assert_eq!(draft.quantity_of(11), 3);

        draft.set_quantity(0, 1).unwrap();
        draft.add_product(&kopi, 2, None).unwrap();
        assert!(matches!(
            draft.set_quantity(0, 2),
            Err(CoreError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            })
        ));
        assert_eq!(draft.totals().total_quantity, 3);
    }

    #[test]
    fn test_latest_listing_stock_applies_to_earlier_lines() {
        let mut draft = TransactionDraft::new();
        draft.add_product(&stocked(11, 10_000, 10), 2, None).unwrap();
        draft.add_product(&stocked(11, 10_000, 4), 1, None).unwrap();

        assert!(draft.cart().iter().all(|l| l.stock == Some(4)));
        assert!(draft.set_quantity(0, 4).is_err());
        draft.set_quantity(0, 3).unwrap();
    }

    #[test]
    fn test_unlisted_product_has_no_stock_bound() {
        let mut draft = TransactionDraft::new();
        draft.add_product(&product(1, "Teh", 5_000), 1, None).unwrap();
        assert_eq!(draft.cart()[0].stock, None);

        draft.set_quantity(0, 999).unwrap();
        draft.add_product(&product(1, "Teh", 5_000), 999, None).unwrap();
        assert_eq!(draft.quantity_of(1), 1998);
    }

    #[test]
    fn test_totals_follow_every_edit() {
        let mut draft = TransactionDraft::new();
        draft.add_product(&product(1, "a", 10_000), 2, None).unwrap();
        draft.add_product(&product(2, "b", 5_000), 1, None).unwrap();
        assert_eq!(draft.totals().sub_total, Money::from_rupiah(25_000));

        draft.set_quantity(1, 3).unwrap();
        assert_eq!(draft.totals().sub_total, Money::from_rupiah(35_000));
        assert_eq!(draft.totals().grand_total, Money::from_rupiah(38_500));

        draft.remove_line(0).unwrap();
        assert_eq!(draft.totals().sub_total, Money::from_rupiah(15_000));

        draft.clear();
        assert_eq!(draft.totals(), ReceiptTotals::default());
    }

    #[test]
    fn test_overflowing_totals_are_refused() {
        let mut draft = TransactionDraft::new();
        // 6e28 plus VAT still fits, twice that does not
        let huge = Product {
            price: Money::from_decimal(rust_decimal::Decimal::from_i128_with_scale(
                60_000_000_000_000_000_000_000_000_000,
                0,
            )),
            ..product(1, "Emas", 0)
        };
        draft.add_product(&huge, 1, None).unwrap();
        let before = draft.clone();

        assert!(matches!(
            draft.set_quantity(0, 2),
            Err(CoreError::AmountOverflow)
        ));
        assert!(matches!(
            draft.add_product(&huge, 1, None),
            Err(CoreError::AmountOverflow)
        ));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_cart_line_limit() {
        let mut draft = TransactionDraft::new();
        let p = product(1, "Teh", 5_000);
        for _ in 0..MAX_CART_LINES {
            draft.add_product(&p, 1, None).unwrap();
        }
        assert!(matches!(
            draft.add_product(&p, 1, None),
            Err(CoreError::CartTooLarge { max: 100 })
        ));
    }

    #[test]
    fn test_remove_is_stable() {
        let mut draft = TransactionDraft::new();
        draft.add_product(&product(1, "a", 1_000), 1, None).unwrap();
        draft.add_product(&product(2, "b", 1_000), 1, None).unwrap();
        draft.add_product(&product(3, "c", 1_000), 1, None).unwrap();

        let removed = draft.remove_line(1).unwrap();
        assert_eq!(removed.name, "b");

        let names: Vec<_> = draft.cart().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);

        assert!(matches!(
            draft.remove_line(5),
            Err(CoreError::LineNotFound { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_set_quantity() {
        let mut draft = TransactionDraft::new();
        draft.add_product(&product(1, "a", 1_000), 1, None).unwrap();

        draft.set_quantity(0, 4).unwrap();
        assert_eq!(draft.cart()[0].quantity, 4);

        assert!(matches!(
            draft.set_quantity(0, 5000),
            Err(CoreError::QuantityTooLarge { requested: 5000, .. })
        ));
        assert!(draft.set_quantity(3, 1).is_err());
    }

    #[test]
    fn test_clear_and_requests() {
        let mut draft = TransactionDraft::new();
        draft.set_customer(CustomerInfo {
            name: "Budi".to_string(),
            phone: "08123".to_string(),
        });
        draft.add_product(&product(7, "a", 1_000), 3, None).unwrap();

        assert_eq!(
            draft.line_requests(),
            vec![TransactionLineRequest {
                product_id: 7,
                quantity: 3
            }]
        );

        draft.clear();
        assert!(draft.is_empty());
        assert!(draft.customer().is_empty());
    }
}
