//! # Receipt
//!
//! Totals derived from a cart, and the success view shown after a sale.
//!
//! ```text
//! subtotal    = Σ unit_price × quantity
//! tax         = subtotal × 10%
//! grand_total = subtotal + tax
//! total_items = number of lines
//! total_qty   = Σ quantity
//! ```
//!
//! The draft recomputes its totals on every cart edit and refuses edits
//! whose totals overflow. The receipt handed to the success view is captured before the
//! draft is cleared.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::CartLine;
use crate::error::CoreResult;
use crate::money::Money;
use crate::routes::Route;
use crate::VAT_RATE;

/// Derived totals for a set of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTotals {
    pub total_items: usize,
    pub total_quantity: u32,
    #[ts(as = "String")]
    pub sub_total: Money,
    #[ts(as = "String")]
    pub tax_total: Money,
    #[ts(as = "String")]
    pub grand_total: Money,
}

impl ReceiptTotals {
    pub fn from_lines(lines: &[CartLine]) -> CoreResult<Self> {
        let mut sub_total = Money::zero();
        for line in lines {
            sub_total = sub_total.checked_add(line.line_total()?)?;
        }
        let tax_total = sub_total.calculate_tax(VAT_RATE)?;

        Ok(ReceiptTotals {
            total_items: lines.len(),
            total_quantity: lines.iter().map(|l| l.quantity).sum(),
            sub_total,
            tax_total,
            grand_total: sub_total.checked_add(tax_total)?,
        })
    }
}

/// State carried to the success view after a transaction is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_id: i64,
    pub customer_name: String,
    pub total_items: usize,
    pub total_quantity: u32,
    #[ts(as = "String")]
    pub sub_total: Money,
    #[ts(as = "String")]
    pub tax_total: Money,
    #[ts(as = "String")]
    pub grand_total: Money,
}

impl Receipt {
    pub fn new(transaction_id: i64, customer_name: impl Into<String>, totals: ReceiptTotals) -> Self {
        Receipt {
            transaction_id,
            customer_name: customer_name.into(),
            total_items: totals.total_items,
            total_quantity: totals.total_quantity,
            sub_total: totals.sub_total,
            tax_total: totals.tax_total,
            grand_total: totals.grand_total,
        }
    }
}

/// Resolves the success view: without a carried receipt the user is sent to
/// the transaction list.
pub fn resolve_success_view(carried: Option<Receipt>) -> Result<Receipt, Route> {
    carried.ok_or(Route::Transactions)
}

// =============================================================================
// Unit Tests
// =============================================================================
