//! # Configuration State
//!
//! Display settings loaded at startup. Read-only afterwards, so no lock.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOCKDESK_*`)
//! 2. Defaults (this file)
//!
//! Backend settings live in `stockdesk_client::ClientConfig`.

use serde::{Deserialize, Serialize};
use stockdesk_core::Money;

/// Application display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Shown in the sidebar header and on receipts
    pub store_title: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// VAT percentage shown next to the tax line
    pub vat_percent: u32,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_title: "StockDesk".to_string(),
            currency_symbol: "Rp".to_string(),
            vat_percent: stockdesk_core::VAT_RATE.bps() / 100,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOCKDESK_TITLE`: Override store title
    /// - `STOCKDESK_CURRENCY_SYMBOL`: Override currency symbol
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();

        if let Ok(title) = std::env::var("STOCKDESK_TITLE") {
            config.store_title = title;
        }

        if let Ok(symbol) = std::env::var("STOCKDESK_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ## Example
    /// ```rust
    /// use stockdesk_console_lib::state::ConfigState;
    /// use stockdesk_core::Money;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_money(Money::from_rupiah(11_000)), "Rp 11.000");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        amount.to_string().replacen("Rp", &self.currency_symbol, 1)
    }
}
