//! # Wizard State
//!
//! Holds the transaction wizard for the current sale and the receipt carried
//! to the success view.
//!
//! The wizard is wrapped in `Arc<Mutex<T>>`: every command either reads a
//! snapshot or applies one mutation, so a plain mutex is enough.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit_transaction                                                     │
//! │                                                                         │
//! │  lock ─► begin_submission ─► unlock                                     │
//! │                                 │                                       │
//! │                          POST /transaksi (.await, no lock held)         │
//! │                                 │                                       │
//! │  lock ─► complete / fail ──► unlock ─► carry receipt                    │
//! │                                                                         │
//! │  NOTE: the in-flight submission id stops a second submit while the      │
//! │        lock is released, and marks a late outcome stale after a reset.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use stockdesk_core::{Receipt, Wizard};

/// Managed wizard state.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    wizard: Arc<Mutex<Wizard>>,
    receipt: Arc<Mutex<Option<Receipt>>>,
}

impl WizardState {
    /// Creates a wizard on step one with an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the wizard.
    pub fn with_wizard<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Wizard) -> R,
    {
        let wizard = self.wizard.lock().expect("Wizard mutex poisoned");
        f(&wizard)
    }

    /// Executes a function with write access to the wizard.
    pub fn with_wizard_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Wizard) -> R,
    {
        let mut wizard = self.wizard.lock().expect("Wizard mutex poisoned");
        f(&mut wizard)
    }

    /// Stores the receipt for the success view, replacing any older one.
    pub fn carry_receipt(&self, receipt: Receipt) {
        *self.receipt.lock().expect("Receipt mutex poisoned") = Some(receipt);
    }

    /// Takes the carried receipt. The success view consumes it once.
    pub fn take_receipt(&self) -> Option<Receipt> {
        self.receipt.lock().expect("Receipt mutex poisoned").take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdesk_core::{CustomerForm, ReceiptTotals, WizardStep};

    #[test]
    fn test_mutations_are_shared_between_clones() {
        let state = WizardState::new();
        let other = state.clone();

        state
            .with_wizard_mut(|w| {
                w.submit_customer(&CustomerForm {
                    name: "Budi".into(),
                    phone: "08123".into(),
                })
                .map(|_| ())
            })
            .unwrap();

        assert_eq!(other.with_wizard(|w| w.step()), WizardStep::AssignProducts);
    }

    #[test]
    fn test_receipt_is_taken_once() {
        let state = WizardState::new();
        state.carry_receipt(Receipt::new(5, "Budi", ReceiptTotals::default()));

        assert_eq!(state.take_receipt().map(|r| r.transaction_id), Some(5));
        assert!(state.take_receipt().is_none());
    }
}
