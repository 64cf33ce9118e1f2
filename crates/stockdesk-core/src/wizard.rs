//! # Transaction Wizard
//!
//! Three-step state machine that builds a transaction draft and hands it to
//! the submission pipeline.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────────────┐ submit_customer  ┌──────────────────┐            │
//! │   │ 1 CustomerDetail │ ───(valid)─────► │ 2 AssignProducts │            │
//! │   │                  │ ◄──── back ───── │ add / remove     │            │
//! │   └──────────────────┘                  └────────┬─────────┘            │
//! │                                   proceed_to_review │  ▲ back            │
//! │                                                  ▼  │                   │
//! │                                         ┌──────────────────┐            │
//! │                                         │ 3 ReviewSubmit   │            │
//! │                                         └────────┬─────────┘            │
//! │                                 begin_submission │                      │
//! │                                                  ▼                      │
//! │                                  pending ──ok──► complete → Receipt     │
//! │                                     │            (draft cleared, step 1)│
//! │                                     └──err─► fail (stay on step 3)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The wizard never performs I/O. The app layer resolves the merchant,
//! sends the request built by [`Wizard::begin_submission`] and reports the
//! outcome back through [`Wizard::complete_submission`] or
//! [`Wizard::fail_submission`].
//!
//! Every submission carries a sequence number that keeps increasing across
//! resets. An outcome is only applied when its number matches the submission
//! currently in flight, so a late response never touches a newer draft.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::draft::{CartLine, CustomerInfo, TransactionDraft};
use crate::error::WizardError;
use crate::receipt::{Receipt, ReceiptTotals};
use crate::types::{CreateTransactionRequest, MerchantRef, Product};
use crate::validation::validate_customer;

// =============================================================================
// Steps
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    CustomerDetail,
    AssignProducts,
    ReviewSubmit,
}

impl WizardStep {
    /// Step number shown in the progress bar (1..=3).
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::CustomerDetail => 1,
            WizardStep::AssignProducts => 2,
            WizardStep::ReviewSubmit => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::CustomerDetail => "Customer Detail",
            WizardStep::AssignProducts => "Assign Products",
            WizardStep::ReviewSubmit => "Review Transaction",
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::CustomerDetail => None,
            WizardStep::AssignProducts => Some(WizardStep::CustomerDetail),
            WizardStep::ReviewSubmit => Some(WizardStep::AssignProducts),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

// =============================================================================
// Inputs / Outputs
// =============================================================================

/// Raw customer form input, before trimming and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerForm {
    pub name: String,
    pub phone: String,
}

/// Result of moving to the review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReadiness {
    /// The review page shows its empty-state prompt when true.
    pub cart_empty: bool,
    pub total_items: usize,
}

/// A submission that has been started and not yet resolved.
///
/// Holds the request body plus the receipt data captured from the draft at
/// the moment of submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    id: u64,
    request: CreateTransactionRequest,
    customer_name: String,
    totals: ReceiptTotals,
}

impl PendingSubmission {
    /// Sequence number assigned by [`Wizard::begin_submission`].
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &CreateTransactionRequest {
        &self.request
    }

    pub fn totals(&self) -> &ReceiptTotals {
        &self.totals
    }

    /// Receipt for the created transaction, from the data captured at
    /// submission time.
    pub fn receipt(&self, transaction_id: i64) -> Receipt {
        Receipt::new(transaction_id, self.customer_name.clone(), self.totals.clone())
    }
}

/// Serializable view of the wizard for the front end.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub step_number: u8,
    pub step_label: String,
    pub customer: CustomerInfo,
    pub cart: Vec<CartLine>,
    pub totals: ReceiptTotals,
    pub submitting: bool,
}

// =============================================================================
// Wizard
// =============================================================================

/// The transaction wizard for one sale.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: WizardStep,
    draft: TransactionDraft,
    /// Last sequence number handed out; survives `reset`.
    submission_seq: u64,
    in_flight: Option<u64>,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &TransactionDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Form values to pre-fill step one (the current draft customer).
    pub fn customer_form(&self) -> CustomerForm {
        CustomerForm {
            name: self.draft.customer().name.clone(),
            phone: self.draft.customer().phone.clone(),
        }
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            step_number: self.step.number(),
            step_label: self.step.label().to_string(),
            customer: self.draft.customer().clone(),
            cart: self.draft.cart().to_vec(),
            totals: self.draft.totals(),
            submitting: self.is_submitting(),
        }
    }

    fn require_step(&self, step: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step != step {
            return Err(WizardError::WrongStep {
                action,
                step: self.step,
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Step 1: Customer Detail
    // -------------------------------------------------------------------------

    /// Validates the customer form and advances to Assign Products.
    ///
    /// On failure the wizard stays on Customer Detail and the draft keeps its
    /// previous customer.
    pub fn submit_customer(&mut self, form: &CustomerForm) -> Result<&CustomerInfo, WizardError> {
        self.require_step(WizardStep::CustomerDetail, "submit_customer")?;

        let customer =
            validate_customer(&form.name, &form.phone).map_err(WizardError::InvalidCustomer)?;
        self.draft.set_customer(customer);
        self.step = WizardStep::AssignProducts;

        Ok(self.draft.customer())
    }

    // -------------------------------------------------------------------------
    // Step 2: Assign Products
    // -------------------------------------------------------------------------

    /// Appends a cart line picked from the operator's merchant stock.
    pub fn add_product(
        &mut self,
        product: &Product,
        quantity: i64,
        warehouse_id: Option<i64>,
    ) -> Result<&CartLine, WizardError> {
        self.require_step(WizardStep::AssignProducts, "add_product")?;
        Ok(self.draft.add_product(product, quantity, warehouse_id)?)
    }

    /// Removes the cart line at `index`.
    pub fn remove_line(&mut self, index: usize) -> Result<CartLine, WizardError> {
        self.require_step(WizardStep::AssignProducts, "remove_line")?;
        Ok(self.draft.remove_line(index)?)
    }

    /// Changes the quantity of an existing cart line.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<(), WizardError> {
        self.require_step(WizardStep::AssignProducts, "set_quantity")?;
        Ok(self.draft.set_quantity(index, quantity)?)
    }

    /// Moves to the review step. An empty cart is reported, not refused.
    pub fn proceed_to_review(&mut self) -> Result<ReviewReadiness, WizardError> {
        self.require_step(WizardStep::AssignProducts, "proceed_to_review")?;
        self.step = WizardStep::ReviewSubmit;

        Ok(ReviewReadiness {
            cart_empty: self.draft.is_empty(),
            total_items: self.draft.cart().len(),
        })
    }

    /// Goes back one step without touching the draft.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        let previous = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.step = previous;
        Ok(previous)
    }

    // -------------------------------------------------------------------------
    // Step 3: Review + Submit
    // -------------------------------------------------------------------------

    /// Checks that a submission could start now, ignoring the merchant.
    ///
    /// Lets callers refuse early before resolving the merchant over the
    /// network.
    pub fn check_submittable(&self) -> Result<(), WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        self.require_step(WizardStep::ReviewSubmit, "submit")
    }

    /// Starts a submission for the given merchant.
    ///
    /// ## Errors
    /// - `SubmissionInFlight` if one is already pending
    /// - `WrongStep` unless on Review Submit
    /// - `MissingMerchant` if no merchant could be resolved
    pub fn begin_submission(
        &mut self,
        merchant: Option<&MerchantRef>,
    ) -> Result<PendingSubmission, WizardError> {
        self.check_submittable()?;
        let merchant = merchant.ok_or(WizardError::MissingMerchant)?;

        let id = self.submission_seq + 1;
        let customer = self.draft.customer();
        let pending = PendingSubmission {
            id,
            request: CreateTransactionRequest {
                name: customer.name.clone(),
                phone: customer.phone.clone(),
                merchant_id: merchant.id,
                products: self.draft.line_requests(),
            },
            customer_name: customer.name.clone(),
            totals: self.draft.totals(),
        };

        self.submission_seq = id;
        self.in_flight = Some(id);
        Ok(pending)
    }

    fn require_in_flight(&self, pending: &PendingSubmission) -> Result<(), WizardError> {
        match self.in_flight {
            None => Err(WizardError::NoPendingSubmission),
            Some(current) if current != pending.id => Err(WizardError::StaleSubmission {
                submission: pending.id,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Records a successful submission: builds the receipt from the totals
    /// captured at submission time, then clears the draft and returns to
    /// step one.
    ///
    /// ## Errors
    /// - `NoPendingSubmission` if nothing is in flight
    /// - `StaleSubmission` if `pending` is not the submission in flight
    pub fn complete_submission(
        &mut self,
        pending: &PendingSubmission,
        transaction_id: i64,
    ) -> Result<Receipt, WizardError> {
        self.require_in_flight(pending)?;

        let receipt = pending.receipt(transaction_id);
        self.draft.clear();
        self.step = WizardStep::CustomerDetail;
        self.in_flight = None;

        Ok(receipt)
    }

    /// Records a failed submission. The draft and step are left unchanged.
    ///
    /// Returns false when `pending` is no longer the submission in flight,
    /// in which case nothing changes.
    pub fn fail_submission(&mut self, pending: &PendingSubmission) -> bool {
        if self.require_in_flight(pending).is_err() {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Cancel from the wizard UI. Refused while a submission is in flight.
    pub fn cancel(&mut self) -> Result<(), WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        self.reset();
        Ok(())
    }

    /// Abandons the wizard unconditionally (logout, session loss).
    ///
    /// A submission still in flight becomes stale; its outcome is ignored.
    pub fn reset(&mut self) {
        *self = Wizard {
            submission_seq: self.submission_seq,
            ..Wizard::new()
        };
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
