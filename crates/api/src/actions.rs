//! Invoice form actions: create, update, delete.
//!
//! Each action validates the submitted form, issues a single store call and,
//! on success, revalidates the invoice listing. Store failures come back as
//! [`ActionOutcome::Message`] so the form can be resubmitted; validation
//! failures are returned as [`ActionError`] and handled by the caller's
//! generic error path.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use invoicedesk_core::InvoiceId;
use invoicedesk_infra::{DeleteMode, INVOICES_PATH, InvoiceStore, PathRevalidator};
use invoicedesk_invoicing::{
    CreateInvoice, FormData, Invoice, InvoiceChanges, UpdateInvoice, ValidationError,
};

pub const CREATE_FAILED: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_FAILED: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_FAILED: &str = "Database Error: Failed to Delete Invoice.";
pub const DELETED: &str = "Deleted Invoice.";

/// What the caller should do after an action completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Navigate to `path`.
    Redirect { path: String },
    /// Stay on the page and show `message`.
    Message { message: String },
}

impl ActionOutcome {
    pub fn redirect(path: impl Into<String>) -> Self {
        Self::Redirect { path: path.into() }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Failures the actions do not turn into a message.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Deletion is switched off by [`DeleteMode::ShortCircuit`].
    #[error("Failed to Delete Invoice")]
    DeleteDisabled,
}

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// UTC wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// The three invoice form actions over a store and a path revalidator.
pub struct InvoiceActions<S, R> {
    store: S,
    revalidator: R,
    clock: Arc<dyn Clock>,
    delete_mode: DeleteMode,
}

impl<S, R> InvoiceActions<S, R>
where
    S: InvoiceStore,
    R: PathRevalidator,
{
    pub fn new(store: S, revalidator: R) -> Self {
        Self {
            store,
            revalidator,
            clock: Arc::new(SystemClock),
            delete_mode: DeleteMode::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_delete_mode(mut self, delete_mode: DeleteMode) -> Self {
        self.delete_mode = delete_mode;
        self
    }

    pub fn delete_mode(&self) -> DeleteMode {
        self.delete_mode
    }

    /// Validate, insert with a fresh id and today's date, then redirect to
    /// the listing.
    pub async fn create(&self, form: &FormData) -> Result<ActionOutcome, ActionError> {
        let input = CreateInvoice::parse(form)?;
        let invoice = Invoice::create(InvoiceId::new(), &input, self.clock.today());

        if let Err(e) = self.store.insert(&invoice).await {
            tracing::warn!(error = %e, "invoice insert failed");
            return Ok(ActionOutcome::message(CREATE_FAILED));
        }

        tracing::info!(
            invoice_id = %invoice.id,
            amount_cents = invoice.amount.value(),
            status = %invoice.status,
            "invoice created"
        );
        self.revalidator.revalidate_path(INVOICES_PATH);
        Ok(ActionOutcome::redirect(INVOICES_PATH))
    }

    /// Validate and overwrite `customer_id`, `amount` and `status` of `id`.
    ///
    /// An unknown id updates nothing and still redirects.
    pub async fn update(
        &self,
        id: InvoiceId,
        form: &FormData,
    ) -> Result<ActionOutcome, ActionError> {
        let input = UpdateInvoice::parse(form)?;
        let changes = InvoiceChanges::from(&input);

        let affected = match self.store.update(id, &changes).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(invoice_id = %id, error = %e, "invoice update failed");
                return Ok(ActionOutcome::message(UPDATE_FAILED));
            }
        };

        if affected == 0 {
            tracing::debug!(invoice_id = %id, "invoice update matched no rows");
        } else {
            tracing::info!(invoice_id = %id, "invoice updated");
        }
        self.revalidator.revalidate_path(INVOICES_PATH);
        Ok(ActionOutcome::redirect(INVOICES_PATH))
    }

    /// Remove `id` and revalidate the listing in place (no redirect).
    pub async fn delete(&self, id: InvoiceId) -> Result<ActionOutcome, ActionError> {
        if self.delete_mode == DeleteMode::ShortCircuit {
            return Err(ActionError::DeleteDisabled);
        }

        match self.store.delete(id).await {
            Ok(affected) => {
                tracing::info!(invoice_id = %id, affected, "invoice deleted");
                self.revalidator.revalidate_path(INVOICES_PATH);
                Ok(ActionOutcome::message(DELETED))
            }
            Err(e) => {
                tracing::warn!(invoice_id = %id, error = %e, "invoice delete failed");
                Ok(ActionOutcome::message(DELETE_FAILED))
            }
        }
    }
}
