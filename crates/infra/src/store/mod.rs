//! Invoice persistence boundary.
//!
//! Actions talk to an [`InvoiceStore`]; each call maps to exactly one SQL
//! statement in the Postgres implementation. There are no transactions
//! spanning calls and no retries.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use invoicedesk_core::InvoiceId;
use invoicedesk_invoicing::{Invoice, InvoiceChanges};

pub use in_memory::InMemoryInvoiceStore;
pub use postgres::PostgresInvoiceStore;

/// Persistence failure.
///
/// These are infrastructure errors, as opposed to validation failures of the
/// submitted form.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. duplicate id).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A column constraint rejected the write.
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be mapped back into an invoice.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("query failed: {0}")]
    Query(String),
}

/// Table-shaped access to invoices.
///
/// `update` and `delete` return the number of affected rows; zero is not an
/// error.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn insert(&self, invoice: &Invoice) -> Result<(), StoreError>;

    async fn update(&self, id: InvoiceId, changes: &InvoiceChanges) -> Result<u64, StoreError>;

    async fn delete(&self, id: InvoiceId) -> Result<u64, StoreError>;

    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// All invoices, newest `date` first.
    async fn list(&self) -> Result<Vec<Invoice>, StoreError>;
}

#[async_trait]
impl<S> InvoiceStore for Arc<S>
where
    S: InvoiceStore + ?Sized,
{
    async fn insert(&self, invoice: &Invoice) -> Result<(), StoreError> {
        (**self).insert(invoice).await
    }

    async fn update(&self, id: InvoiceId, changes: &InvoiceChanges) -> Result<u64, StoreError> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: InvoiceId) -> Result<u64, StoreError> {
        (**self).delete(id).await
    }

    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        (**self).list().await
    }
}
