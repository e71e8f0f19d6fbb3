//! Invoicing domain module.
//!
//! Invoice data model, money conversion and the validation schemas applied to
//! submitted invoice forms. Pure domain logic (no IO, no HTTP, no storage).

pub mod form;
pub mod invoice;
pub mod money;
pub mod schema;

pub use form::FormData;
pub use invoice::{CustomerId, Invoice, InvoiceChanges, InvoiceStatus};
pub use money::{Amount, AmountCents};
pub use schema::{
    CreateInvoice, FieldError, FieldSet, InvoiceField, InvoiceInput, InvoiceSchema,
    ParsedFields, UpdateInvoice, ValidationError, Violation,
};
