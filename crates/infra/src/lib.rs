//! Infrastructure layer: invoice storage, listing cache, configuration.

pub mod cache;
pub mod config;
pub mod store;

pub use cache::{INVOICES_PATH, ListingCache, PathCache, PathRevalidator};
pub use config::{ConfigError, DeleteMode, Settings};
pub use store::{InMemoryInvoiceStore, InvoiceStore, PostgresInvoiceStore, StoreError};
