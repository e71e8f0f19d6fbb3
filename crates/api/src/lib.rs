//! HTTP API: invoice form actions and their axum wiring.

pub mod actions;
pub mod app;

pub use actions::{ActionError, ActionOutcome, Clock, InvoiceActions, SystemClock};
