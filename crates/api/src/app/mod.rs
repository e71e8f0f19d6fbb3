//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: store, listing cache and actions
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: form type and JSON mapping helpers
//! - `errors.rs`: error responses and the action outcome mapping

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
}
