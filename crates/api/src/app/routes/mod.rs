use axum::Router;

pub mod invoices;
pub mod system;

/// Router for the dashboard endpoints.
pub fn router() -> Router {
    Router::new().nest("/dashboard/invoices", invoices::router())
}
