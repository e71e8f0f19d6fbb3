use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};

use invoicedesk_core::InvoiceId;
use invoicedesk_infra::INVOICES_PATH;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices))
        .route("/create", post(create_invoice))
        .route("/:id/edit", get(get_invoice).post(update_invoice))
        .route("/:id/delete", post(delete_invoice))
}

fn parse_id(raw: &str) -> Result<InvoiceId, Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid invoice id"))
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::InvoiceForm>,
) -> Response {
    services.actions.create(&form).await.into_response()
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(form): Form<dto::InvoiceForm>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    services.actions.update(id, &form).await.into_response()
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    services.actions.delete(id).await.into_response()
}

/// Listing served from the path cache; a miss reloads from the store.
pub async fn list_invoices(Extension(services): Extension<Arc<AppServices>>) -> Response {
    if let Some(rows) = services.listing.get(INVOICES_PATH) {
        return Json(dto::listing_to_json(&rows)).into_response();
    }

    let generation = services.listing.revalidations(INVOICES_PATH);
    match services.store.list().await {
        Ok(rows) => {
            let body = dto::listing_to_json(&rows);
            services.listing.put_if_current(INVOICES_PATH, generation, rows);
            Json(body).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store.get(id).await {
        Ok(Some(invoice)) => Json(dto::invoice_to_json(&invoice)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
