use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use invoicedesk_infra::StoreError;

use crate::actions::{ActionError, ActionOutcome};

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn store_error_to_response(err: StoreError) -> Response {
    tracing::error!(error = %err, "invoice read failed");
    match err {
        StoreError::Unavailable(msg) => json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg),
        other => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", other.to_string()),
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            // 303 so the browser follows with a GET.
            ActionOutcome::Redirect { path } => {
                (StatusCode::SEE_OTHER, [(header::LOCATION, path)]).into_response()
            }
            ActionOutcome::Message { message } => {
                (StatusCode::OK, axum::Json(json!({ "message": message }))).into_response()
            }
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        match self {
            ActionError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({
                    "error": "validation_error",
                    "message": err.to_string(),
                    "fields": err.errors(),
                })),
            )
                .into_response(),
            ActionError::DeleteDisabled => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "delete_disabled",
                ActionError::DeleteDisabled.to_string(),
            ),
        }
    }
}
