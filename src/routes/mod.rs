//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! A JSON API only: generation, layout, and history under `/api`, plus a
//! health probe. Errors share one body shape, `{ error, code }`, where
//! `code` is the stable `E_*` identifier from [`ErrorCode`].

pub mod generate;
pub mod history;
pub mod layout;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ErrorCode;
use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate", post(generate::generate_map))
        .route("/api/layout", post(layout::layout_map))
        .route("/api/history", get(history::list_history).delete(history::clear_history))
        .route("/api/history/{id}", get(history::get_history_item).delete(history::delete_history_item))
        .route("/api/history/{id}/layout", get(history::layout_history_item))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERROR RESPONSES
// =============================================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Error response carrying a status plus the `{ error, code }` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, err: &impl ErrorCode) -> Self {
        Self { status, code: err.error_code(), message: err.to_string() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, code: "E_INVALID_INPUT", message: message.into() }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message, code: self.code })).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub(crate) fn ok() -> Json<Self> {
        Json(Self { ok: true })
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
