//! History routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::info;

use crate::mindmap::LayoutVariant;
use crate::routes::layout::{ContainerSize, LayoutResponse, render};
use crate::routes::{ApiError, OkResponse};
use crate::services::history::{HistoryError, HistoryItem};
use crate::state::AppState;

fn not_found(id: String) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, &HistoryError::NotFound(id))
}

/// `GET /api/history` — all items, most recent first.
pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryItem>> {
    Json(state.history.read().await.list().to_vec())
}

/// `GET /api/history/:id` — one item.
pub async fn get_history_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryItem>, ApiError> {
    let history = state.history.read().await;
    history.get(&id).cloned().map(Json).ok_or_else(|| not_found(id))
}

/// `DELETE /api/history/:id` — remove one item.
pub async fn delete_history_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    if state.history.write().await.remove(&id) {
        info!(%id, "history item deleted");
        Ok(OkResponse::ok())
    } else {
        Err(not_found(id))
    }
}

/// `DELETE /api/history` — remove every item.
pub async fn clear_history(State(state): State<AppState>) -> Json<OkResponse> {
    let removed = state.history.write().await.clear();
    info!(removed, "history cleared");
    OkResponse::ok()
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryLayoutQuery {
    #[serde(default)]
    pub variant: LayoutVariant,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// `GET /api/history/:id/layout?variant=&width=&height=` — re-lay out a
/// saved map without another generation.
pub async fn layout_history_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryLayoutQuery>,
) -> Result<Json<LayoutResponse>, ApiError> {
    let data = {
        let history = state.history.read().await;
        match history.get(&id) {
            Some(item) => item.data.clone(),
            None => return Err(not_found(id)),
        }
    };
    let container = match (query.width, query.height) {
        (Some(width), Some(height)) => Some(ContainerSize { width, height, margin: None }),
        (None, None) => None,
        _ => return Err(ApiError::bad_request("width and height must be given together")),
    };
    render(&data, query.variant, container).map(Json)
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
