//! Layout route — position an arbitrary mind-map tree.

use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::mindmap::layout::{DEFAULT_FIT_MARGIN, Viewport};
use crate::mindmap::node::ensure_unique_ids;
use crate::mindmap::{Layout, LayoutConfig, LayoutVariant, MindMapNode, layout};
use crate::routes::ApiError;

/// Container to fit the laid-out map into.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
    pub margin: Option<f64>,
}

#[derive(Deserialize)]
pub struct LayoutBody {
    pub data: MindMapNode,
    #[serde(default)]
    pub variant: LayoutVariant,
    pub viewport: Option<ContainerSize>,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub variant: LayoutVariant,
    #[serde(flatten)]
    pub layout: Layout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

/// `POST /api/layout` — lay out a tree with the chosen variant.
pub async fn layout_map(
    payload: Result<Json<LayoutBody>, JsonRejection>,
) -> Result<Json<LayoutResponse>, ApiError> {
    let Json(mut body) = payload?;
    // Node and edge ids key the rendered output, so they must be unique.
    let rekeyed = ensure_unique_ids(&mut body.data);
    if rekeyed > 0 {
        warn!(rekeyed, "layout: re-keyed blank or duplicate node ids");
    }
    render(&body.data, body.variant, body.viewport).map(Json)
}

/// Lay out `data` and, when a container is given, fit it.
pub(crate) fn render(
    data: &MindMapNode,
    variant: LayoutVariant,
    container: Option<ContainerSize>,
) -> Result<LayoutResponse, ApiError> {
    let result = layout(data, &LayoutConfig::for_variant(variant));
    let viewport = match container {
        Some(size) => {
            let margin = size.margin.unwrap_or(DEFAULT_FIT_MARGIN);
            let valid = size.width.is_finite() && size.width > 0.0 && size.height.is_finite() && size.height > 0.0;
            if !valid || !margin.is_finite() || margin < 0.0 {
                return Err(ApiError::bad_request("viewport width and height must be positive"));
            }
            Some(result.bounds.fit(size.width, size.height, margin))
        }
        None => None,
    };
    Ok(LayoutResponse { variant, layout: result, viewport })
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
