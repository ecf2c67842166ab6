//! Navigation and browse filter endpoints.

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::RecordId;
use crate::navigation::ViewMode;
use crate::session::{ActiveView, BrowseView};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    pub to: ViewMode,
    /// Only meaningful when browsing
    #[serde(default)]
    pub category_id: Option<RecordId>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    #[serde(default)]
    pub category_id: Option<RecordId>,
}

/// POST /api/navigate - Switch view.
pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> ApiResult<ActiveView> {
    let mut session = state.session.write().await;

    match (request.to, request.category_id) {
        (ViewMode::Browse, Some(id)) => session.router.browse_category(id),
        (_, Some(_)) => {
            return Err(AppError::BadRequest(
                "categoryId is only valid when browsing".to_string(),
            ))
        }
        (to, None) => session.router.navigate(to),
    }

    success(session.active_view())
}

/// PUT /api/browse/query - Update the search text.
pub async fn set_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<BrowseView> {
    let mut session = state.session.write().await;
    session.router.set_query(request.query);
    success(session.browse_view())
}

/// PUT /api/browse/category - Select a category, or `null` for all.
pub async fn set_category(
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> ApiResult<BrowseView> {
    let mut session = state.session.write().await;
    match request.category_id {
        Some(id) => session.router.set_category(Some(id)),
        None => session.router.clear_category(),
    }
    success(session.browse_view())
}
