//! View model endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::session::{ActiveView, BrowseView, HomeView, UploadView};
use crate::AppState;

/// GET /api/view - The view for the current mode.
pub async fn get_view(State(state): State<AppState>) -> ApiResult<ActiveView> {
    success(state.session.read().await.active_view())
}

/// GET /api/home - Home view.
pub async fn get_home(State(state): State<AppState>) -> ApiResult<HomeView> {
    success(state.session.read().await.home_view())
}

/// GET /api/browse - Browse view with the current filters applied.
pub async fn get_browse(State(state): State<AppState>) -> ApiResult<BrowseView> {
    success(state.session.read().await.browse_view())
}

/// GET /api/upload - Upload form.
pub async fn get_upload(State(state): State<AppState>) -> ApiResult<UploadView> {
    success(state.session.read().await.upload_view())
}
