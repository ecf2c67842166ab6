//! Catalog endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::session::HomeView;
use crate::AppState;

/// POST /api/catalog/refresh - Reload categories and books.
///
/// A failed reload keeps the previous catalog and is only logged.
pub async fn refresh_catalog(State(state): State<AppState>) -> ApiResult<HomeView> {
    state.session.load().await;
    success(state.session.read().await.home_view())
}
