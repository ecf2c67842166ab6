//! Submission form endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::form::DraftPatch;
use crate::session::UploadView;
use crate::AppState;

/// PATCH /api/draft - Edit draft fields.
pub async fn patch_draft(
    State(state): State<AppState>,
    Json(patch): Json<DraftPatch>,
) -> ApiResult<UploadView> {
    let mut session = state.session.write().await;
    session.form.apply(patch);
    success(session.upload_view())
}

/// POST /api/draft/submit - Submit the draft.
///
/// Validation and backend failures come back as the error envelope; the form keeps the
/// message for the next upload view.
pub async fn submit_draft(State(state): State<AppState>) -> ApiResult<UploadView> {
    state.session.submit().await?;
    success(state.session.read().await.upload_view())
}
