//! Get draft handler

use axum::{extract::State, Json};

use crate::{
    domain::campaigns::{DispatchService, DraftStore},
    infrastructure::http::{errors::ApiError, handlers::v1::drafts::DraftBody, state::AppState},
};

/// Get the current draft
#[utoipa::path(
    get,
    operation_id = "get_draft",
    tag = "Drafts",
    path = "/api/v1/draft",
    responses(
        (status = StatusCode::OK, description = "The current draft, empty if none was loaded", body = DraftBody),
    )
)]
pub async fn handler<D: DraftStore, S: DispatchService>(
    State(state): State<AppState<D, S>>,
) -> Result<Json<DraftBody>, ApiError> {
    let draft = state.drafts.get();

    Ok(Json(draft.as_ref().into()))
}
