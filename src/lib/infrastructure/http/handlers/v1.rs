use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::campaigns::{DispatchService, DraftStore},
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod drafts;
pub mod send_emails;
pub mod stoplight;
pub mod uptime;

pub fn router<D: DraftStore, S: DispatchService>() -> Router<AppState<D, S>> {
    Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler))
        .route(
            "/draft",
            get(drafts::get_draft::handler).post(drafts::load_draft::handler),
        )
        .route("/send-emails", post(send_emails::handler))
}
