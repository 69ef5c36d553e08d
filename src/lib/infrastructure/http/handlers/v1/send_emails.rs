//! Send emails handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::campaigns::{DispatchReport, DispatchService, DraftStore, RecipientList},
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Send emails request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailsBody {
    /// Every address the current draft is sent to
    #[serde(default)]
    #[schema(example = json!(["a@b.com", "c@d.com"]))]
    recipients: Vec<String>,
}

/// Send emails response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailsResponse {
    success: bool,

    #[schema(example = "Email sent to recipients.")]
    message: String,

    /// A rendering of the sent message, only offered by test relays
    #[schema(example = "https://ethereal.email/message/Zm9vYmFy")]
    preview_url: Option<String>,
}

impl From<&DispatchReport> for SendEmailsResponse {
    fn from(report: &DispatchReport) -> Self {
        Self {
            success: report.success,
            message: report.message.clone(),
            preview_url: report.preview_url().map(str::to_string),
        }
    }
}

/// Send the current draft to a list of recipients
#[utoipa::path(
    post,
    operation_id = "send_emails",
    tag = "Dispatch",
    path = "/api/v1/send-emails",
    request_body = SendEmailsBody,
    responses(
        (status = StatusCode::OK, description = "Email sent", body = SendEmailsResponse),
        (status = StatusCode::BAD_REQUEST, description = "No recipients, or the draft is incomplete", body = ErrorResponse, example = json!({ "error": "Subject and body are required." })),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "A recipient is not a valid email address", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "The mail relay failed", body = ErrorResponse, example = json!({ "error": "Error sending emails." })),
    )
)]
pub async fn handler<D: DraftStore, S: DispatchService>(
    State(state): State<AppState<D, S>>,
    request: Result<Json<SendEmailsBody>, JsonRejection>,
) -> Result<Json<SendEmailsResponse>, ApiError> {
    let Json(request) = request?;

    let recipients = RecipientList::parse(&request.recipients)?;

    let report = state.dispatcher.dispatch(&recipients).await?;

    Ok(Json(SendEmailsResponse::from(&report)))
}
