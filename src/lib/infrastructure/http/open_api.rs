//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{errors::ErrorResponse, handlers::v1::*};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Phisherman"),
    paths(
        drafts::load_draft::handler,
        drafts::get_draft::handler,
        send_emails::handler,
        uptime::handler
    ),
    components(schemas(
        drafts::DraftBody,
        drafts::load_draft::LoadDraftBody,
        drafts::load_draft::LoadDraftResponse,
        send_emails::SendEmailsBody,
        send_emails::SendEmailsResponse,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
