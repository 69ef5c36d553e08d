//! Load draft handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::campaigns::{DispatchService, DraftStore, NewDraft},
    infrastructure::http::{errors::ApiError, handlers::v1::drafts::DraftBody, state::AppState},
};

/// Load draft request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoadDraftBody {
    /// The subject line
    #[serde(default)]
    #[schema(example = "Reset your password")]
    subject: String,

    /// The HTML body
    #[serde(default)]
    #[schema(example = "<p>Click here</p>")]
    message: String,

    /// Ignored: the sender is always the provisioned transport identity
    #[serde(default)]
    #[schema(example = "someone@example.com")]
    sender: Option<String>,
}

impl From<&LoadDraftBody> for NewDraft {
    fn from(body: &LoadDraftBody) -> Self {
        NewDraft::new(&body.subject, &body.message, body.sender.as_deref())
    }
}

/// Load draft response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoadDraftResponse {
    success: bool,
    draft: DraftBody,
}

/// Replace the current draft
#[utoipa::path(
    post,
    operation_id = "load_draft",
    tag = "Drafts",
    path = "/api/v1/draft",
    request_body = LoadDraftBody,
    responses(
        (status = StatusCode::OK, description = "Draft loaded", body = LoadDraftResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Unprocessable entity", body = ErrorResponse),
    )
)]
pub async fn handler<D: DraftStore, S: DispatchService>(
    State(state): State<AppState<D, S>>,
    request: Result<Json<LoadDraftBody>, JsonRejection>,
) -> Result<Json<LoadDraftResponse>, ApiError> {
    let Json(request) = request?;

    let draft = state.drafts.load(&NewDraft::from(&request));

    Ok(Json(LoadDraftResponse {
        success: true,
        draft: draft.as_ref().into(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::{
            campaigns::{
                tests::{MockDispatchService, MockDraftStore},
                Draft, InMemoryDraftStore,
            },
            communication::{email_addresses::EmailAddress, transport::TransportIdentity},
        },
        infrastructure::http::{
            errors::ErrorResponse,
            router,
            state::{tests::test_state, AppState},
        },
    };

    use super::*;

    #[tokio::test]
    async fn test_load_draft_passes_request_to_store() -> TestResult {
        let mut drafts = MockDraftStore::new();

        drafts
            .expect_load()
            .times(1)
            .withf(|draft| {
                draft.subject() == "Hi"
                    && draft.message() == "<p>Body</p>"
                    && draft.requested_sender() == Some("ignored@x.com")
            })
            .returning(|draft| {
                Arc::new(Draft {
                    subject: draft.subject().to_string(),
                    message: draft.message().to_string(),
                    sender: EmailAddress::new("bot@relay.test").ok(),
                    version: 3,
                    loaded_at: None,
                })
            });

        let response = TestServer::new(router(test_state(Some(drafts), None)))?
            .post("/api/v1/draft")
            .json(&json!({
                "subject": "Hi",
                "message": "<p>Body</p>",
                "sender": "ignored@x.com"
            }))
            .await;

        response.assert_status_ok();

        let json = response.json::<LoadDraftResponse>();

        assert!(json.success);
        assert_eq!(
            json.draft,
            DraftBody {
                subject: "Hi".to_string(),
                message: "<p>Body</p>".to_string(),
                sender: Some("bot@relay.test".to_string()),
                version: 3,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_load_draft_never_echoes_caller_sender() -> TestResult {
        let drafts = Arc::new(InMemoryDraftStore::new(Some(TransportIdentity::new(
            EmailAddress::new("bot@relay.test")?,
        ))));
        let state = AppState::new(Arc::clone(&drafts), MockDispatchService::new());

        let response = TestServer::new(router(state))?
            .post("/api/v1/draft")
            .json(&json!({
                "subject": "Reset your password",
                "message": "<p>Click here</p>",
                "sender": "attacker@evil.test"
            }))
            .await;

        response.assert_status_ok();

        let json = response.json::<LoadDraftResponse>();

        assert_eq!(json.draft.sender.as_deref(), Some("bot@relay.test"));
        assert_eq!(
            drafts.get().sender,
            Some(EmailAddress::new("bot@relay.test")?)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_load_draft_without_sender_field() -> TestResult {
        let drafts = Arc::new(InMemoryDraftStore::new(None));
        let state = AppState::new(drafts, MockDispatchService::new());

        let response = TestServer::new(router(state))?
            .post("/api/v1/draft")
            .json(&json!({ "subject": "Hi", "message": "<p>Body</p>" }))
            .await;

        response.assert_status_ok();

        let json = response.json::<LoadDraftResponse>();

        assert_eq!(json.draft.sender, None);
        assert_eq!(json.draft.version, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_load_draft_rejects_malformed_json() -> TestResult {
        let response = TestServer::new(router(test_state(None, None)))?
            .post("/api/v1/draft")
            .json(&json!({ "subject": 42 }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!response.json::<ErrorResponse>().error.is_empty());

        Ok(())
    }
}
