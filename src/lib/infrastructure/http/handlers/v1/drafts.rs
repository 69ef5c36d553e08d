//! Draft handlers

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::campaigns::Draft;

pub mod get_draft;
pub mod load_draft;

/// The current draft
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DraftBody {
    /// The subject line
    #[schema(example = "Reset your password")]
    pub subject: String,

    /// The HTML body
    #[schema(example = "<p>Click here</p>")]
    pub message: String,

    /// The transport-bound sender, `null` until a transport is provisioned
    #[schema(example = "bot@relay.test")]
    pub sender: Option<String>,

    /// Incremented on every load
    #[schema(example = 1)]
    pub version: u64,
}

impl From<&Draft> for DraftBody {
    fn from(draft: &Draft) -> Self {
        Self {
            subject: draft.subject.clone(),
            message: draft.message.clone(),
            sender: draft.sender.as_ref().map(ToString::to_string),
            version: draft.version,
        }
    }
}
