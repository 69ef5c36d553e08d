//! Campaign draft model

use chrono::{DateTime, Utc};

use crate::domain::communication::email_addresses::EmailAddress;

/// The content an operator asks to stage
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewDraft {
    subject: String,
    message: String,
    requested_sender: Option<String>,
}

impl NewDraft {
    /// Create a new draft request
    pub fn new(subject: &str, message: &str, requested_sender: Option<&str>) -> Self {
        Self {
            subject: subject.to_string(),
            message: message.to_string(),
            requested_sender: requested_sender.map(str::to_string),
        }
    }

    /// The subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The HTML body
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The sender the caller asked for. It is never stored.
    pub fn requested_sender(&self) -> Option<&str> {
        self.requested_sender.as_deref()
    }
}

/// The single pending email staged for dispatch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    /// The subject line
    pub subject: String,

    /// The HTML body
    pub message: String,

    /// The transport-bound sender, absent until a transport identity exists
    pub sender: Option<EmailAddress>,

    /// Incremented on every load, 0 for the initial empty draft
    pub version: u64,

    /// When the draft was last loaded
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Draft {
    /// Whether both the subject and the body are present
    pub fn has_content(&self) -> bool {
        !self.subject.is_empty() && !self.message.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft_is_empty() {
        let draft = Draft::default();

        assert!(!draft.has_content());
        assert_eq!(draft.sender, None);
        assert_eq!(draft.version, 0);
    }

    #[test]
    fn test_draft_without_subject_has_no_content() {
        let draft = Draft {
            message: "<p>Body</p>".to_string(),
            ..Draft::default()
        };

        assert!(!draft.has_content());
    }

    #[test]
    fn test_new_draft_keeps_requested_sender() {
        let new_draft = NewDraft::new("Hi", "<p>Body</p>", Some("ignored@x.com"));

        assert_eq!(new_draft.requested_sender(), Some("ignored@x.com"));
    }
}
