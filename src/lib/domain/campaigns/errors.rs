//! Dispatch errors

use thiserror::Error;

use crate::domain::communication::transport::TransportError;

/// Errors that can occur when dispatching the current draft
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The recipient list is empty
    #[error("No recipients provided.")]
    NoRecipients,

    /// The draft has no subject or no body
    #[error("Subject and body are required.")]
    MissingContent,

    /// The draft has no sender, usually because no transport identity was bound
    #[error("Sender email not loaded. Cannot send.")]
    MissingSender,

    /// The transport failed. The source is for operators only.
    #[error("Error sending emails.")]
    Transport(#[source] TransportError),
}

impl DispatchError {
    /// Whether the caller can fix this by changing the request
    pub fn is_validation(&self) -> bool {
        !matches!(self, DispatchError::Transport(_))
    }
}

impl From<TransportError> for DispatchError {
    fn from(err: TransportError) -> Self {
        DispatchError::Transport(err)
    }
}
