//! Dispatch service module

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, error, info};

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    campaigns::{errors::DispatchError, strip_tags, DraftStore, RecipientList},
    communication::transport::{DeliveryReceipt, MailTransport, OutboundMessage, TransportError},
};

/// Message reported after a successful dispatch
pub const SENT_MESSAGE: &str = "Email sent to recipients.";

/// How long a single relay transaction may take when no timeout is configured
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// The outcome of a dispatch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchReport {
    /// Whether the relay accepted the message
    pub success: bool,

    /// A message for the operator
    pub message: String,

    /// The relay's receipt, present on success
    pub receipt: Option<DeliveryReceipt>,
}

impl DispatchReport {
    /// A report for a message the relay accepted
    pub fn sent(receipt: DeliveryReceipt) -> Self {
        Self {
            success: true,
            message: SENT_MESSAGE.to_string(),
            receipt: Some(receipt),
        }
    }

    /// The preview link offered by test relays
    pub fn preview_url(&self) -> Option<&str> {
        self.receipt.as_ref()?.preview_url.as_deref()
    }
}

impl From<&DispatchError> for DispatchReport {
    fn from(err: &DispatchError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            receipt: None,
        }
    }
}

/// Dispatch service
#[async_trait]
pub trait DispatchService: Clone + Send + Sync + 'static {
    /// Sends the current draft to every recipient in one relay transaction.
    ///
    /// Recipients are checked first, then the draft's subject and body, then its
    /// sender. The draft is read once, at entry, so a concurrent load does not
    /// affect a dispatch already in progress.
    ///
    /// # Arguments
    /// * `recipients` - The [`RecipientList`] to send to.
    ///
    /// # Returns
    /// - [`Ok`] with a successful [`DispatchReport`] if the relay accepted the message.
    /// - [`Err`] with a [`DispatchError`] if validation or the transport failed.
    async fn dispatch(&self, recipients: &RecipientList) -> Result<DispatchReport, DispatchError>;
}

#[cfg(test)]
mock! {
    pub DispatchService {}

    impl Clone for DispatchService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl DispatchService for DispatchService {
        async fn dispatch(&self, recipients: &RecipientList) -> Result<DispatchReport, DispatchError>;
    }
}

/// Dispatch service implementation
#[derive(Clone)]
pub struct DispatchServiceImpl<D, T>
where
    D: DraftStore,
    T: MailTransport,
{
    drafts: Arc<D>,
    transport: Arc<T>,
    send_timeout: Duration,
}

impl<D, T> DispatchServiceImpl<D, T>
where
    D: DraftStore,
    T: MailTransport,
{
    /// Creates a new dispatch service with the default send timeout.
    pub fn new(drafts: Arc<D>, transport: Arc<T>) -> Self {
        Self {
            drafts,
            transport,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Bounds every relay transaction by `send_timeout`.
    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }
}

impl<D, T> fmt::Debug for DispatchServiceImpl<D, T>
where
    D: DraftStore,
    T: MailTransport,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchServiceImpl")
            .field("drafts", &"DraftStore")
            .field("transport", &"MailTransport")
            .field("send_timeout", &self.send_timeout)
            .finish()
    }
}

#[async_trait]
impl<D, T> DispatchService for DispatchServiceImpl<D, T>
where
    D: DraftStore,
    T: MailTransport,
{
    async fn dispatch(&self, recipients: &RecipientList) -> Result<DispatchReport, DispatchError> {
        if recipients.is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        let draft = self.drafts.get();

        if !draft.has_content() {
            return Err(DispatchError::MissingContent);
        }

        let sender = draft.sender.clone().ok_or(DispatchError::MissingSender)?;

        let message = OutboundMessage {
            from: sender,
            to: recipients.as_slice().to_vec(),
            subject: draft.subject.clone(),
            html: draft.message.clone(),
            text: strip_tags(&draft.message),
        };

        debug!(
            version = draft.version,
            recipients = recipients.len(),
            "dispatching draft"
        );

        let receipt = match timeout(self.send_timeout, self.transport.send(&message)).await {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(err)) => {
                error!(error = %err, "failed to send emails");
                return Err(err.into());
            }
            Err(_) => {
                let err = TransportError::Timeout(self.send_timeout);
                error!(error = %err, "failed to send emails");
                return Err(err.into());
            }
        };

        info!(
            message_id = %receipt.message_id,
            accepted = receipt.accepted.len(),
            rejected = receipt.rejected.len(),
            preview_url = ?receipt.preview_url,
            "emails sent"
        );

        Ok(DispatchReport::sent(receipt))
    }
}
