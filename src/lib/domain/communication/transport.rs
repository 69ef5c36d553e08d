//! Mail transport module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::{ProvisionError, TransportError};
pub use message::{DeliveryReceipt, OutboundMessage, Provisioned, TransportIdentity};

/// A connection to an SMTP-like relay
#[async_trait]
pub trait MailTransport: Clone + Send + Sync + 'static {
    /// Send a message to all of its recipients in a single relay transaction.
    ///
    /// # Arguments
    /// * `message` - The [`OutboundMessage`] to deliver.
    ///
    /// # Returns
    /// - [`Ok`] with the relay's [`DeliveryReceipt`] if the message was accepted.
    /// - [`Err`] with a [`TransportError`] if the relay is unreachable, rejects the
    ///   credentials or rejects the message.
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, TransportError>;
}

/// Establishes relay credentials and the sender identity bound to them.
///
/// Provisioning runs once at startup. Nothing should accept dispatch requests
/// until it has succeeded.
#[async_trait]
pub trait TransportProvisioner: Send + Sync {
    /// The transport produced by a successful provisioning
    type Transport: MailTransport;

    /// Provision the transport and its identity
    async fn provision(&self) -> Result<Provisioned<Self::Transport>, ProvisionError>;
}

#[cfg(test)]
mock! {
    pub MailTransport {}

    impl Clone for MailTransport {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MailTransport for MailTransport {
        async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, TransportError>;
    }
}
