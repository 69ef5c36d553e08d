//! Transport errors

use std::time::Duration;

use thiserror::Error;

use crate::domain::communication::email_addresses::EmailAddressError;

/// Errors raised while sending through a relay
#[derive(Debug, Error)]
pub enum TransportError {
    /// The relay could not be reached or the connection failed mid-transaction
    #[error("mail relay unreachable: {0}")]
    Unreachable(#[source] anyhow::Error),

    /// The relay refused the credentials
    #[error("mail relay rejected authentication: {0}")]
    AuthenticationRejected(String),

    /// The relay refused the envelope or the message
    #[error("mail relay rejected the message: {0}")]
    MessageRejected(String),

    /// The message could not be composed
    #[error("message could not be built: {0}")]
    InvalidMessage(String),

    /// The relay did not answer in time
    #[error("mail relay did not respond within {0:?}")]
    Timeout(Duration),
}

/// Errors raised while provisioning a transport at startup
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A required setting is absent
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// The sender identity is not a usable address
    #[error("invalid sender identity: {0}")]
    InvalidIdentity(#[from] EmailAddressError),

    /// The test account could not be created
    #[error("could not create test account: {0}")]
    AccountCreation(#[source] anyhow::Error),

    /// The transport could not be built
    #[error("could not build transport: {0}")]
    Transport(#[source] anyhow::Error),
}
