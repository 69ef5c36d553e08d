//! Messages, receipts and identities exchanged with a transport

use std::collections::BTreeSet;

use crate::domain::communication::email_addresses::EmailAddress;

/// A fully composed message, ready for the relay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// The sender of the email
    pub from: EmailAddress,

    /// Every recipient, in the order given by the caller
    pub to: Vec<EmailAddress>,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html: String,

    /// The plain text alternative of the email
    pub text: String,
}

/// The relay's acknowledgment of a send
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// The `Message-ID` the message was sent with
    pub message_id: String,

    /// Recipients the relay accepted
    pub accepted: BTreeSet<EmailAddress>,

    /// Recipients the relay refused
    pub rejected: BTreeSet<EmailAddress>,

    /// A human-viewable rendering of the sent message, only offered by test relays
    pub preview_url: Option<String>,
}

/// The sender identity bound to the relay credentials
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportIdentity {
    /// The address every message is sent from
    pub address: EmailAddress,
}

impl TransportIdentity {
    /// Create a new identity
    pub fn new(address: EmailAddress) -> Self {
        Self { address }
    }
}

/// A transport together with the identity it was provisioned for
#[derive(Clone, Debug)]
pub struct Provisioned<T> {
    /// The bound sender identity
    pub identity: TransportIdentity,

    /// The ready-to-use transport
    pub transport: T,
}
