//! Recipient lists

use crate::domain::communication::email_addresses::{EmailAddress, EmailAddressError};

/// An ordered list of recipients. Duplicates are kept as given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientList(Vec<EmailAddress>);

impl RecipientList {
    /// Create a new recipient list
    pub fn new(recipients: Vec<EmailAddress>) -> Self {
        Self(recipients)
    }

    /// Parse every raw address, failing on the first invalid one
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, EmailAddressError> {
        raw.iter()
            .map(|address| EmailAddress::new(address.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Whether there is nobody to send to
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of recipients, duplicates included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The recipients in order
    pub fn as_slice(&self) -> &[EmailAddress] {
        &self.0
    }
}

impl From<Vec<EmailAddress>> for RecipientList {
    fn from(recipients: Vec<EmailAddress>) -> Self {
        Self::new(recipients)
    }
}
