//! Email addresses and the mail transport boundary

pub mod email_addresses;
pub mod transport;
