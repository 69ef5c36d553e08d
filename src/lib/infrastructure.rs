//! Adapters for the outside world: SMTP relays and the HTTP API

pub mod email;
pub mod http;
