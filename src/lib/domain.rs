//! Domain logic, independent of HTTP and SMTP

pub mod campaigns;
pub mod communication;
