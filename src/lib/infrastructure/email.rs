//! Mail transport adapters and their startup configuration

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::domain::communication::transport::{ProvisionError, Provisioned, TransportProvisioner};

pub mod ethereal;
pub mod smtp;

use ethereal::{EtherealConfig, EtherealProvisioner};
use smtp::{SmtpConfig, SmtpMailTransport, StaticSmtpProvisioner};

/// Where the relay credentials come from
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransportMode {
    /// Create a throwaway Ethereal account at startup
    Ethereal,

    /// Use the configured SMTP relay
    Smtp,
}

/// Mail transport configuration
#[derive(Clone, Debug, Parser)]
pub struct TransportConfig {
    /// Where the relay credentials come from
    #[arg(
        long = "mail-transport",
        env = "MAIL_TRANSPORT",
        value_enum,
        default_value_t = TransportMode::Ethereal
    )]
    pub mode: TransportMode,

    /// Seconds a whole relay transaction may take
    #[arg(
        long = "smtp-send-timeout-secs",
        env = "SMTP_SEND_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub send_timeout_secs: u64,

    /// SMTP relay settings
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// Ethereal account settings
    #[clap(flatten)]
    pub ethereal: EtherealConfig,
}

impl TransportConfig {
    /// The bound on a single dispatch's relay transaction
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Provisions the configured transport. Call once, before serving requests.
    pub async fn provision(&self) -> Result<Provisioned<SmtpMailTransport>, ProvisionError> {
        match self.mode {
            TransportMode::Smtp => {
                StaticSmtpProvisioner::new(self.smtp.clone())
                    .provision()
                    .await
            }
            TransportMode::Ethereal => {
                EtherealProvisioner::new(self.ethereal.clone(), self.smtp.connect_timeout())
                    .provision()
                    .await
            }
        }
    }
}
