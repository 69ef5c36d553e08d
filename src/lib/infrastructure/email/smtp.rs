//! SMTP mail transport implementation

use std::{collections::BTreeSet, fmt, sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use clap::{ArgAction, Parser, ValueEnum};
use lettre::{
    address::AddressError,
    message::{Mailbox, MultiPart},
    transport::smtp::{
        self,
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    transport::{
        DeliveryReceipt, MailTransport, OutboundMessage, ProvisionError, Provisioned,
        TransportError, TransportIdentity, TransportProvisioner,
    },
};

/// How the connection to the relay is secured
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TlsMode {
    /// Plain connection upgraded with STARTTLS, which must succeed
    Starttls,

    /// TLS from the first byte
    Wrapper,

    /// No TLS at all
    #[value(name = "none")]
    Plain,
}

/// SMTP configuration
#[derive(Clone, Debug, Parser)]
pub struct SmtpConfig {
    /// The SMTP host
    #[arg(long = "smtp-host", env = "SMTP_HOST")]
    pub host: Option<String>,

    /// The SMTP port
    #[arg(long = "smtp-port", env = "SMTP_PORT", default_value_t = 587)]
    pub port: u16,

    /// The SMTP username
    #[arg(long = "smtp-user", env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password
    #[arg(long = "smtp-password", env = "SMTP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// The sender email address bound to these credentials
    #[arg(long = "smtp-sender", env = "SMTP_SENDER")]
    pub sender: Option<String>,

    /// How the connection is secured
    #[arg(long = "smtp-tls", env = "SMTP_TLS", value_enum, default_value_t = TlsMode::Starttls)]
    pub tls: TlsMode,

    /// Verify the TLS certificate
    #[arg(
        long = "smtp-verify-tls",
        env = "SMTP_VERIFY_TLS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub verify_tls: bool,

    /// Base URL of the relay's web preview, if it offers one
    #[arg(long = "smtp-preview-url", env = "SMTP_PREVIEW_URL")]
    pub preview_url: Option<String>,

    /// Seconds to wait for the relay to answer each command
    #[arg(
        long = "smtp-connect-timeout-secs",
        env = "SMTP_CONNECT_TIMEOUT_SECS",
        default_value_t = 10
    )]
    pub connect_timeout_secs: u64,
}

impl SmtpConfig {
    /// The per-command timeout
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Everything needed to open a relay connection
#[derive(Clone)]
pub struct RelaySettings {
    /// The relay host
    pub host: String,

    /// The relay port
    pub port: u16,

    /// How the connection is secured
    pub tls: TlsMode,

    /// Verify the relay's certificate
    pub verify_tls: bool,

    /// Username and password, if the relay requires authentication
    pub credentials: Option<(String, String)>,

    /// The per-command timeout
    pub timeout: Duration,
}

impl fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("verify_tls", &self.verify_tls)
            .field(
                "username",
                &self.credentials.as_ref().map(|(username, _)| username),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// SMTP mail transport
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    preview_base: Option<String>,
}

impl fmt::Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailTransport")
            .field("preview_base", &self.preview_base)
            .finish_non_exhaustive()
    }
}

impl SmtpMailTransport {
    /// Create a new SMTP transport. No connection is opened until the first send.
    pub fn new(relay: &RelaySettings, preview_base: Option<String>) -> Result<Self> {
        let tls = match relay.tls {
            TlsMode::Plain => Tls::None,
            TlsMode::Starttls => Tls::Required(tls_parameters(relay)?),
            TlsMode::Wrapper => Tls::Wrapper(tls_parameters(relay)?),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&relay.host)
            .port(relay.port)
            .tls(tls)
            .timeout(Some(relay.timeout));

        if let Some((username, password)) = &relay.credentials {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: Arc::new(builder.build()),
            preview_base,
        })
    }
}

fn tls_parameters(relay: &RelaySettings) -> Result<TlsParameters> {
    Ok(TlsParameters::builder(relay.host.clone())
        .dangerous_accept_invalid_certs(!relay.verify_tls)
        .build()?)
}

/// Composes the lettre message, returning it with the `Message-ID` it carries.
fn build_message(message: &OutboundMessage) -> Result<(String, Message), TransportError> {
    let message_id = format!("<{}@{}>", Uuid::now_v7(), message.from.domain());

    let mut builder = Message::builder()
        .from(mailbox(&message.from)?)
        .subject(message.subject.clone())
        .message_id(Some(message_id.clone()));

    for recipient in &message.to {
        builder = builder.to(mailbox(recipient)?);
    }

    let email = builder.multipart(MultiPart::alternative_plain_html(
        message.text.clone(),
        message.html.clone(),
    ))?;

    Ok((message_id, email))
}

fn mailbox(address: &EmailAddress) -> Result<Mailbox, TransportError> {
    Ok(address.as_str().parse()?)
}

/// Finds the relay's message id in a final response such as
/// `250 Accepted [STATUS=new MSGID=Yx1...]` and turns it into a preview link.
pub fn preview_url<'a>(base: &str, lines: impl IntoIterator<Item = &'a str>) -> Option<String> {
    lines.into_iter().find_map(|line| {
        let (_, status) = line.trim_end().strip_suffix(']')?.rsplit_once('[')?;
        let id = status
            .split_whitespace()
            .find_map(|field| field.strip_prefix("MSGID="))?;

        Some(format!("{}/message/{}", base.trim_end_matches('/'), id))
    })
}

impl From<AddressError> for TransportError {
    fn from(err: AddressError) -> Self {
        TransportError::InvalidMessage(err.to_string())
    }
}

impl From<lettre::error::Error> for TransportError {
    fn from(err: lettre::error::Error) -> Self {
        TransportError::InvalidMessage(err.to_string())
    }
}

impl From<smtp::Error> for TransportError {
    fn from(err: smtp::Error) -> Self {
        if !err.is_permanent() {
            return TransportError::Unreachable(err.into());
        }

        match err.status() {
            Some(code) if code.to_string() == "535" => {
                TransportError::AuthenticationRejected(err.to_string())
            }
            _ => TransportError::MessageRejected(err.to_string()),
        }
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, TransportError> {
        let (message_id, email) = build_message(message)?;

        let response = self.transport.send(email).await?;

        debug!(code = %response.code(), %message_id, "relay accepted message");

        Ok(DeliveryReceipt {
            message_id,
            accepted: message.to.iter().cloned().collect(),
            rejected: BTreeSet::new(),
            preview_url: self
                .preview_base
                .as_deref()
                .and_then(|base| preview_url(base, response.message())),
        })
    }
}

/// Provisions a transport from statically configured relay credentials
#[derive(Debug, Clone)]
pub struct StaticSmtpProvisioner {
    config: SmtpConfig,
}

impl StaticSmtpProvisioner {
    /// Create a new provisioner
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TransportProvisioner for StaticSmtpProvisioner {
    type Transport = SmtpMailTransport;

    async fn provision(&self) -> Result<Provisioned<SmtpMailTransport>, ProvisionError> {
        let host = self
            .config
            .host
            .clone()
            .ok_or(ProvisionError::MissingConfig("SMTP_HOST"))?;

        let sender = self
            .config
            .sender
            .as_deref()
            .ok_or(ProvisionError::MissingConfig("SMTP_SENDER"))?;

        let identity = TransportIdentity::new(EmailAddress::new(sender)?);

        let relay = RelaySettings {
            host,
            port: self.config.port,
            tls: self.config.tls,
            verify_tls: self.config.verify_tls,
            credentials: self
                .config
                .username
                .clone()
                .zip(self.config.password.clone()),
            timeout: self.config.connect_timeout(),
        };

        let transport = SmtpMailTransport::new(&relay, self.config.preview_url.clone())
            .map_err(ProvisionError::Transport)?;

        info!(sender = %identity.address, host = %relay.host, port = relay.port, "SMTP transport ready");

        Ok(Provisioned {
            identity,
            transport,
        })
    }
}
