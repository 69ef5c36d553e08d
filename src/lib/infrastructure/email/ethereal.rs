//! Ethereal test-account provisioning
//!
//! Ethereal is a fake SMTP service: it accepts mail, never delivers it, and
//! offers a web preview of every message. Each process run gets a fresh
//! account from the nodemailer account API.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    domain::communication::{
        email_addresses::EmailAddress,
        transport::{ProvisionError, Provisioned, TransportIdentity, TransportProvisioner},
    },
    infrastructure::email::smtp::{RelaySettings, SmtpMailTransport, TlsMode},
};

/// Ethereal configuration
#[derive(Clone, Debug, Parser)]
pub struct EtherealConfig {
    /// Base URL of the account API
    #[arg(
        long = "ethereal-api-url",
        env = "ETHEREAL_API_URL",
        default_value = "https://api.nodemailer.com"
    )]
    pub api_url: String,
}

#[derive(Debug, Serialize)]
struct AccountRequest<'a> {
    requestor: &'a str,
    version: &'a str,
}

/// The account API's answer
#[derive(Debug, Deserialize)]
pub struct TestAccount {
    /// `success` when an account was created
    pub status: String,

    /// Why the account could not be created
    #[serde(default)]
    pub error: Option<String>,

    /// The account's address, also its SMTP username
    #[serde(default)]
    pub user: String,

    /// The SMTP password
    #[serde(default)]
    pub pass: String,

    /// Where to submit mail
    pub smtp: Option<SmtpEndpoint>,

    /// The web UI, used for message previews
    pub web: Option<String>,
}

/// An SMTP submission endpoint
#[derive(Debug, Deserialize)]
pub struct SmtpEndpoint {
    /// The relay host
    pub host: String,

    /// The relay port
    pub port: u16,

    /// Whether the port expects TLS from the first byte
    #[serde(default)]
    pub secure: bool,
}

impl TestAccount {
    /// Builds the transport for this account.
    pub fn into_provisioned(
        self,
        timeout: Duration,
    ) -> Result<Provisioned<SmtpMailTransport>, ProvisionError> {
        if self.status != "success" {
            return Err(ProvisionError::AccountCreation(anyhow!(
                "account API answered {}: {}",
                self.status,
                self.error.as_deref().unwrap_or("no reason given")
            )));
        }

        let smtp = self
            .smtp
            .ok_or_else(|| ProvisionError::AccountCreation(anyhow!("no SMTP endpoint")))?;

        let identity = TransportIdentity::new(EmailAddress::new(&self.user)?);

        let relay = RelaySettings {
            host: smtp.host,
            port: smtp.port,
            tls: if smtp.secure {
                TlsMode::Wrapper
            } else {
                TlsMode::Starttls
            },
            verify_tls: true,
            credentials: Some((self.user, self.pass)),
            timeout,
        };

        let transport =
            SmtpMailTransport::new(&relay, self.web).map_err(ProvisionError::Transport)?;

        Ok(Provisioned {
            identity,
            transport,
        })
    }
}

/// Provisions a transport backed by a freshly created Ethereal account
#[derive(Debug, Clone)]
pub struct EtherealProvisioner {
    config: EtherealConfig,
    client: reqwest::Client,
    timeout: Duration,
}

impl EtherealProvisioner {
    /// Create a new provisioner. `timeout` bounds the account request and every SMTP command.
    pub fn new(config: EtherealConfig, timeout: Duration) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn create_account(&self) -> anyhow::Result<TestAccount> {
        let url = format!("{}/user", self.config.api_url.trim_end_matches('/'));

        let account = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&AccountRequest {
                requestor: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            })
            .send()
            .await?
            .error_for_status()?
            .json::<TestAccount>()
            .await?;

        Ok(account)
    }
}

#[async_trait]
impl TransportProvisioner for EtherealProvisioner {
    type Transport = SmtpMailTransport;

    async fn provision(&self) -> Result<Provisioned<SmtpMailTransport>, ProvisionError> {
        let account = self
            .create_account()
            .await
            .map_err(ProvisionError::AccountCreation)?;

        let provisioned = account.into_provisioned(self.timeout)?;

        info!(user = %provisioned.identity.address, "Ethereal test account created");

        Ok(provisioned)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const ACCOUNT: &str = r#"{
        "status": "success",
        "user": "ila.kuhn@ethereal.email",
        "pass": "Wc5x7rBH1YaEJ8uKgu",
        "smtp": { "host": "smtp.ethereal.email", "port": 587, "secure": false },
        "imap": { "host": "imap.ethereal.email", "port": 993, "secure": true },
        "pop3": { "host": "pop3.ethereal.email", "port": 995, "secure": true },
        "web": "https://ethereal.email"
    }"#;

    #[tokio::test]
    async fn test_account_binds_identity() -> TestResult {
        let account: TestAccount = serde_json::from_str(ACCOUNT)?;

        let provisioned = account.into_provisioned(Duration::from_secs(10))?;

        assert_eq!(
            provisioned.identity.address,
            EmailAddress::new("ila.kuhn@ethereal.email")?
        );

        Ok(())
    }

    #[test]
    fn test_failed_account_is_an_error() -> TestResult {
        let account: TestAccount =
            serde_json::from_str(r#"{ "status": "error", "error": "rate limited" }"#)?;

        let result = account.into_provisioned(Duration::from_secs(10));

        assert!(matches!(
            result,
            Err(ProvisionError::AccountCreation(ref err)) if err.to_string().contains("rate limited")
        ));

        Ok(())
    }

    #[test]
    fn test_account_without_smtp_endpoint_is_an_error() -> TestResult {
        let account: TestAccount =
            serde_json::from_str(r#"{ "status": "success", "user": "a@ethereal.email" }"#)?;

        let result = account.into_provisioned(Duration::from_secs(10));

        assert!(matches!(result, Err(ProvisionError::AccountCreation(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_account_api_fails_provisioning() {
        let provisioner = EtherealProvisioner::new(
            EtherealConfig {
                api_url: "http://127.0.0.1:9".to_string(),
            },
            Duration::from_secs(2),
        );

        let result = provisioner.provision().await;

        assert!(matches!(result, Err(ProvisionError::AccountCreation(_))));
    }
}
