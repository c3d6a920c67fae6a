//! SMTP mail transport backed by `lettre`.
//!
//! A transport is assembled from [`SmtpConfig`] on every send, so a
//! misconfigured relay surfaces as a per-request error rather than a startup
//! failure. `secure = true` means implicit TLS (usually port 465); otherwise
//! the connection upgrades with STARTTLS when the server offers it.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::{MailError, Mailer, OutboundEmail, SendReceipt};

/// Display name used in the `From` header.
const SENDER_NAME: &str = "Equipment Rental";

/// Default submission port when none is configured.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP relay settings.
#[derive(Clone, Default)]
pub struct SmtpConfig {
    /// Relay host name (`EMAIL_HOST`).
    pub host: Option<String>,
    /// Relay port (`EMAIL_PORT`).
    pub port: u16,
    /// Implicit TLS instead of STARTTLS (`EMAIL_SECURE`).
    pub secure: bool,
    /// Login user; also the sender address (`EMAIL_USER`).
    pub user: Option<String>,
    /// Login password (`EMAIL_PASS`).
    pub pass: Option<String>,
    /// Fixed recipient of every message (`RENTAL_EMAIL`).
    pub recipient: Option<String>,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "[redacted]"))
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Sends mail through an SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create a mailer for the given relay settings.
    #[must_use]
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Whether every setting needed to attempt a send is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.host.is_some() && self.config.user.is_some() && self.config.recipient.is_some()
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let host = self
            .config
            .host
            .as_deref()
            .ok_or(MailError::NotConfigured { setting: "EMAIL_HOST" })?;

        let tls_params = TlsParameters::new(host.to_owned()).map_err(|e| MailError::Transport {
            reason: format!("TLS setup for '{host}' failed: {e}"),
        })?;
        let tls = if self.config.secure {
            Tls::Wrapper(tls_params)
        } else {
            Tls::Opportunistic(tls_params)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(self.config.port)
            .tls(tls);

        if let Some(user) = &self.config.user {
            builder = builder.credentials(Credentials::new(
                user.clone(),
                self.config.pass.clone().unwrap_or_default(),
            ));
        }

        Ok(builder.build())
    }

    fn message(&self, email: &OutboundEmail) -> Result<Message, MailError> {
        let user = self
            .config
            .user
            .as_deref()
            .ok_or(MailError::NotConfigured { setting: "EMAIL_USER" })?;
        let recipient = self
            .config
            .recipient
            .as_deref()
            .ok_or(MailError::NotConfigured { setting: "RENTAL_EMAIL" })?;

        let from = Mailbox::new(Some(SENDER_NAME.to_owned()), parse_address(user)?);
        let to = Mailbox::new(None, parse_address(recipient)?);

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| MailError::Build {
                reason: e.to_string(),
            })
    }
}

fn parse_address(raw: &str) -> Result<Address, MailError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| MailError::InvalidAddress {
            address: raw.to_owned(),
            reason: e.to_string(),
        })
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError> {
        let message = self.message(email)?;
        let transport = self.transport()?;

        let response = transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport {
                reason: e.to_string(),
            })?;

        let reply = response
            .message()
            .next()
            .map_or_else(|| response.code().to_string(), ToString::to_string);
        debug!(code = %response.code(), "SMTP relay accepted message");

        Ok(SendReceipt { reply })
    }
}
