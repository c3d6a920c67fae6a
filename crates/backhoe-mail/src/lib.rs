//! Mail transport abstraction for Backhoe.
//!
//! This crate defines the [`Mailer`] trait, a single-shot outbound mail
//! interface that knows nothing about rental requests or page rendering. The
//! lead service in `backhoe-core` composes the message and hands it to a
//! mailer; the mailer decides sender, recipient, and wire protocol.
//!
//! Two implementations are provided:
//!
//! - [`SmtpMailer`]: production default, SMTP via `lettre` (feature `smtp-transport`)
//! - [`MemoryMailer`]: in-memory, records every message, for tests and dry runs

mod error;
mod memory;
#[cfg(feature = "smtp-transport")]
mod smtp;

pub use error::MailError;
pub use memory::MemoryMailer;
#[cfg(feature = "smtp-transport")]
pub use smtp::{DEFAULT_SMTP_PORT, SmtpConfig, SmtpMailer};

use serde::Serialize;

/// A fully composed outbound message.
///
/// Sender and recipient are not part of the message: they are fixed by the
/// transport's configuration so callers cannot redirect mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// What the transport reported after accepting a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Transport-specific acknowledgement (SMTP reply, or a synthetic id).
    pub reply: String,
}

/// A pluggable outbound mail transport.
///
/// Each call is one best-effort attempt: no retry, no queueing. Implementations
/// must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Short transport name for logs.
    fn name(&self) -> &str;

    /// Send a single message to the configured recipient.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::NotConfigured`] when a required setting is
    /// missing, [`MailError::InvalidAddress`] or [`MailError::Build`] when the
    /// message cannot be assembled, and [`MailError::Transport`] when the
    /// server rejects or cannot be reached.
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError>;
}
