//! In-memory mail transport.
//!
//! Records every message in a `Vec` behind a `RwLock` instead of talking to a
//! server. Used by unit and route tests. A failing variant simulates a
//! rejected send (bad credentials, unreachable relay) without any network.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{MailError, Mailer, OutboundEmail, SendReceipt};

/// A mail transport that keeps messages in memory.
///
/// Cloning shares the same outbox, so a test can keep a handle while the
/// server owns another.
///
/// # Examples
///
/// ```
/// # use backhoe_mail::{Mailer, MemoryMailer, OutboundEmail};
/// # #[tokio::main]
/// # async fn main() {
/// let mailer = MemoryMailer::new();
/// let email = OutboundEmail { subject: "hi".to_owned(), html_body: "<p>x</p>".to_owned() };
/// mailer.send(&email).await.unwrap();
/// assert_eq!(mailer.sent().await.len(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryMailer {
    outbox: Arc<RwLock<Vec<OutboundEmail>>>,
    failure: Option<String>,
}

impl MemoryMailer {
    /// Create a mailer that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            outbox: Arc::new(RwLock::new(Vec::new())),
            failure: None,
        }
    }

    /// Create a mailer that rejects every message with `reason`.
    ///
    /// Rejected messages are still recorded so tests can count attempts.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outbox: Arc::new(RwLock::new(Vec::new())),
            failure: Some(reason.into()),
        }
    }

    /// Every message handed to this mailer, in order.
    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.outbox.read().await.clone()
    }
}

impl Default for MemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Mailer for MemoryMailer {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "memory"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError> {
        let mut outbox = self.outbox.write().await;
        outbox.push(email.clone());

        if let Some(reason) = &self.failure {
            return Err(MailError::Transport {
                reason: reason.clone(),
            });
        }

        Ok(SendReceipt {
            reply: format!("memory-{}", outbox.len()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(subject: &str) -> OutboundEmail {
        OutboundEmail {
            subject: subject.to_owned(),
            html_body: "<p>body</p>".to_owned(),
        }
    }

    #[tokio::test]
    async fn records_messages_in_order() {
        let mailer = MemoryMailer::new();
        mailer.send(&email("first")).await.unwrap();
        let receipt = mailer.send(&email("second")).await.unwrap();

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "first");
        assert_eq!(sent[1].subject, "second");
        assert_eq!(receipt.reply, "memory-2");
    }

    #[tokio::test]
    async fn clones_share_the_outbox() {
        let mailer = MemoryMailer::new();
        let handle = mailer.clone();
        mailer.send(&email("shared")).await.unwrap();
        assert_eq!(handle.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn failing_mailer_rejects_but_records() {
        let mailer = MemoryMailer::failing("Invalid login: 535 authentication failed");
        let err = mailer.send(&email("x")).await.unwrap_err();

        assert!(matches!(err, MailError::Transport { .. }));
        assert_eq!(err.to_string(), "Invalid login: 535 authentication failed");
        assert_eq!(mailer.sent().await.len(), 1);
    }
}
