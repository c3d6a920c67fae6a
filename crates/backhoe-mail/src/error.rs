//! Mail transport error types.
//!
//! Variants never carry credentials, only setting names, addresses, and the
//! transport's own reason string.

/// Errors that can occur while sending mail.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// A required transport setting is missing.
    #[error("mail transport is not configured: {setting} is not set")]
    NotConfigured { setting: &'static str },

    /// A sender or recipient address could not be parsed.
    #[error("invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The message could not be assembled.
    #[error("failed to build message: {reason}")]
    Build { reason: String },

    /// The transport failed to deliver the message.
    #[error("{reason}")]
    Transport { reason: String },
}
