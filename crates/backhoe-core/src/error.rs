//! Error types for `backhoe-core`.
//!
//! Each variant carries enough context to diagnose the problem from a log
//! line alone: the URL or path involved, the object name, or the arc index.

use backhoe_mail::MailError;

/// Errors from loading or decoding a topology document.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// The HTTP request for the document failed.
    #[error("failed to fetch topology from '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// Reading a local topology file failed.
    #[error("failed to read topology file '{path}': {reason}")]
    Read { path: String, reason: String },

    /// The document is not valid TopoJSON.
    #[error("invalid topology document: {reason}")]
    Decode { reason: String },

    /// The expected object (e.g. `states`) is not in the document.
    #[error("topology has no object named '{name}'")]
    MissingObject { name: String },

    /// A geometry references an arc that does not exist.
    #[error("arc index {index} out of range ({count} arcs)")]
    InvalidArc { index: i64, count: usize },
}

/// Errors from forwarding a lead.
#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    /// The mail transport rejected or failed to send the message.
    #[error("{0}")]
    Mail(#[from] MailError),
}

/// Errors from loading the service-area directory.
#[derive(Debug, thiserror::Error)]
pub enum ServiceAreaError {
    /// Reading the data file failed.
    #[error("failed to read service areas from '{path}': {reason}")]
    Read { path: String, reason: String },

    /// The data is not a JSON object of state name to city list.
    #[error("invalid service area data: {reason}")]
    Parse { reason: String },

    /// A state name does not give a usable URL slug.
    #[error("state '{state}' has slug '{slug}'; slugs must be non-empty and use only a-z, 0-9 and '-'")]
    InvalidSlug { state: String, slug: String },

    /// Two state names give the same slug.
    #[error("states '{first}' and '{second}' share the slug '{slug}'")]
    DuplicateSlug {
        first: String,
        second: String,
        slug: String,
    },
}
