//! Server configuration for Backhoe.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Site settings use `BACKHOE_*` variables; the mail relay keeps the
//! `EMAIL_*` and `RENTAL_EMAIL` names the deployment already uses.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use backhoe_core::lead::MailFailurePolicy;
use backhoe_core::topology::TopologySource;
use backhoe_mail::{DEFAULT_SMTP_PORT, SmtpConfig};

const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Where the state boundaries are loaded from at startup.
    pub topology: TopologySource,
    /// Directory served under `/images`.
    pub public_dir: PathBuf,
    /// Service-area data file; `None` uses the bundled copy.
    pub service_areas_file: Option<PathBuf>,
    /// What the dialogs show when the mail relay fails.
    pub failure_policy: MailFailurePolicy,
    /// Outbound mail relay.
    pub mail: SmtpConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on, on `0.0.0.0`
    /// - `BACKHOE_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:3000`)
    /// - `BACKHOE_LOG_LEVEL`: log filter (default: `info`)
    /// - `BACKHOE_TOPOLOGY_URL`: topology document URL (default: us-atlas states-10m)
    /// - `BACKHOE_TOPOLOGY_FILE`: local topology file (overrides the URL)
    /// - `BACKHOE_PUBLIC_DIR`: static image directory (default: `./public`)
    /// - `BACKHOE_SERVICE_AREAS_FILE`: states-to-cities JSON (default: bundled)
    /// - `BACKHOE_CONFIRM_ON_MAIL_FAILURE`: show the thank-you view even when sending fails (default: `false`)
    /// - `EMAIL_HOST`, `EMAIL_PORT` (default `587`), `EMAIL_SECURE`, `EMAIL_USER`, `EMAIL_PASS`, `RENTAL_EMAIL`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Priority: BACKHOE_BIND_ADDR > PORT > default 127.0.0.1:3000
        let bind_addr = if let Some(addr) = lookup("BACKHOE_BIND_ADDR") {
            addr.parse().unwrap_or(DEFAULT_BIND)
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port.parse().unwrap_or(DEFAULT_BIND.port());
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            DEFAULT_BIND
        };

        let log_level = lookup("BACKHOE_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let topology = match (lookup("BACKHOE_TOPOLOGY_FILE"), lookup("BACKHOE_TOPOLOGY_URL")) {
            (Some(path), _) => TopologySource::File(PathBuf::from(path)),
            (None, Some(url)) => TopologySource::Url(url),
            (None, None) => TopologySource::default(),
        };

        let public_dir = lookup("BACKHOE_PUBLIC_DIR").map_or_else(|| PathBuf::from("./public"), PathBuf::from);

        let service_areas_file = lookup("BACKHOE_SERVICE_AREAS_FILE").map(PathBuf::from);

        let failure_policy = if lookup("BACKHOE_CONFIRM_ON_MAIL_FAILURE").is_some_and(|v| truthy(&v)) {
            MailFailurePolicy::ConfirmAnyway
        } else {
            MailFailurePolicy::ShowError
        };

        let mail = SmtpConfig {
            host: lookup("EMAIL_HOST").filter(|v| !v.is_empty()),
            port: lookup("EMAIL_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            secure: lookup("EMAIL_SECURE").is_some_and(|v| v == "true"),
            user: lookup("EMAIL_USER").filter(|v| !v.is_empty()),
            pass: lookup("EMAIL_PASS"),
            recipient: lookup("RENTAL_EMAIL").filter(|v| !v.is_empty()),
        };

        Self {
            bind_addr,
            log_level,
            topology,
            public_dir,
            service_areas_file,
            failure_policy,
            mail,
        }
    }
}

fn truthy(value: &str) -> bool {
    value == "true" || value == "1"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use backhoe_core::topology::DEFAULT_TOPOLOGY_URL;

    fn config(pairs: &[(&str, &str)]) -> ServerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.topology, TopologySource::Url(DEFAULT_TOPOLOGY_URL.to_owned()));
        assert_eq!(cfg.public_dir, PathBuf::from("./public"));
        assert!(cfg.service_areas_file.is_none());
        assert_eq!(cfg.failure_policy, MailFailurePolicy::ShowError);
        assert_eq!(cfg.mail.port, 587);
        assert!(!cfg.mail.secure);
        assert!(cfg.mail.host.is_none());
    }

    #[test]
    fn bind_addr_beats_port() {
        assert_eq!(config(&[("PORT", "8080")]).bind_addr, "0.0.0.0:8080".parse().unwrap());
        let both = config(&[("PORT", "8080"), ("BACKHOE_BIND_ADDR", "10.0.0.1:9000")]);
        assert_eq!(both.bind_addr, "10.0.0.1:9000".parse().unwrap());
        let garbage = config(&[("BACKHOE_BIND_ADDR", "nowhere")]);
        assert_eq!(garbage.bind_addr, DEFAULT_BIND);
    }

    #[test]
    fn topology_file_overrides_url() {
        let cfg = config(&[
            ("BACKHOE_TOPOLOGY_URL", "https://example.com/us.json"),
            ("BACKHOE_TOPOLOGY_FILE", "/srv/us.json"),
        ]);
        assert_eq!(cfg.topology, TopologySource::File(PathBuf::from("/srv/us.json")));
        let url = config(&[("BACKHOE_TOPOLOGY_URL", "https://example.com/us.json")]);
        assert_eq!(url.topology, TopologySource::Url("https://example.com/us.json".to_owned()));
    }

    #[test]
    fn mail_settings_come_from_email_vars() {
        let cfg = config(&[
            ("EMAIL_HOST", "smtp.example.com"),
            ("EMAIL_PORT", "465"),
            ("EMAIL_SECURE", "true"),
            ("EMAIL_USER", "rentals@example.com"),
            ("EMAIL_PASS", "hunter2"),
            ("RENTAL_EMAIL", "desk@example.com"),
        ]);
        assert_eq!(cfg.mail.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(cfg.mail.port, 465);
        assert!(cfg.mail.secure);
        assert_eq!(cfg.mail.recipient.as_deref(), Some("desk@example.com"));
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }

    #[test]
    fn only_literal_true_enables_implicit_tls() {
        assert!(!config(&[("EMAIL_SECURE", "1")]).mail.secure);
        assert!(!config(&[("EMAIL_SECURE", "TRUE")]).mail.secure);
    }

    #[test]
    fn failure_policy_flag() {
        let cfg = config(&[("BACKHOE_CONFIRM_ON_MAIL_FAILURE", "1")]);
        assert_eq!(cfg.failure_policy, MailFailurePolicy::ConfirmAnyway);
        let off = config(&[("BACKHOE_CONFIRM_ON_MAIL_FAILURE", "no")]);
        assert_eq!(off.failure_policy, MailFailurePolicy::ShowError);
    }
}
