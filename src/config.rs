//! Exporter configuration
//!
//! Values arrive as a loosely-typed [`Settings`] (from flags or the
//! environment) and are resolved once at startup into an
//! [`ExporterConfig`]. Empty strings are treated the same as unset.

use crate::error::{Error, Result};
use std::fmt;

pub const DEFAULT_MAILBOX: &str = "INBOX";
pub const DEFAULT_LISTEN_ADDRESS: &str = ":9117";
pub const DEFAULT_METRICS_ENDPOINT: &str = "/metrics";

/// Port used when `imap.server` carries no explicit port (IMAP over TLS).
pub const DEFAULT_IMAP_PORT: u16 = 993;

/// Raw settings as supplied on the command line or in the environment.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub imap_server: Option<String>,
    pub imap_username: Option<String>,
    pub imap_password: Option<String>,
    pub imap_mailbox: Option<String>,
    pub listen_address: Option<String>,
    pub metrics_endpoint: Option<String>,
}

impl Settings {
    /// Validate the settings and fill in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the IMAP server, username or password
    /// is missing, or if the metrics endpoint is not an absolute path.
    pub fn resolve(self) -> Result<ExporterConfig> {
        let server = non_empty(self.imap_server)
            .ok_or_else(|| Error::Config("Missing IMAP server configuration".into()))?;
        let username = non_empty(self.imap_username)
            .ok_or_else(|| Error::Config("Missing IMAP username configuration".into()))?;
        let password = non_empty(self.imap_password)
            .ok_or_else(|| Error::Config("Missing IMAP password configuration".into()))?;

        let metrics_endpoint = non_empty(self.metrics_endpoint)
            .unwrap_or_else(|| DEFAULT_METRICS_ENDPOINT.to_string());
        if !metrics_endpoint.starts_with('/') {
            return Err(Error::Config(format!(
                "Metrics endpoint must start with '/': {metrics_endpoint}"
            )));
        }

        Ok(ExporterConfig {
            imap: ImapConfig {
                server,
                username,
                password,
                mailbox: non_empty(self.imap_mailbox)
                    .unwrap_or_else(|| DEFAULT_MAILBOX.to_string()),
            },
            listen_address: non_empty(self.listen_address)
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string()),
            metrics_endpoint,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Connection settings for the single mailbox being monitored.
#[derive(Clone)]
pub struct ImapConfig {
    /// `host` or `host:port`
    pub server: String,
    pub username: String,
    pub password: String,
    pub mailbox: String,
}

impl ImapConfig {
    /// Split `server` into host and port, defaulting the port to 993.
    ///
    /// Bracketed IPv6 literals (`[::1]:993`) are unwrapped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the port is not a valid number.
    pub fn address(&self) -> Result<(String, u16)> {
        let server = self.server.as_str();

        if let Some(rest) = server.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| Error::Config(format!("Invalid IMAP server: {server}")))?;
            return match tail.strip_prefix(':') {
                Some(port) => Ok((host.to_string(), parse_port(port)?)),
                None if tail.is_empty() => Ok((host.to_string(), DEFAULT_IMAP_PORT)),
                None => Err(Error::Config(format!("Invalid IMAP server: {server}"))),
            };
        }

        match server.rsplit_once(':') {
            // More than one colon without brackets: a bare IPv6 address.
            Some((host, _)) if host.contains(':') => {
                Ok((server.to_string(), DEFAULT_IMAP_PORT))
            }
            Some((host, port)) => Ok((host.to_string(), parse_port(port)?)),
            None => Ok((server.to_string(), DEFAULT_IMAP_PORT)),
        }
    }
}

fn parse_port(port: &str) -> Result<u16> {
    port.parse()
        .map_err(|e| Error::Config(format!("Invalid IMAP server port '{port}': {e}")))
}

impl fmt::Debug for ImapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImapConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("mailbox", &self.mailbox)
            .finish()
    }
}

/// Fully resolved exporter configuration.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub imap: ImapConfig,
    pub listen_address: String,
    pub metrics_endpoint: String,
}

impl ExporterConfig {
    /// The address to bind the HTTP listener to.
    ///
    /// A bare `:port` means every interface.
    #[must_use]
    pub fn bind_address(&self) -> String {
        if self.listen_address.starts_with(':') {
            format!("0.0.0.0{}", self.listen_address)
        } else {
            self.listen_address.clone()
        }
    }
}
