//! IMAP mailbox exporter
//!
//! A Prometheus exporter for a single IMAP mailbox. Each scrape opens
//! a fresh implicit-TLS connection, logs in, EXAMINEs the configured
//! mailbox and reports two gauges:
//!
//! - `imap_up` -- whether the whole round trip succeeded
//! - `imap_messages` -- the mailbox's message count
//!
//! Certificate verification is disabled.

mod collector;
mod config;
mod connection;
mod error;
mod metrics;
mod server;

pub use collector::{ImapCollector, MailboxState};
pub use config::{
    DEFAULT_IMAP_PORT, DEFAULT_LISTEN_ADDRESS, DEFAULT_MAILBOX, DEFAULT_METRICS_ENDPOINT,
    ExporterConfig, ImapConfig, Settings,
};
pub use error::{Error, Result};
pub use metrics::{CONTENT_TYPE, Labels, render};
pub use server::{router, serve};
