//! Fake IMAP server for integration testing
//!
//! This module provides an in-process IMAP server that speaks enough
//! of the protocol to exercise the exporter's scrape end-to-end:
//!
//! TCP -> TLS handshake -> greeting -> LOGIN -> EXAMINE -> LOGOUT
//!
//! ## Module layout
//!
//! - `server` -- TCP listener, TLS setup, and connection dispatch
//! - `handlers/` -- one file per IMAP command (LOGIN, SELECT, etc.)
//! - `mailbox` -- test data model (credentials, folders, builder)
//! - `io` -- shared write helpers

mod io;

pub use mailbox::MailboxBuilder;
pub use server::FakeImapServer;
