//! Mailbox collector
//!
//! Every call to [`ImapCollector::collect`] opens its own connection,
//! so concurrent scrapes never share IMAP state.

use crate::config::ImapConfig;
use crate::connection;
use crate::error::Result;
use tracing::{debug, error};

/// Outcome of a single scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MailboxState {
    pub up: bool,
    pub messages: u32,
}

impl MailboxState {
    /// The result reported when any step of the scrape fails.
    #[must_use]
    pub const fn down() -> Self {
        Self {
            up: false,
            messages: 0,
        }
    }
}

/// Reads the message count of one configured mailbox.
pub struct ImapCollector {
    config: ImapConfig,
    /// `config.mailbox` in modified UTF-7, as sent on the wire.
    wire_mailbox: String,
}

impl ImapCollector {
    #[must_use]
    pub fn new(config: ImapConfig) -> Self {
        let wire_mailbox = utf7_imap::encode_utf7_imap(config.mailbox.clone());
        Self {
            config,
            wire_mailbox,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ImapConfig {
        &self.config
    }

    /// Run one scrape, mapping any failure to [`MailboxState::down`].
    pub async fn collect(&self) -> MailboxState {
        match self.try_collect().await {
            Ok(messages) => MailboxState { up: true, messages },
            Err(e) => {
                error!(
                    mailbox = %self.config.mailbox,
                    server = %self.config.server,
                    "Scrape failed: {}",
                    e
                );
                MailboxState::down()
            }
        }
    }

    /// Connect, log in, EXAMINE the mailbox and log out.
    ///
    /// Logout is attempted whether or not the EXAMINE succeeded; its
    /// own failure does not affect the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, login, or EXAMINE fails.
    pub async fn try_collect(&self) -> Result<u32> {
        let mut session = connection::connect(&self.config).await?;

        let result = connection::examine(&mut session, &self.wire_mailbox).await;
        connection::logout(session).await;

        if let Ok(messages) = result {
            debug!("{} has {} messages", self.config.mailbox, messages);
        }
        result
    }
}
