//! Prometheus text exposition
//!
//! Renders a [`MailboxState`] as two gauge families in text format
//! 0.0.4. Families are emitted sorted by name.

use crate::collector::MailboxState;
use std::fmt::Write;

/// Content type of the rendered exposition.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Constant labels attached to every series.
#[derive(Debug, Clone)]
pub struct Labels {
    pub mailbox: String,
    pub username: String,
}

impl Labels {
    fn render(&self) -> String {
        format!(
            "{{mailbox=\"{}\",username=\"{}\"}}",
            escape_label_value(&self.mailbox),
            escape_label_value(&self.username)
        )
    }
}

/// Render the two `imap_*` gauges for one scrape.
#[must_use]
pub fn render(state: MailboxState, labels: &Labels) -> String {
    let labels = labels.render();
    let mut out = String::new();

    gauge(
        &mut out,
        "imap_messages",
        "Current number of messages in mailbox",
        &labels,
        f64::from(state.messages),
    );
    gauge(
        &mut out,
        "imap_up",
        "IMAP server is accessible and up",
        &labels,
        if state.up { 1.0 } else { 0.0 },
    );

    out
}

fn gauge(out: &mut String, name: &str, help: &str, labels: &str, value: f64) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} gauge");
    let _ = writeln!(out, "{name}{labels} {value}");
}

fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
