#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Prometheus exporter for a single IMAP mailbox

use clap::Parser;
use imap_mailbox_exporter::Settings;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Every flag falls back to its environment variable when not given.
#[derive(Parser)]
#[command(name = "imap-mailbox-exporter")]
#[command(about = "Export the message count of an IMAP mailbox to Prometheus")]
struct Args {
    /// IMAP server to query (host or host:port)
    #[arg(long = "imap.server", env = "IMAP_SERVER", value_name = "HOST[:PORT]")]
    imap_server: Option<String>,

    /// IMAP username for login
    #[arg(long = "imap.username", env = "IMAP_USERNAME")]
    imap_username: Option<String>,

    /// IMAP password for login
    #[arg(long = "imap.password", env = "IMAP_PASSWORD", hide_env_values = true)]
    imap_password: Option<String>,

    /// IMAP mailbox to query [default: INBOX]
    #[arg(long = "imap.mailbox", env = "IMAP_MAILBOX")]
    imap_mailbox: Option<String>,

    /// Address to listen on for HTTP requests [default: :9117]
    #[arg(long = "listen.address", env = "LISTEN_ADDRESS")]
    listen_address: Option<String>,

    /// Path under which to expose metrics [default: /metrics]
    #[arg(long = "metrics.endpoint", env = "METRICS_ENDPOINT")]
    metrics_endpoint: Option<String>,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Self {
            imap_server: args.imap_server,
            imap_username: args.imap_username,
            imap_password: args.imap_password,
            imap_mailbox: args.imap_mailbox,
            listen_address: args.listen_address,
            metrics_endpoint: args.metrics_endpoint,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Settings::from(args).resolve().inspect_err(|e| error!("{}", e))?;

    imap_mailbox_exporter::serve(config)
        .await
        .inspect_err(|e| error!("{}", e))?;

    Ok(())
}
