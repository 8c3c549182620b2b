//! IMAP connection and TLS helpers
//!
//! Provides the low-level `connect()`, `examine()` and `logout()`
//! steps the collector runs on every scrape.

use crate::config::ImapConfig;
use crate::error::{Error, Result};
use async_imap::Session;
use async_imap::imap_proto::{Response, Status};
use rustls::pki_types::ServerName;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::debug;

type ImapStream = Compat<tokio_rustls::client::TlsStream<TcpStream>>;

/// A TLS-wrapped IMAP session.
pub type ImapSession = Session<ImapStream>;

/// Build a TLS connector that accepts all certificates.
fn tls_connector() -> Result<TlsConnector> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Tls(e.to_string()))?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(DangerousVerifier))
        .with_no_client_auth();
    Ok(TlsConnector::from(Arc::new(config)))
}

/// Open a fresh TLS-wrapped IMAP session.
///
/// Connects to the configured server over TCP, performs the TLS
/// handshake straight away (implicit TLS), checks the greeting and logs
/// in. If the greeting is not an untagged OK (other than BYE), or the
/// server rejects the credentials, a LOGOUT is still sent on the
/// unauthenticated connection.
pub async fn connect(config: &ImapConfig) -> Result<ImapSession> {
    let (host, port) = config.address()?;
    debug!("Connecting to IMAP server at {}:{}", host, port);

    let tcp_stream = TcpStream::connect((host.as_str(), port)).await?;

    let connector = tls_connector()?;
    let server_name = ServerName::try_from(host.clone())
        .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

    let tls_stream = connector
        .connect(server_name, tcp_stream)
        .await
        .map_err(|e| Error::Tls(e.to_string()))?;

    let mut client = async_imap::Client::new(tls_stream.compat());

    // LOGIN is only valid in the not-authenticated state, which an
    // untagged OK greeting puts us in.
    let refused = {
        let greeting = client
            .read_response()
            .await
            .map_err(|e| Error::Imap(format!("Failed to read greeting: {e}")))?
            .ok_or_else(|| Error::Imap("Server closed the connection before greeting".into()))?;

        match greeting.parsed() {
            Response::Data {
                status: Status::Ok, ..
            } => None,
            // The server is already closing the connection.
            Response::Data {
                status: Status::Bye,
                ..
            } => {
                return Err(Error::Imap("IMAP server refused connection: BYE greeting".into()));
            }
            Response::Data { status, .. } => Some(Error::Imap(format!(
                "IMAP server in wrong state for login: {status:?} greeting"
            ))),
            other => Some(Error::Imap(format!("Unexpected greeting: {other:?}"))),
        }
    };

    if let Some(err) = refused {
        logout_client(&mut client).await;
        return Err(err);
    }

    match client.login(&config.username, &config.password).await {
        Ok(session) => {
            debug!("Logged in as {}", config.username);
            Ok(session)
        }
        Err((e, mut client)) => {
            let err = Error::Imap(format!("Login failed: {e}"));
            logout_client(&mut client).await;
            Err(err)
        }
    }
}

/// Send LOGOUT on a connection that never got a session.
async fn logout_client(client: &mut async_imap::Client<ImapStream>) {
    if let Err(e) = client.run_command_and_check_ok("LOGOUT", None).await {
        debug!("LOGOUT before login failed: {}", e);
    }
}

/// EXAMINE (read-only SELECT) a mailbox and return its message count.
///
/// `mailbox` must already be in modified UTF-7.
pub async fn examine(session: &mut ImapSession, mailbox: &str) -> Result<u32> {
    let status = session
        .examine(mailbox)
        .await
        .map_err(|e| Error::Imap(format!("Failed to examine {mailbox}: {e}")))?;
    Ok(status.exists)
}

/// Log out, ignoring failures beyond a debug line.
pub async fn logout(mut session: ImapSession) {
    if let Err(e) = session.logout().await {
        debug!("LOGOUT failed: {}", e);
    }
}

/// Certificate verifier that accepts all certificates.
#[derive(Debug)]
struct DangerousVerifier;

impl rustls::client::danger::ServerCertVerifier for DangerousVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
