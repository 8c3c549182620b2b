//! LOGIN command handler.
//!
//! Credentials are checked against the test mailbox. A rejected login
//! leaves the connection open in the not-authenticated state, the way
//! real servers behave, so the client can still LOGOUT.

use crate::fake_imap::io::write_line;
use crate::fake_imap::mailbox::Mailbox;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the LOGIN command. Returns whether the client is now
/// authenticated.
pub async fn handle_login<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    username: &[u8],
    password: &[u8],
    mailbox: &Mailbox,
    stream: &mut BufReader<S>,
) -> bool {
    let authenticated = mailbox.accepts(username, password);
    let resp = if authenticated {
        format!("{tag} OK LOGIN completed\r\n")
    } else {
        format!("{tag} NO [AUTHENTICATIONFAILED] Invalid credentials\r\n")
    };
    let _ = write_line(stream, &resp).await;
    authenticated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use tokio::io::BufReader;

    /// Create a `BufReader` over an in-memory duplex stream, run the
    /// handler, and return what was written to the client.
    async fn run(tag: &str, username: &str, password: &str) -> (String, bool) {
        let mailbox = MailboxBuilder::new().credentials("alice", "secret").build();
        let (client, server) = tokio::io::duplex(1024);
        let mut stream = BufReader::new(server);

        let ok = handle_login(
            tag,
            username.as_bytes(),
            password.as_bytes(),
            &mailbox,
            &mut stream,
        )
        .await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        (String::from_utf8(buf).unwrap(), ok)
    }

    #[tokio::test]
    async fn accepts_matching_credentials() {
        let (output, ok) = run("A0001", "alice", "secret").await;
        assert!(ok);
        assert_eq!(output, "A0001 OK LOGIN completed\r\n");
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let (output, ok) = run("A0001", "alice", "nope").await;
        assert!(!ok);
        assert!(output.starts_with("A0001 NO "));
    }

    #[tokio::test]
    async fn rejects_unknown_user() {
        let (_, ok) = run("A0001", "mallory", "secret").await;
        assert!(!ok);
    }
}
