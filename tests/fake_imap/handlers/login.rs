//! LOGIN command handler.
//!
//! The server decides whether the credentials are accepted; this
//! handler only writes the verdict.

use crate::fake_imap::io::write_tagged;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the LOGIN command. Returns `false` if the stream broke.
pub async fn handle_login<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    accepted: bool,
    stream: &mut BufReader<S>,
) -> bool {
    let (status, text) = if accepted {
        ("OK", "LOGIN completed")
    } else {
        ("NO", "[AUTHENTICATIONFAILED] Invalid credentials")
    };
    write_tagged(stream, tag, status, text).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    /// Create a `BufReader` over an in-memory duplex stream, run the
    /// handler, and return what was written to the client.
    async fn run(tag: &str, accepted: bool) -> (String, bool) {
        let (client, server) = tokio::io::duplex(1024);
        let mut stream = BufReader::new(server);

        let ok = handle_login(tag, accepted, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        (String::from_utf8(buf).unwrap(), ok)
    }

    #[tokio::test]
    async fn responds_with_ok() {
        let (output, ok) = run("A0001", true).await;
        assert!(ok);
        assert_eq!(output, "A0001 OK LOGIN completed\r\n");
    }

    #[tokio::test]
    async fn rejected_login_gets_no() {
        let (output, ok) = run("A0001", false).await;
        assert!(ok);
        assert!(output.starts_with("A0001 NO "));
    }
}
