//! LIST and LSUB command handler.
//!
//! Responds with one untagged line per folder, followed by the tagged
//! OK. Container folders carry `\Noselect`; LSUB reports every folder
//! that can be selected as subscribed.
//!
//! ```text
//! * LIST (\HasNoChildren) "/" "INBOX"
//! * LIST (\Noselect \HasChildren) "/" "Shared"
//! A0002 OK LIST completed
//! ```

use crate::fake_imap::io::{write_line, write_tagged};
use crate::fake_imap::mailbox::{FolderKind, Mailbox};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle LIST (`kind == "LIST"`) or LSUB (`kind == "LSUB"`).
pub async fn handle_list<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    kind: &str,
    mailbox: &Mailbox,
    stream: &mut BufReader<S>,
) {
    for folder in &mailbox.folders {
        let attributes = match folder.kind {
            FolderKind::Container if kind == "LSUB" => continue,
            FolderKind::Container => "\\Noselect \\HasChildren",
            FolderKind::Mail | FolderKind::Unselectable => "\\HasNoChildren",
        };
        let line = format!("* {kind} ({attributes}) \"/\" \"{}\"\r\n", folder.name);
        if write_line(stream, &line).await.is_err() {
            return;
        }
    }
    let _ = write_tagged(stream, tag, "OK", &format!("{kind} completed")).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use tokio::io::BufReader;

    async fn run(tag: &str, kind: &str, mailbox: &Mailbox) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);

        handle_list(tag, kind, mailbox, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn lists_all_folders() {
        let mailbox = MailboxBuilder::new()
            .folder("INBOX")
            .folder("Sent")
            .folder("Trash")
            .build();

        let output = run("A1", "LIST", &mailbox).await;

        assert!(output.contains("\"INBOX\""));
        assert!(output.contains("\"Sent\""));
        assert!(output.contains("\"Trash\""));
    }

    #[tokio::test]
    async fn ends_with_tagged_ok() {
        let mailbox = MailboxBuilder::new().folder("INBOX").build();
        let output = run("T1", "LIST", &mailbox).await;

        assert!(output.ends_with("T1 OK LIST completed\r\n"));
    }

    #[tokio::test]
    async fn empty_mailbox_returns_only_ok() {
        let mailbox = MailboxBuilder::new().build();
        let output = run("T2", "LIST", &mailbox).await;

        assert_eq!(output, "T2 OK LIST completed\r\n");
    }

    #[tokio::test]
    async fn containers_are_noselect() {
        let mailbox = MailboxBuilder::new()
            .container("Shared")
            .unselectable("Archive")
            .build();
        let output = run("T3", "LIST", &mailbox).await;

        assert!(output.contains("* LIST (\\Noselect \\HasChildren) \"/\" \"Shared\""));
        assert!(output.contains("* LIST (\\HasNoChildren) \"/\" \"Archive\""));
    }

    #[tokio::test]
    async fn lsub_skips_containers() {
        let mailbox = MailboxBuilder::new()
            .folder("INBOX")
            .container("Shared")
            .build();
        let output = run("T4", "LSUB", &mailbox).await;

        assert_eq!(
            output,
            "* LSUB (\\HasNoChildren) \"/\" \"INBOX\"\r\nT4 OK LSUB completed\r\n"
        );
    }
}
