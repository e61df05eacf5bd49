//! Fake IMAP server for integration testing
//!
//! This module provides an in-process IMAP server that speaks enough
//! of the protocol to run the benchmark pipeline end-to-end:
//!
//! TCP -> greeting -> (STARTTLS -> TLS) -> LOGIN -> LIST/LSUB ->
//! SELECT/SEARCH/FETCH per folder -> LOGOUT
//!
//! ## Module layout
//!
//! - `server` -- TCP listener, options, TLS setup, and dispatch
//! - `handlers/` -- one file per IMAP command (LIST, SELECT, etc.)
//! - `mailbox` -- test data model (folders, emails, builder)
//! - `io` -- shared write helpers

mod handlers;

pub use mailbox::MailboxBuilder;
pub use server::{FakeImapServer, ServerOptions};
