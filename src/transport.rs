//! Transport seam between the benchmark and an IMAP implementation
//!
//! Every operation yields `Result<CommandResult<T>>`: the outer
//! `Result` carries transport failures (I/O, parse, TLS), the inner
//! [`CommandResult`] carries the server's verdict on the command.

use crate::command::CommandResult;
use crate::error::Result;
use std::future::Future;
use std::ops::AddAssign;

/// Opens connections to one IMAP server.
pub trait Transport: Send + Sync {
    /// A connection whose greeting has been received, not yet logged in.
    type Greeted: Send;
    type Session: Session;

    /// Open a connection and wait for the server greeting.
    ///
    /// No timeout is applied here; the caller bounds the wait.
    fn open(&self) -> impl Future<Output = Result<Self::Greeted>> + Send;

    /// Authenticate a greeted connection.
    fn login(
        &self,
        greeted: Self::Greeted,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<CommandResult<Self::Session>>> + Send;
}

/// An authenticated IMAP session.
///
/// Methods take `&mut self`, so a session never has more than one
/// command in flight.
pub trait Session: Send {
    /// `LIST`, returning raw listing lines followed by a completion line.
    fn list(
        &mut self,
        reference: &str,
        pattern: &str,
    ) -> impl Future<Output = Result<CommandResult<Vec<String>>>> + Send;

    /// `LSUB`, same shape as [`Session::list`].
    fn lsub(
        &mut self,
        reference: &str,
        pattern: &str,
    ) -> impl Future<Output = Result<CommandResult<Vec<String>>>> + Send;

    /// `SELECT` an unquoted folder name.
    fn select(
        &mut self,
        folder: &str,
    ) -> impl Future<Output = Result<CommandResult<SelectedFolder>>> + Send;

    /// `UID SEARCH`, returning matching UIDs in ascending order.
    fn uid_search(
        &mut self,
        criteria: &str,
    ) -> impl Future<Output = Result<CommandResult<Vec<u32>>>> + Send;

    /// `UID FETCH` of `items` for every message in `uid_set`.
    fn uid_fetch(
        &mut self,
        uid_set: &str,
        items: &str,
    ) -> impl Future<Output = Result<CommandResult<FetchSummary>>> + Send;

    fn logout(&mut self) -> impl Future<Output = Result<CommandResult<()>>> + Send;
}

/// Mailbox metadata returned by SELECT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectedFolder {
    pub exists: u32,
}

/// What a FETCH returned, reduced to what the benchmark reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub messages: usize,
    pub bytes: u64,
}

impl AddAssign for FetchSummary {
    fn add_assign(&mut self, other: Self) {
        self.messages += other.messages;
        self.bytes += other.bytes;
    }
}
