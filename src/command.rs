//! Command execution and status checking
//!
//! [`Runner`] issues one command on a session, waits for its tagged
//! response and turns a non-OK status into an error. It never looks
//! inside payloads.

use crate::error::{Error, Result};
use crate::folder::quote;
use crate::transport::{FetchSummary, SelectedFolder, Session};
use std::fmt;
use tracing::debug;

/// Completion status of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Failed,
}

/// The server's answer to one command.
///
/// A failed command carries the server's text for diagnostics only;
/// there is no payload to misread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult<T> {
    Ok(T),
    Failed(String),
}

impl<T> CommandResult<T> {
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Ok(_) => Status::Ok,
            Self::Failed(_) => Status::Failed,
        }
    }
}

/// A command as issued by the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    List {
        reference: &'a str,
        pattern: &'a str,
    },
    Lsub {
        reference: &'a str,
        pattern: &'a str,
    },
    Select(&'a str),
    UidSearch(&'a str),
    UidFetch { uid_set: &'a str, items: &'a str },
    Logout,
}

impl Command<'_> {
    /// The error a non-OK status produces for this command.
    ///
    /// SELECT gets its own kind so callers can skip the folder
    /// instead of giving up.
    fn failure(&self, reason: String) -> Error {
        match self {
            Self::Select(folder) => Error::SelectFailed {
                folder: (*folder).to_string(),
                reason,
            },
            other => Error::Command {
                command: other.to_string(),
                reason,
            },
        }
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List { reference, pattern } => write!(f, "LIST {} {pattern}", quote(reference)),
            Self::Lsub { reference, pattern } => write!(f, "LSUB {} {pattern}", quote(reference)),
            Self::Select(folder) => write!(f, "SELECT {}", quote(folder)),
            Self::UidSearch(criteria) => write!(f, "UID SEARCH {criteria}"),
            Self::UidFetch { uid_set, items } => write!(f, "UID FETCH {uid_set} {items}"),
            Self::Logout => f.write_str("LOGOUT"),
        }
    }
}

/// Gate a command result on its status.
///
/// # Errors
///
/// Returns [`Error::SelectFailed`] for a failed SELECT and
/// [`Error::Command`] for any other failed command.
pub fn check<T>(command: &Command<'_>, result: CommandResult<T>) -> Result<T> {
    match result {
        CommandResult::Ok(payload) => Ok(payload),
        CommandResult::Failed(reason) => Err(command.failure(reason)),
    }
}

/// Runs commands on a borrowed session, one at a time.
pub struct Runner<'s, S> {
    session: &'s mut S,
}

impl<'s, S: Session> Runner<'s, S> {
    pub const fn new(session: &'s mut S) -> Self {
        Self { session }
    }

    /// # Errors
    ///
    /// Returns an error if the transport fails or LIST is not OK.
    pub async fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<String>> {
        let command = Command::List { reference, pattern };
        debug!(%command, "running");
        let result = self.session.list(reference, pattern).await?;
        check(&command, result)
    }

    /// # Errors
    ///
    /// Returns an error if the transport fails or LSUB is not OK.
    pub async fn lsub(&mut self, reference: &str, pattern: &str) -> Result<Vec<String>> {
        let command = Command::Lsub { reference, pattern };
        debug!(%command, "running");
        let result = self.session.lsub(reference, pattern).await?;
        check(&command, result)
    }

    /// # Errors
    ///
    /// Returns [`Error::SelectFailed`] if the server refuses the
    /// folder, or another error if the transport fails.
    pub async fn select(&mut self, folder: &str) -> Result<SelectedFolder> {
        let command = Command::Select(folder);
        debug!(%command, "running");
        let result = self.session.select(folder).await?;
        check(&command, result)
    }

    /// # Errors
    ///
    /// Returns an error if the transport fails or the search is not OK.
    pub async fn uid_search(&mut self, criteria: &str) -> Result<Vec<u32>> {
        let command = Command::UidSearch(criteria);
        debug!(%command, "running");
        let result = self.session.uid_search(criteria).await?;
        check(&command, result)
    }

    /// # Errors
    ///
    /// Returns an error if the transport fails or the fetch is not OK.
    pub async fn uid_fetch(&mut self, uid_set: &str, items: &str) -> Result<FetchSummary> {
        let command = Command::UidFetch { uid_set, items };
        debug!(%command, "running");
        let result = self.session.uid_fetch(uid_set, items).await?;
        check(&command, result)
    }

    /// # Errors
    ///
    /// Returns an error if the transport fails or LOGOUT is not OK.
    pub async fn logout(&mut self) -> Result<()> {
        let command = Command::Logout;
        debug!(%command, "running");
        let result = self.session.logout().await?;
        check(&command, result)
    }
}
