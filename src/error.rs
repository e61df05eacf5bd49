//! Error types for imap-bench

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No greeting within timeout (attempt {attempt})")]
    ConnectionTimeout { attempt: u32 },

    #[error("Failed to connect after {attempts} attempt(s)")]
    EstablishmentFailure { attempts: u32 },

    #[error("Login failed: {0}")]
    Authentication(String),

    #[error("{command} failed: {reason}")]
    Command { command: String, reason: String },

    #[error("Failed to select {folder}: {reason}")]
    SelectFailed { folder: String, reason: String },

    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),
}

pub type Result<T> = std::result::Result<T, Error>;
