//! Benchmark configuration

use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How the transport is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// Plain TCP, no encryption.
    #[default]
    Plain,
    /// Plain TCP upgraded with STARTTLS after the greeting.
    StartTls,
}

impl FromStr for Security {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("plain") {
            Ok(Self::Plain)
        } else if s.eq_ignore_ascii_case("starttls") {
            Ok(Self::StartTls)
        } else {
            Err(format!("unknown security mode '{s}'"))
        }
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::StartTls => f.write_str("starttls"),
        }
    }
}

/// Connection establishment retry policy.
///
/// Only a missing greeting is retried; every other failure while
/// connecting is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub greeting_timeout: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    pub const DEFAULT_GREETING_TIMEOUT: Duration = Duration::from_secs(8);
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_ATTEMPTS,
            greeting_timeout: Self::DEFAULT_GREETING_TIMEOUT,
        }
    }
}

/// Benchmark run configuration
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub security: Security,
    /// Number of concurrently running clients.
    pub clients: usize,
    pub retry: RetryPolicy,
}

impl BenchConfig {
    /// Load benchmark configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `IMAP_USERNAME`
    /// - `IMAP_PASSWORD`
    ///
    /// Optional (with defaults):
    /// - `IMAP_HOST` (default: `127.0.0.1`)
    /// - `IMAP_PORT` (default: `143`)
    /// - `IMAP_SECURITY` (default: `plain`, or `starttls`)
    /// - `BENCH_CLIENTS` (default: `2`)
    /// - `BENCH_CONNECT_ATTEMPTS` (default: `3`)
    /// - `BENCH_GREETING_TIMEOUT_SECS` (default: `8`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or
    /// a value does not parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`BenchConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let retry = RetryPolicy {
            max_attempts: parse_or(
                &lookup,
                "BENCH_CONNECT_ATTEMPTS",
                RetryPolicy::DEFAULT_ATTEMPTS,
            )?,
            greeting_timeout: Duration::from_secs(parse_or(
                &lookup,
                "BENCH_GREETING_TIMEOUT_SECS",
                RetryPolicy::DEFAULT_GREETING_TIMEOUT.as_secs(),
            )?),
        };
        if retry.max_attempts == 0 {
            return Err(Error::Config(
                "BENCH_CONNECT_ATTEMPTS must be at least 1".into(),
            ));
        }

        Ok(Self {
            host: lookup("IMAP_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "IMAP_PORT", 143)?,
            username: lookup("IMAP_USERNAME")
                .ok_or_else(|| Error::Config("IMAP_USERNAME not set".into()))?,
            password: lookup("IMAP_PASSWORD")
                .ok_or_else(|| Error::Config("IMAP_PASSWORD not set".into()))?,
            security: parse_or(&lookup, "IMAP_SECURITY", Security::Plain)?,
            clients: parse_or(&lookup, "BENCH_CLIENTS", 2)?,
            retry,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {key}: {e}")))
    })
}
