//! Concurrent IMAP read-workload benchmark
//!
//! Launches a number of simulated mail clients against one IMAP
//! server. Each client connects, discovers its folders and runs a
//! fixed battery of searches and fetches against every selectable
//! folder, then logs out. The result is one timing record per client.
//!
//! The IMAP conversation goes through the [`Transport`] and
//! [`Session`] traits; [`ImapTransport`] implements them with
//! `async-imap` over plain TCP or STARTTLS.
//!
//! ```no_run
//! use imap_bench::{Battery, BenchConfig, ImapTransport, run_all};
//! use std::sync::Arc;
//!
//! # async fn run() -> imap_bench::Result<()> {
//! let config = BenchConfig::from_env()?;
//! let transport = ImapTransport::from_config(&config);
//! let report = run_all(
//!     Arc::new(transport),
//!     Arc::new(config),
//!     Arc::new(Battery::default()),
//! )
//! .await;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

mod client;
mod command;
mod config;
mod connection;
mod coordinator;
mod error;
mod folder;
mod pipeline;
mod report;
mod transport;

pub use client::{ImapSession, ImapTransport, SessionStream};
pub use command::{Command, CommandResult, Runner, Status, check};
pub use config::{BenchConfig, RetryPolicy, Security};
pub use connection::{establish, open_with_retry};
pub use coordinator::{client_id, run_all};
pub use error::{Error, Result};
pub use folder::{extract_selectable, quote};
pub use pipeline::{
    BODY_ITEMS, Battery, FLAG_ITEMS, LIST_PATTERN, LIST_REFERENCE, NOT_BENCHMARKED, RunStats,
    Stage, WHOLE_FOLDER, run_client, uid_set,
};
pub use report::{Report, Summary, TimingRecord};
pub use transport::{FetchSummary, SelectedFolder, Session, Transport};
