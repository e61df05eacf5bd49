//! Single-client benchmark pipeline
//!
//! One client connects, lists its folders, and runs a fixed battery of
//! searches and fetches against every selectable folder before logging
//! out. Commands run strictly one after another on the client's own
//! connection.
//!
//! ```text
//! Connecting -> Authenticated -> Discovering -> PerFolder(..)* -> LoggingOut -> Done
//!      \______________\_______________\______________\______________\-> Failed
//! ```

use crate::command::Runner;
use crate::config::BenchConfig;
use crate::connection::establish;
use crate::error::{Error, Result};
use crate::folder::{extract_selectable, quote};
use crate::report::TimingRecord;
use crate::transport::{FetchSummary, Session, Transport};
use chrono::NaiveDate;
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Reference name for folder discovery.
pub const LIST_REFERENCE: &str = "*";
/// Mailbox pattern for folder discovery.
pub const LIST_PATTERN: &str = "%";
/// Every message in the selected folder.
pub const WHOLE_FOLDER: &str = "1:*";
/// Fetch items for full messages and their size.
pub const BODY_ITEMS: &str = "(UID RFC822.SIZE BODY.PEEK[])";
/// Fetch items for flags only.
pub const FLAG_ITEMS: &str = "FLAGS";

/// Commands a real client would issue that are outside the battery.
pub const NOT_BENCHMARKED: [&str; 5] = ["METADATA", "NAMESPACE", "GETACL", "MYRIGHTS", "SORT"];

/// Search terms used by the per-folder battery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battery {
    pub subject: String,
    pub to: String,
    pub body: String,
    pub text: String,
    pub since: NaiveDate,
}

impl Default for Battery {
    fn default() -> Self {
        Self {
            subject: "subject".to_string(),
            to: "doe".to_string(),
            body: "body".to_string(),
            text: "body".to_string(),
            since: NaiveDate::from_ymd_opt(2017, 2, 1).unwrap_or_default(),
        }
    }
}

impl Battery {
    /// The searches run before `ALL`, in order.
    #[must_use]
    pub fn searches(&self) -> [String; 6] {
        [
            format!("SUBJECT {}", quote(&self.subject)),
            format!("TO {}", quote(&self.to)),
            format!("BODY {}", quote(&self.body)),
            format!("TEXT {}", quote(&self.text)),
            format!("SINCE {}", self.since.format("%-d-%b-%Y")),
            "UNSEEN".to_string(),
        ]
    }
}

/// Where a pipeline is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Connecting,
    Authenticated,
    Discovering,
    PerFolder(String),
    LoggingOut,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => f.write_str("connecting"),
            Self::Authenticated => f.write_str("authenticated"),
            Self::Discovering => f.write_str("discovering"),
            Self::PerFolder(folder) => write!(f, "folder {folder}"),
            Self::LoggingOut => f.write_str("logging out"),
            Self::Done => f.write_str("done"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Counters collected while a pipeline runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub folders: usize,
    pub skipped: usize,
    pub fetched: FetchSummary,
}

/// Run one benchmark client to completion.
///
/// Never fails: a client that cannot finish yields an empty record.
pub async fn run_client<T: Transport>(
    id: &str,
    transport: &T,
    config: &BenchConfig,
    battery: &Battery,
) -> TimingRecord {
    let start = Instant::now();
    let mut stage = Stage::Connecting;

    match drive(transport, config, battery, &mut stage).await {
        Ok(stats) => {
            let elapsed = start.elapsed();
            advance(&mut stage, Stage::Done);
            info!(
                folders = stats.folders,
                skipped = stats.skipped,
                messages = stats.fetched.messages,
                bytes = stats.fetched.bytes,
                "Finished in {:.3}s",
                elapsed.as_secs_f64()
            );
            TimingRecord::completed(id, elapsed)
        }
        Err(err) => {
            error!(%stage, "Client failed: {err}");
            advance(&mut stage, Stage::Failed);
            TimingRecord::empty()
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "Stage change");
    *stage = next;
}

async fn drive<T: Transport>(
    transport: &T,
    config: &BenchConfig,
    battery: &Battery,
    stage: &mut Stage,
) -> Result<RunStats> {
    let mut session = establish(transport, config).await?;
    advance(stage, Stage::Authenticated);
    let mut runner = Runner::new(&mut session);

    match exercise(&mut runner, battery, stage).await {
        Ok(stats) => {
            advance(stage, Stage::LoggingOut);
            runner.logout().await?;
            Ok(stats)
        }
        Err(err) => {
            // Best effort: the session is going away either way.
            runner.logout().await.ok();
            Err(err)
        }
    }
}

/// Discover folders and run the battery against each selectable one.
async fn exercise<S: Session>(
    runner: &mut Runner<'_, S>,
    battery: &Battery,
    stage: &mut Stage,
) -> Result<RunStats> {
    advance(stage, Stage::Discovering);
    let listing = runner.list(LIST_REFERENCE, LIST_PATTERN).await?;
    let folders = extract_selectable(&listing);
    // Fetched like a real client would; not used.
    runner.lsub(LIST_REFERENCE, LIST_PATTERN).await?;
    debug!("Found {} selectable folder(s)", folders.len());

    let mut stats = RunStats::default();
    for folder in &folders {
        advance(stage, Stage::PerFolder(folder.clone()));
        match run_folder(runner, folder, battery).await {
            Ok(fetched) => {
                stats.folders += 1;
                stats.fetched += fetched;
            }
            Err(Error::SelectFailed { folder, reason }) => {
                warn!("Failed to select folder {}: {reason}", quote(&folder));
                stats.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(stats)
}

/// SELECT a folder and run the battery against it.
///
/// The order is fixed: every step relies on the folder selected first.
async fn run_folder<S: Session>(
    runner: &mut Runner<'_, S>,
    folder: &str,
    battery: &Battery,
) -> Result<FetchSummary> {
    runner.select(folder).await?;

    for criteria in battery.searches() {
        runner.uid_search(&criteria).await?;
    }

    let mut fetched = FetchSummary::default();
    let all = runner.uid_search("ALL").await?;
    if !all.is_empty() {
        fetched += runner.uid_fetch(&uid_set(&all), BODY_ITEMS).await?;
    }

    fetched += runner.uid_fetch(WHOLE_FOLDER, BODY_ITEMS).await?;
    fetched += runner.uid_fetch(WHOLE_FOLDER, FLAG_ITEMS).await?;
    Ok(fetched)
}

/// Render UIDs as a compact sequence set, e.g. `1:3,7,9:10`.
///
/// Input order and duplicates do not matter.
#[must_use]
pub fn uid_set(uids: &[u32]) -> String {
    let mut sorted = uids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for uid in sorted {
        match ranges.last_mut() {
            Some((_, end)) if end.checked_add(1) == Some(uid) => *end = uid,
            _ => ranges.push((uid, uid)),
        }
    }

    ranges
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}:{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
