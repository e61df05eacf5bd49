#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI running the IMAP read-workload benchmark
//!
//! Connection settings come from the environment (see
//! [`BenchConfig::from_env`]); the JSON report goes to stdout and logs
//! go to stderr.

use chrono::NaiveDate;
use clap::Parser;
use imap_bench::{Battery, BenchConfig, ImapTransport, run_all};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imap-bench")]
#[command(about = "Measure IMAP latency with concurrent simulated clients")]
struct Args {
    /// Number of concurrent clients (overrides BENCH_CLIENTS)
    #[arg(long)]
    clients: Option<usize>,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,

    /// Print min/mean/max total time to stderr after the run
    #[arg(long)]
    summary: bool,

    /// SUBJECT search term
    #[arg(long, default_value = "subject")]
    subject: String,

    /// TO search term
    #[arg(long, default_value = "doe")]
    to: String,

    /// SINCE search date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, default_value = "2017-02-01")]
    since: NaiveDate,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{s}': {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = BenchConfig::from_env()?;
    if let Some(clients) = args.clients {
        config.clients = clients;
    }

    let battery = Battery {
        subject: args.subject,
        to: args.to,
        since: args.since,
        ..Battery::default()
    };

    let transport = ImapTransport::from_config(&config);
    let report = run_all(Arc::new(transport), Arc::new(config), Arc::new(battery)).await;

    if args.compact {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", report.to_json_pretty()?);
    }

    if args.summary {
        eprintln!("{}", report.summary());
    }

    Ok(())
}
