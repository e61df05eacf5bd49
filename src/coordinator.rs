//! Concurrent benchmark runs
//!
//! Each client runs as its own tokio task over its own connection.
//! The coordinator waits for every task, whatever its outcome, and
//! reports one record per client in launch order.

use crate::config::BenchConfig;
use crate::pipeline::{Battery, NOT_BENCHMARKED, run_client};
use crate::report::{Report, TimingRecord};
use crate::transport::Transport;
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};

/// Identifier of the client launched at `index` (zero-based).
#[must_use]
pub fn client_id(config: &BenchConfig, index: usize) -> String {
    format!("{}-{}", config.username, index + 1)
}

/// Run `config.clients` benchmark clients concurrently.
///
/// The report always holds exactly `config.clients` records; clients
/// that failed, or whose task panicked, get an empty record.
pub async fn run_all<T>(
    transport: Arc<T>,
    config: Arc<BenchConfig>,
    battery: Arc<Battery>,
) -> Report
where
    T: Transport + 'static,
{
    info!(
        clients = config.clients,
        "Starting benchmark against {}:{} ({})",
        config.host,
        config.port,
        config.security
    );
    info!("Not benchmarked: {}", NOT_BENCHMARKED.join(", "));

    let handles: Vec<_> = (0..config.clients)
        .map(|index| {
            let id = client_id(&config, index);
            let span = info_span!("client", id = %id);
            let transport = Arc::clone(&transport);
            let config = Arc::clone(&config);
            let battery = Arc::clone(&battery);
            let task_id = id.clone();
            let handle = tokio::spawn(
                async move { run_client(&task_id, transport.as_ref(), &config, &battery).await }
                    .instrument(span),
            );
            (id, handle)
        })
        .collect();

    let mut records = Vec::with_capacity(handles.len());
    for (id, handle) in handles {
        let record = handle.await.unwrap_or_else(|e| {
            error!("Client {id} did not finish: {e}");
            TimingRecord::empty()
        });
        records.push(record);
    }

    Report::new(records)
}
