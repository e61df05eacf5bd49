//! Connection establishment with bounded retry
//!
//! Opens a transport, waits for the greeting, retries a missing
//! greeting up to the configured attempt count, then logs in once.

use crate::command::CommandResult;
use crate::config::{BenchConfig, RetryPolicy};
use crate::error::{Error, Result};
use crate::transport::Transport;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Open a connection, retrying while the greeting times out.
///
/// A timed-out attempt is dropped, closing its socket, before the
/// next attempt starts.
///
/// # Errors
///
/// Returns [`Error::EstablishmentFailure`] once every attempt has
/// timed out. Any other transport error is returned as-is without
/// retrying.
pub async fn open_with_retry<T: Transport>(
    transport: &T,
    policy: &RetryPolicy,
) -> Result<T::Greeted> {
    for attempt in 1..=policy.max_attempts {
        debug!(attempt, "Opening connection");
        if let Ok(opened) = timeout(policy.greeting_timeout, transport.open()).await {
            return opened;
        }
        let err = Error::ConnectionTimeout { attempt };
        warn!("{err}, retrying connection");
    }

    Err(Error::EstablishmentFailure {
        attempts: policy.max_attempts,
    })
}

/// Connect and log in.
///
/// # Errors
///
/// Returns [`Error::EstablishmentFailure`] if no greeting arrived,
/// [`Error::Authentication`] if the server rejected the credentials,
/// or the transport's error otherwise.
pub async fn establish<T: Transport>(transport: &T, config: &BenchConfig) -> Result<T::Session> {
    let greeted = open_with_retry(transport, &config.retry).await?;

    match transport
        .login(greeted, &config.username, &config.password)
        .await?
    {
        CommandResult::Ok(session) => {
            info!("Logged in as {}", config.username);
            Ok(session)
        }
        CommandResult::Failed(reason) => Err(Error::Authentication(reason)),
    }
}
