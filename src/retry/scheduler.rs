//! Backoff scheduler (§4.3).

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::ClientError;

/// Suspends the caller for `delay`. If `cancellation` fires first, returns a
/// `ClientError` instead of sleeping out the full delay. The token itself is
/// left untouched either way — resetting it is the caller's responsibility,
/// the scheduler only observes it.
pub async fn wait(delay: Duration, cancellation: &CancellationToken) -> Result<(), ClientError> {
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = cancellation.cancelled() => Err(ClientError::new("execution was cancelled during retry backoff")),
    }
}
