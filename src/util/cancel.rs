//! Cooperative cancellation at host call boundaries.

use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The caller cancelled the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Fail if the token has already been cancelled.
pub fn check(token: &CancellationToken) -> Result<(), Cancelled> {
    if token.is_cancelled() {
        Err(Cancelled)
    } else {
        Ok(())
    }
}

/// Await `fut`, giving up as soon as `token` is cancelled.
///
/// Cancellation wins if both are ready.
pub async fn cancellable<F, T>(token: &CancellationToken, fut: F) -> Result<T, Cancelled>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Cancelled),
        value = fut => Ok(value),
    }
}
