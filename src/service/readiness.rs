use crate::error::GateError;
use backon::{ConstantBuilder, Retryable};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Block until `probe` succeeds, retrying at a constant `interval` for at
/// most `max_attempts` total attempts.
///
/// The probe is not called again once it succeeds; exhausting the budget
/// yields [`GateError::NotReady`]. `max_attempts` of zero still probes once.
pub async fn wait_until_ready<P, Fut, E>(
    probe: P,
    interval: Duration,
    max_attempts: usize,
) -> Result<(), GateError>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    // backon counts retries, not attempts.
    let backoff = ConstantBuilder::default()
        .with_delay(interval)
        .with_max_times(max_attempts.saturating_sub(1));

    probe
        .retry(backoff)
        .notify(|err: &E, delay: Duration| {
            debug!(error = %err, retry_in = ?delay, "dependency not ready yet");
        })
        .await
        .map_err(|_| GateError::NotReady {
            attempts: max_attempts.max(1),
        })
}
