//! Retry with exponential back-off and jitter for the profile API client.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). Terminal errors (a missing
//! profile, a dead session, a malformed body) are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScrapeError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 429: the endpoint throttles aggressively but briefly.
/// - HTTP 5xx: transient server/infrastructure errors.
///
/// **Not retriable (hard stop):**
/// - [`ScrapeError::NotFound`] — the profile does not exist.
/// - [`ScrapeError::Unauthorized`] — the session is stale; retrying with the
///   same cookies cannot succeed.
/// - [`ScrapeError::MalformedResponse`] / [`ScrapeError::Deserialize`] —
///   retrying won't change the body shape.
pub(crate) fn is_retriable(err: &ScrapeError) -> bool {
    match err {
        ScrapeError::Http(e) => e.is_timeout() || e.is_connect(),
        ScrapeError::RateLimited => true,
        ScrapeError::UnexpectedStatus { status, .. } => *status >= 500,
        ScrapeError::NotFound { .. }
        | ScrapeError::Unauthorized { .. }
        | ScrapeError::MalformedResponse { .. }
        | ScrapeError::Deserialize { .. }
        | ScrapeError::InvalidHeader { .. }
        | ScrapeError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The wait before the n-th retry is `backoff_base_ms * 2^(n-1)` with ±25%
/// jitter, capped at 60 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "profile API transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
