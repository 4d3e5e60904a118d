//! Retry with exponential backoff for transient HTTP failures.
//!
//! Retried:
//! - timeouts and connection errors
//! - 5xx server errors, 429 and 408
//!
//! Everything else (other 4xx, malformed requests) is returned as-is.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

/// Upper bound for a single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Seconds; delay grows as `backoff_factor * 2^(retry - 1)`.
    pub backoff_factor: f64,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff_factor: f64) -> Self {
        Self {
            retries,
            backoff_factor,
            max_backoff: MAX_BACKOFF,
        }
    }

    /// Sleep before the 1-based `retry`. The first retry goes out immediately.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }

        let exponent = (retry - 1).min(63) as i32;
        let secs = self.backoff_factor * 2f64.powi(exponent);

        Duration::try_from_secs_f64(secs)
            .map(|delay| delay.min(self.max_backoff))
            .unwrap_or(self.max_backoff)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() || error.is_connect() {
        return RetryDecision::Retry;
    }

    match error.status() {
        Some(status) => is_retryable_status(status),
        None => RetryDecision::NoRetry,
    }
}

pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        RetryDecision::Retry
    } else {
        RetryDecision::NoRetry
    }
}

/// Run `operation` until it yields a non-retryable outcome or the policy is exhausted.
///
/// After the last retry the final response is returned even if its status is
/// retryable, so the caller can report it.
pub async fn with_retry<F, Fut>(
    policy: &RetryPolicy,
    operation: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut retry = 0;

    loop {
        let outcome = operation().await;

        let decision = match &outcome {
            Ok(response) => is_retryable_status(response.status()),
            Err(e) => is_retryable_error(e),
        };

        if decision == RetryDecision::NoRetry || retry >= policy.retries {
            if retry > 0 {
                tracing::debug!("Finished after {} retries", retry);
            }
            return outcome;
        }

        match &outcome {
            Ok(response) => tracing::warn!(
                "Retryable status {} on attempt {} of {}",
                response.status(),
                retry + 1,
                policy.retries + 1
            ),
            Err(e) => tracing::warn!(
                "Retryable error on attempt {} of {}: {}",
                retry + 1,
                policy.retries + 1,
                e
            ),
        }

        retry += 1;
        let delay = policy.delay_for_retry(retry);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_retry_is_immediate_then_doubles() {
        let policy = RetryPolicy::new(5, 0.2);

        assert_eq!(policy.delay_for_retry(1), Duration::ZERO);
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for_retry(4), Duration::from_millis(1600));
        assert_eq!(policy.delay_for_retry(5), Duration::from_millis(3200));
    }

    #[test]
    fn delay_is_capped() {
        let policy = RetryPolicy::new(100, 0.2);

        assert_eq!(policy.delay_for_retry(20), MAX_BACKOFF);
        assert_eq!(policy.delay_for_retry(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn zero_factor_never_sleeps() {
        let policy = RetryPolicy::new(5, 0.0);

        assert_eq!(policy.delay_for_retry(5), Duration::ZERO);
    }

    #[test]
    fn retryable_status_codes() {
        assert_eq!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::BAD_GATEWAY), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::GATEWAY_TIMEOUT), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::REQUEST_TIMEOUT), RetryDecision::Retry);

        assert_eq!(is_retryable_status(StatusCode::OK), RetryDecision::NoRetry);
        assert_eq!(is_retryable_status(StatusCode::BAD_REQUEST), RetryDecision::NoRetry);
        assert_eq!(is_retryable_status(StatusCode::NOT_FOUND), RetryDecision::NoRetry);
    }
}
