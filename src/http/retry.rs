//! Bounded fixed-delay retry around a [`Transport`].
//!
//! A network failure is always retried until the attempt bound is reached.
//! A 2xx response ends the loop at once. Other statuses are retried only if
//! the policy's [`StatusRetry`] says so.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;

use super::client::{RawResponse, Transport, TransportError};
use crate::detect::DetectRequest;

/// Maximum number of attempts per call, the first one included.
pub const MAX_RETRIES: usize = 3;

/// Delay between retry attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Which non-success statuses earn another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StatusRetry {
    /// Hand every received response to the caller.
    #[default]
    Never,
    /// Retry 5xx, 408 and 429. Other client errors won't succeed on retry.
    ServerErrors,
    /// Retry every non-2xx status.
    Always,
}

impl StatusRetry {
    pub fn should_retry(self, status: StatusCode) -> bool {
        if status.is_success() {
            return false;
        }
        match self {
            StatusRetry::Never => false,
            StatusRetry::ServerErrors => {
                status.is_server_error()
                    || status == StatusCode::REQUEST_TIMEOUT
                    || status == StatusCode::TOO_MANY_REQUESTS
            }
            StatusRetry::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per call. Zero is treated as one.
    pub max_attempts: usize,
    pub delay: Duration,
    pub status_retry: StatusRetry,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            delay: Duration::from_millis(RETRY_DELAY_MS),
            status_retry: StatusRetry::default(),
        }
    }
}

impl RetryPolicy {
    fn attempts(&self) -> usize {
        self.max_attempts.max(1)
    }
}

/// Suspension point between attempts.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sends `body` to `url`, retrying per `policy`.
///
/// Returns the first 2xx response, the first response whose status the
/// policy does not retry, or the last response once attempts run out.
/// Returns the last [`TransportError`] if no attempt got a response.
#[tracing::instrument(skip(transport, delay, policy, body))]
pub async fn send_with_retry<T, D>(
    transport: &T,
    delay: &D,
    policy: &RetryPolicy,
    url: &str,
    body: &DetectRequest,
) -> Result<RawResponse, TransportError>
where
    T: Transport + ?Sized,
    D: Delay + ?Sized,
{
    let attempts = policy.attempts();
    let mut last_error = None;

    for attempt in 1..=attempts {
        let failure = match transport.post_json(url, body).await {
            Ok(response) => {
                if !policy.status_retry.should_retry(response.status) {
                    return Ok(response);
                }
                if attempt == attempts {
                    debug!(
                        "{}: still {} after {} attempts, giving up",
                        url, response.status, attempts
                    );
                    return Ok(response);
                }
                format!("HTTP {}", response.status)
            }
            Err(e) => {
                let failure = e.to_string();
                last_error = Some(e);
                failure
            }
        };

        if attempt < attempts {
            warn!(
                "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                url,
                attempt,
                attempts,
                failure,
                policy.delay.as_millis()
            );
            delay.wait(policy.delay).await;
        } else {
            debug!("{}: attempt {}/{} failed ({})", url, attempt, attempts, failure);
        }
    }

    // The final attempt did not return early, so it recorded a transport error.
    Err(last_error.unwrap_or_else(|| {
        TransportError::Send(format!("failed after {} attempts", attempts))
    }))
}
