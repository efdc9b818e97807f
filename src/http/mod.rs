//! HTTP transport with fixed-delay retry.

mod client;
mod retry;

pub use client::{HttpTransport, RawResponse, Transport, TransportError, build_http_client};
pub use retry::{
    Delay, MAX_RETRIES, RETRY_DELAY_MS, RetryPolicy, StatusRetry, TokioDelay, send_with_retry,
};

#[cfg(test)]
pub use client::MockTransport;
