//! Request orchestration: resolve the endpoint, send with retry, normalize.
//!
//! Every call runs `Resolving → Sending (1..N attempts) → Success | Failed`
//! from scratch. Nothing is shared between calls, so concurrent calls on one
//! [`SpamDetector`] are independent.

mod normalize;
mod types;

use log::warn;

use crate::config::{EndpointConfig, detect_url};
use crate::error::ClassifiedError;
use crate::http::{
    Delay, HttpTransport, RetryPolicy, TokioDelay, Transport, build_http_client, send_with_retry,
};
use crate::runtime::{RealRuntime, Runtime};

pub use normalize::{normalize, parse_body};
pub use types::{DetectRequest, Detection, Verdict};

#[derive(Debug, Clone)]
pub struct SpamDetector<R = RealRuntime, T = HttpTransport, D = TokioDelay> {
    runtime: R,
    transport: T,
    delay: D,
    endpoint: EndpointConfig,
    policy: RetryPolicy,
}

impl SpamDetector {
    /// A detector over the real environment, network and clock.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(RealRuntime, build_http_client(None)?, TokioDelay))
    }
}

impl<R: Runtime, T: Transport, D: Delay> SpamDetector<R, T, D> {
    pub fn new(runtime: R, transport: T, delay: D) -> Self {
        Self {
            runtime,
            transport,
            delay,
            endpoint: EndpointConfig::default(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Classifies `request.message` with `request.model`.
    ///
    /// Neither field is validated here: an empty message or an unknown model
    /// is sent as-is and the service decides.
    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    pub async fn detect(&self, request: &DetectRequest) -> Result<Detection, ClassifiedError> {
        let base = self.endpoint.resolve(&self.runtime)?;
        let url = detect_url(&base);

        let outcome =
            send_with_retry(&self.transport, &self.delay, &self.policy, &url, request).await;

        normalize(outcome)
    }
}

/// One-shot detection with the default configuration.
///
/// Failing to set up the HTTP client means no request can be made, which is
/// reported as [`crate::ErrorKind::ServiceUnreachable`].
pub async fn detect_spam(request: &DetectRequest) -> Result<Detection, ClassifiedError> {
    let detector = or_unreachable(SpamDetector::from_env())?;
    detector.detect(request).await
}

fn or_unreachable(setup: anyhow::Result<SpamDetector>) -> Result<SpamDetector, ClassifiedError> {
    setup.map_err(|e| {
        warn!("Failed to set up HTTP client: {:#}", e);
        ClassifiedError::unreachable()
    })
}
