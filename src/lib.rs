pub mod config;
pub mod detect;
pub mod error;
pub mod http;
pub mod models;
pub mod runtime;

pub use config::{EndpointConfig, Fallback};
pub use detect::{DetectRequest, Detection, SpamDetector, Verdict, detect_spam};
pub use error::{ClassifiedError, ErrorKind};
pub use http::{RetryPolicy, StatusRetry};

/// Test utilities shared across modules.
#[cfg(test)]
pub mod test_utils {
    use crate::http::Delay;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records requested delays instead of sleeping, so retry tests run
    /// without wall-clock waits.
    #[derive(Debug, Default)]
    pub struct RecordingDelay {
        pub waits: Mutex<Vec<Duration>>,
    }

    impl RecordingDelay {
        pub fn count(&self) -> usize {
            self.waits.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Delay for RecordingDelay {
        async fn wait(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }
}
