//! Endpoint configuration and resolution.
//!
//! The base URL is looked up on every call: an explicit override wins, then
//! the `SPAMCHECK_API_URL` environment variable, then the configured
//! [`Fallback`]. Only `Fallback::Disabled` can make resolution fail.

use log::{debug, info};

use crate::error::ClassifiedError;
use crate::runtime::Runtime;

/// Environment variable naming the service base URL.
pub const API_URL_ENV: &str = "SPAMCHECK_API_URL";

/// Local development address of the detection service.
pub const LOOPBACK_API_URL: &str = "http://localhost:8000";

/// Path of the classification endpoint, appended to the base URL.
pub const DETECT_PATH: &str = "/detect_spam";

/// What to use when the environment does not name a base URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Fallback {
    /// [`LOOPBACK_API_URL`].
    #[default]
    Loopback,
    /// A known deployment address.
    Url(String),
    /// No fallback: a missing variable is a configuration error.
    Disabled,
}

impl Fallback {
    pub fn url(&self) -> Option<&str> {
        match self {
            Fallback::Loopback => Some(LOOPBACK_API_URL),
            Fallback::Url(url) => Some(url.as_str()),
            Fallback::Disabled => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub env_key: String,
    pub override_url: Option<String>,
    pub fallback: Fallback,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            env_key: API_URL_ENV.to_string(),
            override_url: None,
            fallback: Fallback::default(),
        }
    }
}

impl EndpointConfig {
    pub fn with_override(mut self, url: impl Into<String>) -> Self {
        self.override_url = Some(url.into());
        self
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Resolves the base URL, without the trailing slash.
    ///
    /// Blank values count as absent. Identical environment state always
    /// yields the identical string.
    #[tracing::instrument(skip(self, runtime))]
    pub fn resolve<R: Runtime + ?Sized>(&self, runtime: &R) -> Result<String, ClassifiedError> {
        if let Some(url) = self.override_url.as_deref().and_then(non_blank) {
            let url = trim_base(url);
            info!("API URL: {} (override)", url);
            return Ok(url);
        }

        let from_env = runtime.env_var(&self.env_key).ok();
        if let Some(url) = from_env.as_deref().and_then(non_blank) {
            let url = trim_base(url);
            info!("API URL: {}", url);
            return Ok(url);
        }

        match self.fallback.url() {
            Some(url) => {
                let url = trim_base(url);
                info!("API URL: {} ({} is not set, using fallback)", url, self.env_key);
                Ok(url)
            }
            None => {
                debug!("{} is not set and no fallback is configured", self.env_key);
                Err(ClassifiedError::misconfigured())
            }
        }
    }
}

/// Joins the base URL with [`DETECT_PATH`].
pub fn detect_url(base: &str) -> String {
    format!("{}{}", trim_base(base), DETECT_PATH)
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::env::VarError;

    fn runtime_with(value: Option<&'static str>) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(API_URL_ENV))
            .returning(move |_| value.map(str::to_string).ok_or(VarError::NotPresent));
        runtime
    }

    #[test]
    fn test_resolve_from_environment() {
        let runtime = runtime_with(Some("https://spam.example.com"));
        let url = EndpointConfig::default().resolve(&runtime).unwrap();
        assert_eq!(url, "https://spam.example.com");
    }

    #[test]
    fn test_resolve_trims_trailing_slash() {
        let runtime = runtime_with(Some("https://spam.example.com/api/ "));
        let url = EndpointConfig::default().resolve(&runtime).unwrap();
        assert_eq!(url, "https://spam.example.com/api");
    }

    #[test]
    fn test_resolve_uses_loopback_fallback_by_default() {
        let runtime = runtime_with(None);
        let url = EndpointConfig::default().resolve(&runtime).unwrap();
        assert_eq!(url, LOOPBACK_API_URL);
    }

    #[test]
    fn test_resolve_uses_custom_fallback() {
        let runtime = runtime_with(None);
        let config = EndpointConfig::default()
            .with_fallback(Fallback::Url("https://deployed.example.com/".to_string()));
        assert_eq!(config.resolve(&runtime).unwrap(), "https://deployed.example.com");
    }

    #[test]
    fn test_resolve_blank_environment_counts_as_absent() {
        let runtime = runtime_with(Some("   "));
        let url = EndpointConfig::default().resolve(&runtime).unwrap();
        assert_eq!(url, LOOPBACK_API_URL);
    }

    #[test]
    fn test_resolve_without_fallback_is_misconfigured() {
        let runtime = runtime_with(None);
        let config = EndpointConfig::default().with_fallback(Fallback::Disabled);

        let err = config.resolve(&runtime).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Misconfigured);
        assert_eq!(err.status_code, Some(500));
    }

    #[test]
    fn test_resolve_override_wins_without_reading_environment() {
        // No expectation set: reading the environment would panic.
        let runtime = MockRuntime::new();
        let config = EndpointConfig::default()
            .with_override("http://127.0.0.1:9000/")
            .with_fallback(Fallback::Disabled);

        assert_eq!(config.resolve(&runtime).unwrap(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let runtime = runtime_with(Some("https://spam.example.com"));
        let config = EndpointConfig::default();
        assert_eq!(
            config.resolve(&runtime).unwrap(),
            config.resolve(&runtime).unwrap()
        );
    }

    #[test]
    fn test_detect_url() {
        assert_eq!(
            detect_url("http://localhost:8000/"),
            "http://localhost:8000/detect_spam"
        );
        assert_eq!(
            detect_url("https://api.example.com/v1"),
            "https://api.example.com/v1/detect_spam"
        );
    }
}
