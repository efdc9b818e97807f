//! Single-attempt HTTP exchange with the detection service.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::detect::DetectRequest;

/// A response that made it back from the service, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// The exchange could not complete: nothing usable came back.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to send request: {0}")]
    Send(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one JSON POST. Any received response is `Ok`, error statuses included.
    async fn post_json(
        &self,
        url: &str,
        body: &DetectRequest,
    ) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, body))]
    async fn post_json(
        &self,
        url: &str,
        body: &DetectRequest,
    ) -> Result<RawResponse, TransportError> {
        debug!("POST {} (model {})...", url, body.model);

        // `json` sets `Content-Type: application/json`.
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Send(describe(&e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(describe(&e)))?;

        debug!("{} answered {} ({} bytes)", url, status, body.len());

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Builds the transport used by the CLI and [`crate::detect_spam`].
pub fn build_http_client(timeout: Option<Duration>) -> Result<HttpTransport> {
    let mut builder = Client::builder().user_agent(concat!(
        "spamcheck/",
        env!("SPAMCHECK_VERSION")
    ));

    if let Some(timeout) = timeout {
        debug!("HTTP client configured with a {:?} timeout", timeout);
        builder = builder.timeout(timeout);
    }

    let client = builder.build().context("Failed to build HTTP client")?;
    Ok(HttpTransport::new(client))
}

// reqwest's Display hides the cause (e.g. "connection refused"); include it.
fn describe(error: &reqwest::Error) -> String {
    match std::error::Error::source(error) {
        Some(source) => format!("{}: {}", error, source),
        None => error.to_string(),
    }
}
