//! Classified errors surfaced to callers of the detector.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

pub const MISCONFIGURED_MESSAGE: &str =
    "API URL is not configured. Please check environment variables.";

pub const UNREACHABLE_MESSAGE: &str = "Failed to connect to the server. Please try again later.";

pub const INVALID_BODY_MESSAGE: &str = "API Error: Invalid response from server";

/// Which stage of a detection call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The endpoint could not be resolved. No request was sent.
    Misconfigured,
    /// No response was received after every attempt.
    ServiceUnreachable,
    /// The service answered with a failure status or a body we cannot read.
    UpstreamError,
}

/// A terminal failure of one detection call.
///
/// `Display` yields the human-readable message, so callers can render the
/// error directly.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub message: String,
}

impl ClassifiedError {
    pub fn misconfigured() -> Self {
        Self {
            kind: ErrorKind::Misconfigured,
            status_code: Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
            message: MISCONFIGURED_MESSAGE.to_string(),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            kind: ErrorKind::ServiceUnreachable,
            status_code: None,
            message: UNREACHABLE_MESSAGE.to_string(),
        }
    }

    /// Builds the error for a non-success status, e.g. `API Error: Not Found`.
    pub fn upstream_status(status: StatusCode) -> Self {
        let text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string());

        Self {
            kind: ErrorKind::UpstreamError,
            status_code: Some(status.as_u16()),
            message: format!("API Error: {}", text),
        }
    }

    /// A success status whose body could not be decoded.
    pub fn invalid_body() -> Self {
        Self {
            kind: ErrorKind::UpstreamError,
            status_code: None,
            message: INVALID_BODY_MESSAGE.to_string(),
        }
    }
}
