//! Maps transport outcomes onto [`Detection`] or [`ClassifiedError`].

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use super::types::{Detection, Verdict};
use crate::error::ClassifiedError;
use crate::http::{RawResponse, TransportError};

/// Success body of the service. Fields the service omits default to absent.
#[derive(Debug, Deserialize)]
struct DetectBody {
    #[serde(default)]
    is_spam: Value,
    #[serde(default)]
    confidence: Option<f64>,
}

pub fn normalize(
    outcome: Result<RawResponse, TransportError>,
) -> Result<Detection, ClassifiedError> {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            debug!("Service unreachable: {}", e);
            return Err(ClassifiedError::unreachable());
        }
    };

    if !response.status.is_success() {
        debug!("Service answered {}", response.status);
        return Err(ClassifiedError::upstream_status(response.status));
    }

    parse_body(&response.body)
}

/// Decodes a 2xx body. Anything but a JSON object is rejected rather than
/// read as a verdict.
pub fn parse_body(body: &[u8]) -> Result<Detection, ClassifiedError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        warn!("Response body is not JSON: {}", e);
        ClassifiedError::invalid_body()
    })?;

    if !value.is_object() {
        warn!("Response body is not a JSON object: {}", value);
        return Err(ClassifiedError::invalid_body());
    }

    let body: DetectBody = serde_json::from_value(value).map_err(|e| {
        warn!("Response body has unexpected fields: {}", e);
        ClassifiedError::invalid_body()
    })?;

    Ok(Detection {
        result: Verdict::from(is_truthy(&body.is_spam)),
        confidence: body.confidence,
    })
}

/// `false`, `null`, `0` and `""` are falsy. Everything else is truthy,
/// including empty arrays and objects.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
