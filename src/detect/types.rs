use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /detect_spam`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectRequest {
    /// Raw email text. May be empty.
    pub message: String,
    /// Backend classifier identifier, passed through unchecked.
    pub model: String,
}

impl DetectRequest {
    pub fn new(message: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Spam")]
    Spam,
    #[serde(rename = "Not Spam")]
    NotSpam,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Spam => "Spam",
            Verdict::NotSpam => "Not Spam",
        }
    }
}

impl From<bool> for Verdict {
    fn from(is_spam: bool) -> Self {
        if is_spam { Verdict::Spam } else { Verdict::NotSpam }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized result of a successful call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub result: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_to_wire_shape() {
        let request = DetectRequest::new("Win a prize!", "model2");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "Win a prize!", "model": "model2"})
        );
    }

    #[test]
    fn test_verdict_literals() {
        assert_eq!(Verdict::from(true).to_string(), "Spam");
        assert_eq!(Verdict::from(false).to_string(), "Not Spam");
    }

    #[test]
    fn test_detection_serialization_omits_missing_confidence() {
        let detection = Detection {
            result: Verdict::NotSpam,
            confidence: None,
        };
        assert_eq!(
            serde_json::to_string(&detection).unwrap(),
            r#"{"result":"Not Spam"}"#
        );

        let detection = Detection {
            result: Verdict::Spam,
            confidence: Some(0.87),
        };
        assert_eq!(
            serde_json::to_string(&detection).unwrap(),
            r#"{"result":"Spam","confidence":0.87}"#
        );
    }
}
