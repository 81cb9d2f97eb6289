//! Provider error normalization.

use serde_json::Value;
use thiserror::Error;

/// Message used when nothing readable can be extracted from a provider error.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A provider failure reduced to a human-readable message.
///
/// `kind` keeps the provider's error type (e.g. `NotAuthorizedException`) for
/// logs only; callers never branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
    kind: Option<String>,
}

impl ProviderError {
    /// Build an error from a plain message, falling back to [`UNKNOWN_ERROR`]
    /// when the message is empty.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            },
            kind: None,
        }
    }

    /// Build an error from whatever the provider returned as an error payload.
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        let kind = value
            .and_then(|v| v.get("__type"))
            .and_then(Value::as_str)
            .map(error_kind);
        Self {
            message: normalize_message(value),
            kind,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}

// The URL is the provider endpoint and stays out of client-facing messages.
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.without_url().to_string())
    }
}

/// Extract a readable message from a provider error payload.
///
/// Objects yield their `message` (or `Message`) field, strings yield
/// themselves, anything else yields [`UNKNOWN_ERROR`].
#[must_use]
pub fn normalize_message(value: Option<&Value>) -> String {
    let message = match value {
        Some(Value::Object(map)) => map
            .get("message")
            .or_else(|| map.get("Message"))
            .and_then(Value::as_str),
        Some(Value::String(text)) => Some(text.as_str()),
        _ => None,
    };

    match message {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => UNKNOWN_ERROR.to_string(),
    }
}

// `__type` may be namespaced: "com.amazonaws.cognito#NotAuthorizedException"
fn error_kind(raw: &str) -> String {
    raw.rsplit('#').next().unwrap_or(raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_object_with_message() {
        let value = json!({ "message": "X" });
        assert_eq!(normalize_message(Some(&value)), "X");
    }

    #[test]
    fn normalize_object_with_capitalized_message() {
        let value = json!({ "__type": "UserNotFoundException", "Message": "User does not exist." });
        assert_eq!(normalize_message(Some(&value)), "User does not exist.");
    }

    #[test]
    fn normalize_raw_string() {
        let value = json!("Y");
        assert_eq!(normalize_message(Some(&value)), "Y");
    }

    #[test]
    fn normalize_null_and_absent() {
        assert_eq!(normalize_message(Some(&Value::Null)), UNKNOWN_ERROR);
        assert_eq!(normalize_message(None), UNKNOWN_ERROR);
    }

    #[test]
    fn normalize_unusable_values() {
        assert_eq!(normalize_message(Some(&json!(42))), UNKNOWN_ERROR);
        assert_eq!(normalize_message(Some(&json!([1, 2]))), UNKNOWN_ERROR);
        assert_eq!(normalize_message(Some(&json!({ "message": 7 }))), UNKNOWN_ERROR);
        assert_eq!(normalize_message(Some(&json!({ "message": "" }))), UNKNOWN_ERROR);
        assert_eq!(normalize_message(Some(&json!(""))), UNKNOWN_ERROR);
    }

    #[test]
    fn provider_error_keeps_kind() {
        let value = json!({
            "__type": "com.amazonaws.cognito#NotAuthorizedException",
            "message": "Incorrect username or password."
        });
        let err = ProviderError::from_value(Some(&value));
        assert_eq!(err.message(), "Incorrect username or password.");
        assert_eq!(err.kind(), Some("NotAuthorizedException"));
        assert_eq!(err.to_string(), "Incorrect username or password.");
    }

    #[tokio::test]
    async fn transport_error_hides_endpoint() {
        let Err(err) = reqwest::get("http://127.0.0.1:1/internal-endpoint").await else {
            return;
        };
        assert!(err.url().is_some());

        let provider_err = ProviderError::from(err);
        assert!(!provider_err.message().contains("127.0.0.1"));
        assert!(!provider_err.message().contains("internal-endpoint"));
        assert!(!provider_err.message().is_empty());
    }

    #[test]
    fn provider_error_new_empty_is_sentinel() {
        assert_eq!(ProviderError::new("").message(), UNKNOWN_ERROR);
        assert_eq!(ProviderError::new("boom").message(), "boom");
    }
}
