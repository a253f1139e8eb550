//! # Message Protocol
//!
//! Payloads exchanged with the steganography service over HTTP.
//!
//! Requests are multipart forms (see [`crate::client`]); responses are JSON.
//! Only the fields the client relies on are required, anything else the
//! service adds is ignored.

use serde::{Deserialize, Serialize};

/// **Encode Response**
///
/// Returned by `POST /encode` once the message is hidden.
///
/// # Fields
/// - `file_id`: Opaque reference to the encoded image held by the service
/// - `key`: Secret key needed to reveal the message again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeResult {
    pub file_id: String,
    pub key: String,
}

/// **Decode Response**
///
/// Returned by `POST /decode` with the recovered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResult {
    pub message: String,
}

/// **Health Response**
///
/// Body of `GET /health`. Any 2xx counts as healthy, so both fields are
/// informational and may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

/// **Error Response**
///
/// Body of a non-2xx response. `detail` is usually a string, but validation
/// failures can carry a list of objects instead, so it is kept untyped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The human-readable detail, if the service sent one.
    pub fn detail_text(&self) -> Option<&str> {
        match &self.detail {
            Some(serde_json::Value::String(text)) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_result_ignores_extra_fields() {
        let body = r#"{"status":"success","key":"k-xyz","file_id":"abc123","message":"Message successfully hidden in image"}"#;
        let result: EncodeResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.file_id, "abc123");
        assert_eq!(result.key, "k-xyz");
    }

    #[test]
    fn test_error_detail_text() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Decryption failed"}"#).unwrap();
        assert_eq!(body.detail_text(), Some("Decryption failed"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","key"],"msg":"field required"}]}"#)
                .unwrap();
        assert_eq!(body.detail_text(), None);

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.detail_text(), None);
    }

    #[test]
    fn test_health_status_is_lenient() {
        let status: HealthStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status, HealthStatus::default());

        let status: HealthStatus =
            serde_json::from_str(r#"{"status":"healthy","service":"hideout-api"}"#).unwrap();
        assert_eq!(status.status.as_deref(), Some("healthy"));
    }
}
