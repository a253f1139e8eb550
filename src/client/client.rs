//! # Transport Client
//!
//! Talks to the external steganography service. Four operations, each a
//! single request/response exchange:
//!
//! | Operation        | Request                                   | Success body        |
//! |------------------|-------------------------------------------|---------------------|
//! | `encode`         | `POST /encode`, multipart `file`+`message` | `{file_id, key}`   |
//! | `decode`         | `POST /decode`, multipart `file`+`key`     | `{message}`        |
//! | `download`       | `GET /download/{file_id}` (id escaped)    | raw image bytes     |
//! | `health_check`   | `GET /health`                             | anything 2xx        |
//!
//! ## Failure policy
//!
//! - No retries and no queuing. Retrying is up to the user.
//! - Every request is bounded by the configured timeout; hitting it is a
//!   network error like any other.
//! - Non-2xx responses become [`ApiError::Service`] with the service's
//!   `detail` string, or a per-operation fallback when there is none.
//!
//! Callers validate inputs before calling in. The one exception is the
//! download id, which is escaped into a single path segment and may not be
//! empty, `.` or `..`.

use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::ApiError;
use crate::common::config::ApiSettings;
use crate::common::messages::{DecodeResult, EncodeResult, ErrorBody, HealthStatus};
use crate::upload::SelectedFile;

const ENCODE_FALLBACK: &str = "Failed to encode message";
const DECODE_FALLBACK: &str = "Failed to decode message";
const DOWNLOAD_FALLBACK: &str = "Failed to download image";

/// The steganography service as seen by the pages.
///
/// Pages only depend on this trait, so tests can hand them a double instead
/// of a live service.
#[async_trait]
pub trait StegoService: Send + Sync {
    /// Hides `message` in `file`; the service keeps the result and returns a reference to it.
    async fn encode(&self, file: &SelectedFile, message: &str) -> Result<EncodeResult, ApiError>;

    /// Recovers the message hidden in `file` using `key`.
    async fn decode(&self, file: &SelectedFile, key: &str) -> Result<DecodeResult, ApiError>;

    /// Fetches the encoded image produced by an earlier `encode`.
    async fn download(&self, file_id: &str) -> Result<Vec<u8>, ApiError>;

    /// Liveness probe.
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;
}

/// [`StegoService`] over HTTP using reqwest.
#[derive(Debug, Clone)]
pub struct HttpStegoClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpStegoClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let client = HttpStegoClient::new("http://localhost:8000", Duration::from_secs(30));
    /// let status = client.health_check().await?;
    /// ```
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            timeout,
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self::new(settings.base_url.clone(), settings.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base_url}/download/{file_id}` with the id percent-encoded as a
    /// single path segment, so `/`, `?` and `#` inside it stay part of the id.
    fn download_url(&self, file_id: &str) -> Result<reqwest::Url, ApiError> {
        if matches!(file_id, "" | "." | "..") {
            return Err(ApiError::InvalidFileId {
                file_id: file_id.to_string(),
            });
        }

        let mut url = reqwest::Url::parse(&self.base_url).map_err(ApiError::network)?;
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::network(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .push("download")
            .push(file_id);
        Ok(url)
    }

    fn image_form(file: &SelectedFile, field: &str, value: &str) -> Result<Form, ApiError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.media_type())
            .map_err(ApiError::network)?;

        Ok(Form::new()
            .part("file", part)
            .text(field.to_string(), value.to_string()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        request.timeout(self.timeout).send().await.map_err(|e| {
            error!("❌ Request to {} failed: {}", self.base_url, e);
            ApiError::network(e)
        })
    }
}

/// Turns a non-2xx response into [`ApiError::Service`].
async fn service_error(response: reqwest::Response, fallback: &str) -> ApiError {
    let status = response.status().as_u16();
    let detail = match response.json::<ErrorBody>().await {
        Ok(body) => body
            .detail_text()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
        Err(_) => fallback.to_string(),
    };

    warn!("⚠️  Service answered {}: {}", status, detail);
    ApiError::Service { status, detail }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(service_error(response, fallback).await);
    }

    response.json::<T>().await.map_err(|e| {
        error!("❌ Malformed response body: {}", e);
        ApiError::network(e)
    })
}

#[async_trait]
impl StegoService for HttpStegoClient {
    async fn encode(&self, file: &SelectedFile, message: &str) -> Result<EncodeResult, ApiError> {
        info!(
            "📤 Encoding {} chars into {} ({} bytes)",
            message.chars().count(),
            file.name(),
            file.size()
        );

        let form = Self::image_form(file, "message", message)?;
        let response = self
            .send(self.http.post(self.url("/encode")).multipart(form))
            .await?;
        let result: EncodeResult = read_json(response, ENCODE_FALLBACK).await?;

        info!("✅ Encoded into file {}", result.file_id);
        Ok(result)
    }

    async fn decode(&self, file: &SelectedFile, key: &str) -> Result<DecodeResult, ApiError> {
        info!("📤 Decoding {} ({} bytes)", file.name(), file.size());

        let form = Self::image_form(file, "key", key)?;
        let response = self
            .send(self.http.post(self.url("/decode")).multipart(form))
            .await?;
        let result: DecodeResult = read_json(response, DECODE_FALLBACK).await?;

        info!("✅ Decoded {} chars", result.message.chars().count());
        Ok(result)
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>, ApiError> {
        info!("📥 Downloading encoded image {}", file_id);

        let url = self.download_url(file_id).map_err(|e| {
            warn!("⚠️  Cannot build download URL for {:?}: {:?}", file_id, e);
            e
        })?;
        let response = self.send(self.http.get(url)).await?;

        if !response.status().is_success() {
            return Err(service_error(response, DOWNLOAD_FALLBACK).await);
        }

        let bytes = response.bytes().await.map_err(ApiError::network)?;
        info!("✅ Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let unavailable = |reason: String| {
            warn!("⚠️  Health check failed: {}", reason);
            ApiError::Unavailable { reason }
        };

        let response = self
            .http
            .get(self.url("/health"))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("status {}", status)));
        }

        // Any 2xx is healthy; the body is informational.
        Ok(response.json::<HealthStatus>().await.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpStegoClient::new("http://localhost:8000/", Duration::from_secs(30));
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/encode"), "http://localhost:8000/encode");
    }

    #[test]
    fn test_download_url_escapes_file_id() {
        let client = HttpStegoClient::new("http://localhost:8000", Duration::from_secs(30));
        let url = |id: &str| client.download_url(id).unwrap().to_string();

        assert_eq!(url("abc123"), "http://localhost:8000/download/abc123");
        assert_eq!(url("a/b?c"), "http://localhost:8000/download/a%2Fb%3Fc");
        assert_eq!(url("../health"), "http://localhost:8000/download/..%2Fhealth");
        assert_eq!(url("a#frag"), "http://localhost:8000/download/a%23frag");

        let nested = HttpStegoClient::new("http://gateway/stego/", Duration::from_secs(30));
        assert_eq!(
            nested.download_url("x").unwrap().as_str(),
            "http://gateway/stego/download/x"
        );
    }

    #[test]
    fn test_download_url_rejects_dot_segments() {
        let client = HttpStegoClient::new("http://localhost:8000", Duration::from_secs(30));
        for id in ["", ".", ".."] {
            assert_eq!(
                client.download_url(id),
                Err(ApiError::InvalidFileId {
                    file_id: id.to_string()
                })
            );
        }
    }

    #[test]
    fn test_from_settings() {
        let settings = ApiSettings {
            base_url: "http://stego:9000".to_string(),
            timeout_secs: 7,
        };
        let client = HttpStegoClient::from_settings(&settings);
        assert_eq!(client.base_url(), "http://stego:9000");
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }
}
