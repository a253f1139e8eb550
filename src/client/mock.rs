//! Scripted [`StegoService`] for tests.
//!
//! Responses are queued per operation and handed out in order. Every call is
//! recorded so tests can assert on what would have gone over the wire.
//!
//! ```ignore
//! let mock = MockStegoService::new();
//! mock.push_encode(Ok(EncodeResult { file_id: "abc123".into(), key: "k-xyz".into() }));
//! page.submit(&mock).await?;
//! assert_eq!(mock.calls().len(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::client::StegoService;
use super::error::ApiError;
use crate::common::messages::{DecodeResult, EncodeResult, HealthStatus};
use crate::upload::SelectedFile;

/// Record of a call made to the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Encode { file_name: String, message: String },
    Decode { file_name: String, key: String },
    Download { file_id: String },
    HealthCheck,
}

#[derive(Default)]
struct Script {
    encode: VecDeque<Result<EncodeResult, ApiError>>,
    decode: VecDeque<Result<DecodeResult, ApiError>>,
    download: VecDeque<Result<Vec<u8>, ApiError>>,
    health: VecDeque<Result<HealthStatus, ApiError>>,
    calls: Vec<MockCall>,
}

/// Mock steganography service. Clones share the same script.
#[derive(Clone, Default)]
pub struct MockStegoService {
    script: Arc<Mutex<Script>>,
}

impl MockStegoService {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push_encode(&self, response: Result<EncodeResult, ApiError>) {
        self.script().encode.push_back(response);
    }

    pub fn push_decode(&self, response: Result<DecodeResult, ApiError>) {
        self.script().decode.push_back(response);
    }

    pub fn push_download(&self, response: Result<Vec<u8>, ApiError>) {
        self.script().download.push_back(response);
    }

    pub fn push_health(&self, response: Result<HealthStatus, ApiError>) {
        self.script().health.push_back(response);
    }

    /// All calls made so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.script().calls.clone()
    }
}

fn unscripted<T>(operation: &str) -> Result<T, ApiError> {
    Err(ApiError::network(format!("no scripted response for {}", operation)))
}

#[async_trait]
impl StegoService for MockStegoService {
    async fn encode(&self, file: &SelectedFile, message: &str) -> Result<EncodeResult, ApiError> {
        let mut script = self.script();
        script.calls.push(MockCall::Encode {
            file_name: file.name().to_string(),
            message: message.to_string(),
        });
        script.encode.pop_front().unwrap_or_else(|| unscripted("encode"))
    }

    async fn decode(&self, file: &SelectedFile, key: &str) -> Result<DecodeResult, ApiError> {
        let mut script = self.script();
        script.calls.push(MockCall::Decode {
            file_name: file.name().to_string(),
            key: key.to_string(),
        });
        script.decode.pop_front().unwrap_or_else(|| unscripted("decode"))
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>, ApiError> {
        let mut script = self.script();
        script.calls.push(MockCall::Download {
            file_id: file_id.to_string(),
        });
        script.download.pop_front().unwrap_or_else(|| unscripted("download"))
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let mut script = self.script();
        script.calls.push(MockCall::HealthCheck);
        script.health.pop_front().unwrap_or_else(|| unscripted("health"))
    }
}
