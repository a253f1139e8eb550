use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use hideout::client::{ApiError, HttpStegoClient, StegoService, NETWORK_ERROR_MESSAGE};
use hideout::common::messages::{DecodeResult, EncodeResult, HealthStatus};
use hideout::pages::{DecodePage, EncodePage, Phase, View};
use hideout::upload::SelectedFile;
use hideout::validation::ValidationError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_of_size(size: usize) -> SelectedFile {
    let mut bytes = vec![137u8, 80, 78, 71, 13, 10, 26, 10];
    bytes.resize(size, 0);
    SelectedFile::new("holiday.png", "image/png", bytes)
}

/// Keeps messages in memory keyed by the key it hands out.
#[derive(Default)]
struct InMemoryVault {
    messages: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl StegoService for InMemoryVault {
    async fn encode(&self, _file: &SelectedFile, message: &str) -> Result<EncodeResult, ApiError> {
        let mut messages = self.messages.lock().unwrap();
        let key = format!("k-{}", messages.len());
        messages.insert(key.clone(), message.to_string());
        Ok(EncodeResult {
            file_id: format!("file-{}", messages.len()),
            key,
        })
    }

    async fn decode(&self, _file: &SelectedFile, key: &str) -> Result<DecodeResult, ApiError> {
        match self.messages.lock().unwrap().get(key) {
            Some(message) => Ok(DecodeResult {
                message: message.clone(),
            }),
            None => Err(ApiError::Service {
                status: 500,
                detail: "Failed to decode: Decryption failed".to_string(),
            }),
        }
    }

    async fn download(&self, _file_id: &str) -> Result<Vec<u8>, ApiError> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus::default())
    }
}

#[tokio::test]
async fn test_encode_scenario_shows_copyable_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/encode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "file_id": "abc123",
            "key": "k-xyz"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = HttpStegoClient::new(server.uri(), Duration::from_secs(5));

    let mut page = EncodePage::new();
    let previews = page.upload().preview_gauge();
    page.select_file(png_of_size(2 * 1024 * 1024)).unwrap();
    assert_eq!(previews.live(), 1);
    page.set_message("hello world").unwrap();
    page.submit(&client).await.unwrap();
    assert_eq!(previews.live(), 0);

    let result = page.phase().result().unwrap();
    assert_eq!(result.file_id, "abc123");
    assert_eq!(result.key, "k-xyz");

    let screen = page.render();
    assert!(screen.contains("Decryption Key"));
    // the key sits alone on its line so it can be copied as-is
    assert!(screen.lines().any(|line| line == "k-xyz"));
}

#[tokio::test]
async fn test_oversized_jpeg_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = HttpStegoClient::new(server.uri(), Duration::from_secs(5));

    let mut page = EncodePage::new();
    let huge = SelectedFile::new("huge.jpg", "image/jpeg", vec![0; 15 * 1024 * 1024]);
    let err = page.select_file(huge).unwrap_err();
    assert_eq!(err.to_string(), "File size must be less than 10MB");

    page.set_message("hello").unwrap();
    assert!(!page.can_submit());
    assert!(matches!(
        page.submit(&client).await,
        Err(ValidationError::IncompleteForm(_))
    ));
}

#[tokio::test]
async fn test_wrong_key_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/decode"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "detail": "Decryption failed" })),
        )
        .mount(&server)
        .await;
    let client = HttpStegoClient::new(server.uri(), Duration::from_secs(5));

    let mut page = DecodePage::new();
    page.select_file(png_of_size(4096)).unwrap();
    page.set_key("k-wrong");
    page.submit(&client).await.unwrap();

    assert_eq!(*page.phase(), Phase::Failed("Decryption failed".to_string()));
    assert!(page.render().contains("Decoding Failed\nDecryption failed"));

    // input preserved for another try
    assert_eq!(page.key(), "k-wrong");
    assert!(page.selected_file().is_some());
    assert!(page.can_submit());
}

#[tokio::test]
async fn test_slow_service_times_out_and_reenables_submit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/encode"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "file_id": "late", "key": "late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let client = HttpStegoClient::new(server.uri(), Duration::from_millis(250));

    let mut page = EncodePage::new();
    page.select_file(png_of_size(1024)).unwrap();
    page.set_message("hello").unwrap();
    page.submit(&client).await.unwrap();

    assert_eq!(page.phase().error(), Some(NETWORK_ERROR_MESSAGE));
    assert!(page.can_submit());
    assert!(!page.upload().is_disabled());
}

#[tokio::test]
async fn test_round_trip_preserves_message() {
    let vault = InMemoryVault::default();

    let long = "ü".repeat(1000);
    for message in ["x", "hello world", "line one\nline two", long.as_str()] {
        let mut encode = EncodePage::new();
        encode.select_file(png_of_size(1024)).unwrap();
        encode.set_message(message).unwrap();
        encode.submit(&vault).await.unwrap();
        let key = encode.phase().result().unwrap().key.clone();

        let mut decode = DecodePage::new();
        decode.select_file(png_of_size(1024)).unwrap();
        decode.set_key(key);
        decode.submit(&vault).await.unwrap();

        let revealed = &decode.phase().result().unwrap().message;
        assert_eq!(revealed, message);
        assert_eq!(revealed.chars().count(), message.chars().count());
    }

    let mut decode = DecodePage::new();
    decode.select_file(png_of_size(1024)).unwrap();
    decode.set_key("k-unknown");
    decode.submit(&vault).await.unwrap();
    assert_eq!(
        decode.phase().error(),
        Some("Failed to decode: Decryption failed")
    );
}
