//! Integration tests for the itinerary pipeline
//!
//! Drive the public API end to end with a stub backend and with the real
//! Gemini client pointed at a local mock server.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use travelguide::{
    ErrorKind, GenerationClient, GenerationConfig, LlmError, ModelInfo, Planner, PromptLoader, TextGenerator,
    TripRequest, build_prompt,
};

/// Backend that always answers with the same text and records prompts
struct StubGenerator {
    reply: String,
    calls: Arc<AtomicUsize>,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate_content(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        Ok(vec![])
    }
}

fn config_for(server: &MockServer) -> GenerationConfig {
    let mut config = GenerationConfig::with_api_key("integration-key");
    config.base_url = server.uri();
    config
}

// =============================================================================
// Stub backend
// =============================================================================

#[tokio::test]
async fn test_tokyo_end_to_end_with_stub() {
    let request = TripRequest::new("Tokyo", 5, 4, Some("anime, food")).unwrap();

    let prompt = build_prompt(&request);
    assert_eq!(prompt.matches("Tokyo").count(), 1);
    assert_eq!(prompt.matches('5').count(), 1);
    assert_eq!(prompt.matches('4').count(), 1);
    assert_eq!(prompt.matches("anime, food").count(), 1);

    let client = GenerationClient::with_generator(GenerationConfig::with_api_key("k"), StubGenerator::new("OK"))
        .await
        .unwrap();
    let planner = Planner::new(client, PromptLoader::embedded_only());

    let itinerary = planner.plan(&request).await.unwrap();
    assert_eq!(itinerary.text, "OK");
    assert_eq!(itinerary.download_filename(), "Tokyo_itinerary.txt");

    // probe + one generation, and the generation used the built prompt
    let generator = planner.client().generator();
    assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    assert_eq!(generator.prompts.lock().unwrap()[1], prompt);
}

#[tokio::test]
async fn test_missing_credential_never_probes() {
    let stub = StubGenerator::new("OK");
    let calls = Arc::clone(&stub.calls);

    let err = GenerationClient::with_generator(GenerationConfig::with_api_key(""), stub)
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_saved_itinerary_lands_in_output_dir() {
    let temp = TempDir::new().unwrap();
    let mut config = GenerationConfig::with_api_key("k");
    config.probe_on_start = false;
    let client = GenerationClient::with_generator(config, StubGenerator::new("Sagrada Familia at dawn"))
        .await
        .unwrap();
    let planner = Planner::new(client, PromptLoader::embedded_only());

    let itinerary = planner.plan_from_form("Barcelona, Spain", "2", "1", "").await.unwrap();
    let path = itinerary.save(temp.path()).unwrap();

    assert_eq!(path.file_name().unwrap(), "Barcelona,_Spain_itinerary.txt");
    assert_eq!(std::fs::read_to_string(path).unwrap(), "Sagrada Familia at dawn");
}

// =============================================================================
// Gemini client against a mock server
// =============================================================================

#[tokio::test]
async fn test_initialize_probes_then_generates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-flash-lite-latest:generateContent"))
        .and(body_partial_json(json!({"contents": [{"parts": [{"text": "Hello"}]}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Hi there"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-flash-lite-latest:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Day one: Shibuya"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GenerationClient::initialize(config_for(&server)).await.unwrap();
    let planner = Planner::new(client, PromptLoader::embedded_only());
    let request = TripRequest::new("Tokyo", 5, 4, None).unwrap();

    let itinerary = planner.plan(&request).await.unwrap();
    assert_eq!(itinerary.text, "Day one: Shibuya");
}

#[tokio::test]
async fn test_probe_rejection_is_connection_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let err = GenerationClient::initialize(config_for(&server)).await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::ConnectionFailed);
    assert!(err.message().contains("Permission denied"));
}

#[tokio::test]
async fn test_transport_error_is_generation_failed() {
    // nothing listens on port 1
    let mut config = GenerationConfig::with_api_key("k");
    config.base_url = "http://127.0.0.1:1".to_string();
    config.probe_on_start = false;

    let client = GenerationClient::initialize(config).await.unwrap();
    let err = client.generate("Plan Oslo").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GenerationFailed);
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn test_list_models_only_generation_capable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {"name": "models/gemini-flash-lite-latest", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/aqa", "supportedGenerationMethods": ["generateAnswer"]}
            ]
        })))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.probe_on_start = false;
    let client = GenerationClient::initialize(config).await.unwrap();

    assert_eq!(client.list_models().await.unwrap(), vec!["models/gemini-flash-lite-latest"]);
}
