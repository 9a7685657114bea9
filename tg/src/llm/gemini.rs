//! Gemini API client implementation
//!
//! Implements the TextGenerator trait for the Generative Language v1beta REST API.
//! One blocking round trip per call: no retries, no streaming.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, ListModelsResponse};
use super::{LlmError, ModelInfo, TextGenerator};
use crate::config::GenerationConfig;

const API_VERSION: &str = "v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Largest page the models endpoint serves
const MODELS_PAGE_SIZE: &str = "1000";

/// Gemini API client
pub struct GeminiClient {
    config: GenerationConfig,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from resolved configuration
    pub fn from_config(config: &GenerationConfig) -> Result<Self, LlmError> {
        debug!(?config, "from_config: called");
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(LlmError::Network)?;

        Ok(Self {
            config: config.clone(),
            http,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{}/{}:generateContent",
            self.config.base_url,
            API_VERSION,
            self.config.model_path()
        )
    }

    fn models_url(&self) -> String {
        format!("{}/{}/models", self.config.base_url, API_VERSION)
    }

    /// Attach the key, send, and decode a 2xx JSON body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, LlmError> {
        let response = request
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = check_status(response).await?;
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        match self.config.timeout {
            Some(timeout) if e.is_timeout() => {
                debug!(?timeout, "transport_error: timed out");
                LlmError::Timeout(timeout)
            }
            _ => {
                debug!(error = %e, "transport_error: network error");
                LlmError::Network(e)
            }
        }
    }
}

/// Turn non-2xx responses into `ApiError`, preferring the API's own message
async fn check_status(response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(text);
    debug!(status = status.as_u16(), %message, "check_status: API error");
    Err(LlmError::ApiError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_content(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(model = %self.config.model, prompt_len = prompt.len(), "generate_content: called");
        let body = GenerateContentRequest::user_text(prompt, &self.config);

        let response: GenerateContentResponse = self.send(self.http.post(self.generate_url()).json(&body)).await?;

        if let Some(usage) = &response.usage_metadata {
            info!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "generate_content: usage"
            );
        }

        if let Some(text) = response.text() {
            return Ok(text);
        }
        match response.block_reason() {
            Some(reason) => {
                warn!(%reason, "generate_content: response blocked");
                Err(LlmError::Blocked(reason))
            }
            None => {
                warn!(candidates = response.candidates.len(), "generate_content: empty response");
                Err(LlmError::InvalidResponse("empty response".to_string()))
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        debug!("list_models: called");
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut request = self.http.get(self.models_url()).query(&[("pageSize", MODELS_PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListModelsResponse = self.send(request).await?;
            debug!(count = page.models.len(), "list_models: page received");
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if !seen_tokens.insert(token.clone()) => {
                    warn!(%token, "list_models: page token repeated");
                    return Err(LlmError::InvalidResponse(format!(
                        "models listing repeated page token '{}'",
                        token
                    )));
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}
