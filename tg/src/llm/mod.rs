//! Generation client for TravelGuide
//!
//! Wraps a remote text-generation backend behind a client that only exists
//! once it has been configured and (optionally) probed.

use tracing::{debug, info, warn};

mod client;
mod error;
mod gemini;
mod types;

#[cfg(test)]
pub use client::mock;
pub use client::TextGenerator;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{
    Candidate, Content, GENERATE_CONTENT, GenerateContentRequest, GenerateContentResponse, GenerationParams,
    ListModelsResponse, ModelInfo, Part,
};

use crate::config::GenerationConfig;
use crate::error::{ErrorKind, GuideError};

/// Prompt sent at startup to confirm the key and model are usable
pub const PROBE_PROMPT: &str = "Hello";

/// Outcome of a generation call: the full text or a typed failure
pub type GenerationResult = Result<String, GuideError>;

/// A ready-to-use generation client
///
/// The only way to get one is [`GenerationClient::initialize`] (or
/// [`GenerationClient::with_generator`]), so holding a value means the
/// credentials were present and the probe, if enabled, succeeded. There is
/// no reconnect: after a failure the caller builds a new client.
pub struct GenerationClient<G: TextGenerator = GeminiClient> {
    config: GenerationConfig,
    generator: G,
}

impl GenerationClient<GeminiClient> {
    /// Connect to the Gemini API with the given configuration
    pub async fn initialize(config: GenerationConfig) -> Result<Self, GuideError> {
        debug!(?config, "GenerationClient::initialize: called");
        check_credentials(&config)?;
        let generator =
            GeminiClient::from_config(&config).map_err(|e| e.into_guide_error(ErrorKind::ConfigInvalid))?;
        Self::with_generator(config, generator).await
    }
}

impl<G: TextGenerator> GenerationClient<G> {
    /// Build a client over an arbitrary backend, running the same checks as `initialize`
    pub async fn with_generator(config: GenerationConfig, generator: G) -> Result<Self, GuideError> {
        check_credentials(&config)?;

        if config.probe_on_start {
            debug!("GenerationClient::with_generator: sending probe");
            generator
                .generate_content(PROBE_PROMPT)
                .await
                .map_err(|e| e.into_guide_error(ErrorKind::ConnectionFailed))?;
            info!(model = %config.model, "Generation API probe succeeded");
        } else {
            info!(model = %config.model, "Skipping generation API probe");
        }

        Ok(Self { config, generator })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Send one prompt with the configured decoding parameters
    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        debug!(prompt_len = prompt.len(), "GenerationClient::generate: called");
        self.generator.generate_content(prompt).await.map_err(|e| {
            warn!(status = ?e.status(), error = %e, "GenerationClient::generate: failed");
            e.into_guide_error(ErrorKind::GenerationFailed)
        })
    }

    /// Names of remote models that support text generation
    pub async fn list_models(&self) -> Result<Vec<String>, GuideError> {
        debug!("GenerationClient::list_models: called");
        let models = self
            .generator
            .list_models()
            .await
            .map_err(|e| {
                warn!(status = ?e.status(), error = %e, "GenerationClient::list_models: failed");
                e.into_guide_error(ErrorKind::ConnectionFailed)
            })?;

        Ok(models
            .into_iter()
            .filter(ModelInfo::supports_generation)
            .map(|m| m.name)
            .collect())
    }
}

fn check_credentials(config: &GenerationConfig) -> Result<(), GuideError> {
    if config.api_key.trim().is_empty() {
        debug!("check_credentials: api key missing");
        return Err(GuideError::ConfigInvalid("API key is missing".to_string()));
    }
    Ok(())
}
