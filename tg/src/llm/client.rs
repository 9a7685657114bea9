//! TextGenerator trait definition

use async_trait::async_trait;

use super::{LlmError, ModelInfo};

/// Stateless text-generation backend - each call is an independent single-turn request
///
/// This is the seam between the itinerary pipeline and the remote API.
/// `GeminiClient` is the production implementation; tests substitute stubs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and wait for the complete generated text
    async fn generate_content(&self, prompt: &str) -> Result<String, LlmError>;

    /// Every model the backend knows about, with its supported methods
    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError>;
}
