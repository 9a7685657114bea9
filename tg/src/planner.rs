//! Itinerary pipeline: validated request → prompt → generation → itinerary

use tracing::{debug, info};

use crate::error::GuideError;
use crate::llm::{GenerationClient, TextGenerator};
use crate::prompts::PromptLoader;
use crate::trip::{Itinerary, TripRequest};

/// Turns trip requests into itineraries using one generation client
pub struct Planner<G: TextGenerator> {
    client: GenerationClient<G>,
    prompts: PromptLoader,
}

impl<G: TextGenerator> Planner<G> {
    pub fn new(client: GenerationClient<G>, prompts: PromptLoader) -> Self {
        Self { client, prompts }
    }

    pub fn client(&self) -> &GenerationClient<G> {
        &self.client
    }

    /// Render the prompt for a request without calling the API
    ///
    /// Only an on-disk template override can fail to render, so failures are
    /// configuration errors.
    pub fn prompt_for(&self, request: &TripRequest) -> Result<String, GuideError> {
        self.prompts
            .render_itinerary(request)
            .map_err(|e| GuideError::ConfigInvalid(e.to_string()))
    }

    /// Generate an itinerary for an already-validated request
    pub async fn plan(&self, request: &TripRequest) -> Result<Itinerary, GuideError> {
        debug!(destination = %request.destination(), "Planner::plan: called");
        let prompt = self.prompt_for(request)?;
        let text = self.client.generate(&prompt).await?;
        info!(
            destination = %request.destination(),
            chars = text.len(),
            "Itinerary generated"
        );
        Ok(Itinerary::new(request, text))
    }

    /// Validate raw form values, then generate
    ///
    /// Validation failures return before any network call.
    pub async fn plan_from_form(
        &self,
        destination: &str,
        days: &str,
        nights: &str,
        interests: &str,
    ) -> Result<Itinerary, GuideError> {
        let request = TripRequest::from_form(destination, days, nights, interests)?;
        self.plan(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::error::ErrorKind;
    use crate::llm::mock::MockGenerator;
    use tempfile::TempDir;

    async fn planner(replies: Vec<Result<String, String>>) -> Planner<MockGenerator> {
        let mut config = GenerationConfig::with_api_key("k");
        config.probe_on_start = false;
        let client = GenerationClient::with_generator(config, MockGenerator::new(replies))
            .await
            .unwrap();
        Planner::new(client, PromptLoader::embedded_only())
    }

    #[tokio::test]
    async fn test_plan_returns_itinerary() {
        let planner = planner(vec![Ok("OK".to_string())]).await;
        let request = TripRequest::new("Tokyo", 5, 4, Some("anime, food")).unwrap();

        let itinerary = planner.plan(&request).await.unwrap();
        assert_eq!(itinerary.text, "OK");
        assert_eq!(itinerary.download_filename(), "Tokyo_itinerary.txt");
    }

    #[tokio::test]
    async fn test_invalid_form_never_calls_api() {
        let planner = planner(vec![Ok("OK".to_string())]).await;

        let err = planner.plan_from_form("", "3", "2", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        let err = planner.plan_from_form("Rome", "0", "2", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        let err = planner.plan_from_form("Rome", "3", "-1", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        assert_eq!(planner.client().generator().call_count(), 0);
    }

    #[tokio::test]
    async fn test_form_limits_never_call_api() {
        let planner = planner(vec![Ok("OK".to_string())]).await;

        let err = planner.plan_from_form("Rome", "31", "2", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(planner.client().generator().call_count(), 0);
    }

    #[tokio::test]
    async fn test_broken_template_override_is_config_invalid() {
        let temp = TempDir::new().unwrap();
        let repo_dir = temp.path().join("prompts");
        std::fs::create_dir_all(&repo_dir).unwrap();
        std::fs::write(repo_dir.join("itinerary.pmt"), "{{#if destination}}unclosed").unwrap();

        let mut config = GenerationConfig::with_api_key("k");
        config.probe_on_start = false;
        let client = GenerationClient::with_generator(config, MockGenerator::new(vec![Ok("OK".to_string())]))
            .await
            .unwrap();
        let planner = Planner::new(client, PromptLoader::new(temp.path()));
        let request = TripRequest::new("Tokyo", 5, 4, None).unwrap();

        let err = planner.plan(&request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(planner.client().generator().call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let planner = planner(vec![Err("503 unavailable".to_string())]).await;

        let err = planner.plan_from_form("Paris, France", "3", "2", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GenerationFailed);
    }
}
