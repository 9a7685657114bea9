//! TravelGuide configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::GuideError;

/// Main TravelGuide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Generation API configuration
    pub llm: LlmConfig,

    /// Itinerary output configuration
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .travelguide.yml
        let local_config = PathBuf::from(".travelguide.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/travelguide/travelguide.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("travelguide").join("travelguide.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level so logging can start before the full load
    ///
    /// Errors are swallowed; the full load reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".travelguide.yml")];
                if let Some(config_dir) = dirs::config_dir() {
                    paths.push(config_dir.join("travelguide").join("travelguide.yml"));
                }
                paths
            }
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Resolve the immutable generation settings, reading the API key from the environment
    ///
    /// Fails with `ConfigInvalid` when the key variable is unset or blank.
    pub fn resolve(&self) -> Result<GenerationConfig, GuideError> {
        debug!(api_key_env = %self.llm.api_key_env, model = %self.llm.model, "resolve: called");
        let api_key = std::env::var(&self.llm.api_key_env).unwrap_or_default();
        if api_key.trim().is_empty() {
            debug!("resolve: api key missing");
            return Err(GuideError::ConfigInvalid(format!(
                "{} not found. Set the {} environment variable.",
                self.llm.api_key_env, self.llm.api_key_env
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(GuideError::ConfigInvalid("llm.model must not be empty".to_string()));
        }

        Ok(GenerationConfig {
            api_key,
            model: self.llm.model.clone(),
            base_url: self.llm.base_url.trim_end_matches('/').to_string(),
            temperature: self.llm.temperature,
            top_p: self.llm.top_p,
            top_k: self.llm.top_k,
            max_output_tokens: self.llm.max_output_tokens,
            output_format: self.llm.output_format,
            timeout: self.llm.timeout_ms.map(Duration::from_millis),
            probe_on_start: self.llm.probe_on_start,
        })
    }
}

/// Format requested for generated output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "text/plain")]
    PlainText,
}

impl OutputFormat {
    /// MIME type sent as `responseMimeType`
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
        }
    }
}

/// Generation API configuration as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier, e.g. "models/gemini-flash-lite-latest"
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    pub temperature: f32,

    #[serde(rename = "top-p")]
    pub top_p: f32,

    #[serde(rename = "top-k")]
    pub top_k: u32,

    /// Maximum tokens per response
    #[serde(rename = "max-output-tokens")]
    pub max_output_tokens: u32,

    #[serde(rename = "output-format")]
    pub output_format: OutputFormat,

    /// Request timeout in milliseconds; unset leaves the HTTP client default
    #[serde(rename = "timeout-ms", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Send a "Hello" probe at startup to verify the key and model
    #[serde(rename = "probe-on-start")]
    pub probe_on_start: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "models/gemini-flash-lite-latest".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.4,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
            output_format: OutputFormat::PlainText,
            timeout_ms: None,
            probe_on_start: true,
        }
    }
}

/// Where saved itineraries go
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory used by --save when --output-dir is not given
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from(".") }
    }
}

/// Resolved, immutable settings handed to the generation client
///
/// Built once at startup by [`Config::resolve`].
#[derive(Clone, PartialEq)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub output_format: OutputFormat,
    pub timeout: Option<Duration>,
    pub probe_on_start: bool,
}

impl GenerationConfig {
    /// Default decoding parameters with the given key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let llm = LlmConfig::default();
        Self {
            api_key: api_key.into(),
            model: llm.model,
            base_url: llm.base_url,
            temperature: llm.temperature,
            top_p: llm.top_p,
            top_k: llm.top_k,
            max_output_tokens: llm.max_output_tokens,
            output_format: llm.output_format,
            timeout: None,
            probe_on_start: llm.probe_on_start,
        }
    }

    /// Model path relative to the API version, always prefixed with "models/"
    pub fn model_path(&self) -> String {
        if self.model.starts_with("models/") || self.model.starts_with("tunedModels/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("output_format", &self.output_format)
            .field("timeout", &self.timeout)
            .field("probe_on_start", &self.probe_on_start)
            .finish()
    }
}
