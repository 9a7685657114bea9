//! TravelGuide - custom itineraries from a text-generation model
//!
//! Collects a destination, trip length and optional interests, renders a
//! fixed-outline prompt, and asks a Gemini model to write the itinerary.
//!
//! # Modules
//!
//! - [`trip`] - Trip request validation and generated itineraries
//! - [`prompts`] - Prompt templates and the request builder
//! - [`llm`] - Generation client and the Gemini backend
//! - [`planner`] - Request → prompt → itinerary pipeline
//! - [`form`] - Interactive trip form
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod trip;

// Re-export commonly used types
pub use config::{Config, GenerationConfig, LlmConfig, OutputFormat};
pub use error::{ErrorKind, GuideError};
pub use llm::{GeminiClient, GenerationClient, GenerationResult, LlmError, ModelInfo, TextGenerator};
pub use planner::Planner;
pub use prompts::{PromptLoader, SECTION_HEADERS, build_prompt};
pub use trip::{Itinerary, TripRequest, download_filename};
