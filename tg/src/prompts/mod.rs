//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for itinerary requests.
//!
//! Template loading chain:
//! 1. `.travelguide/prompts/{name}.pmt` (user override)
//! 2. `prompts/{name}.pmt` (repo default)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{PromptLoader, SECTION_HEADERS, build_prompt};
