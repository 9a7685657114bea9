//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use tracing::{debug, info};

use super::embedded;
use crate::trip::TripRequest;

/// Section headers every itinerary prompt asks for, in order
pub const SECTION_HEADERS: [&str; 6] = [
    "DESTINATION OVERVIEW",
    "DAY-BY-DAY ITINERARY",
    "DINING RECOMMENDATIONS",
    "ACCOMMODATION SUGGESTIONS",
    "TRANSPORTATION TIPS",
    "TRAVEL TIPS & ESSENTIALS",
];

const ITINERARY_TEMPLATE: &str = "itinerary";

/// Render the itinerary prompt from the embedded template
///
/// Pure: identical requests always produce identical prompts.
pub fn build_prompt(request: &TripRequest) -> String {
    debug!(destination = %request.destination(), "build_prompt: called");
    new_engine()
        .render_template(embedded::ITINERARY, request)
        .expect("embedded itinerary template should render")
}

fn new_engine() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    // prompts are plain text, not HTML
    hbs.register_escape_fn(handlebars::no_escape);
    hbs
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.travelguide/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at `root`
    ///
    /// Looks for `.travelguide/prompts/` and `prompts/` under the root.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        debug!(?root, "PromptLoader::new: called");
        let user_dir = root.join(".travelguide/prompts");
        let repo_dir = root.join("prompts");

        let user_dir_exists = user_dir.exists();
        let repo_dir_exists = repo_dir.exists();
        debug!(
            ?user_dir,
            %user_dir_exists,
            ?repo_dir,
            %repo_dir_exists,
            "PromptLoader::new: checking directories"
        );

        Self {
            hbs: new_engine(),
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
            repo_dir: if repo_dir_exists { Some(repo_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: new_engine(),
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.travelguide/prompts/{name}.pmt`
    /// 2. Repo default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        for dir in [&self.user_dir, &self.repo_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found on disk");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        debug!("PromptLoader::load_template: trying embedded fallback");
        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render the itinerary prompt, honoring any on-disk override
    pub fn render_itinerary(&self, request: &TripRequest) -> Result<String> {
        let template = self.load_template(ITINERARY_TEMPLATE)?;
        info!(
            "Rendering template '{}' for {} ({} days, {} nights)",
            ITINERARY_TEMPLATE,
            request.destination(),
            request.days(),
            request.nights()
        );

        self.hbs
            .render_template(&template, request)
            .map_err(|e| eyre!("Failed to render template {}: {}", ITINERARY_TEMPLATE, e))
    }
}
