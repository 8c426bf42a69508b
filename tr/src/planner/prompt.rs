//! Prompt templates
//!
//! Templates are Handlebars `.pmt` files. Loading chain:
//! 1. `.travelrad/prompts/{name}.pmt` (per-project override)
//! 2. Embedded copy compiled into the binary

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::domain::TripPreferences;

/// Itinerary request prompt
pub const ITINERARY: &str = include_str!("../../prompts/itinerary.pmt");

/// Role description for the model
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Directory, relative to the project root, holding template overrides
pub const OVERRIDE_DIR: &str = ".travelrad/prompts";

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "itinerary" => Some(ITINERARY),
        "system" => Some(SYSTEM),
        _ => None,
    }
}

/// Values available to the templates
///
/// Every field is already formatted for display, so the templates contain no
/// logic beyond the one conditional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptContext {
    pub full_name: String,
    pub origin: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub travel_mode: String,
    pub return_transport: bool,
    pub budget: String,
    pub traveller_detail: String,
    /// Interests joined with ", " in selection order
    pub interests: String,
    pub pace: String,
}

impl From<&TripPreferences> for PromptContext {
    fn from(prefs: &TripPreferences) -> Self {
        debug!("PromptContext::from: called");
        let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        Self {
            full_name: prefs.full_name.trim().to_string(),
            origin: prefs.origin.trim().to_string(),
            destination: prefs.destination.trim().to_string(),
            start_date: date(prefs.start_date),
            end_date: date(prefs.end_date),
            travel_mode: prefs.travel_mode.map(|m| m.to_string()).unwrap_or_default(),
            return_transport: prefs.return_transport,
            budget: prefs.budget.clone(),
            traveller_detail: prefs.traveller_detail(),
            interests: prefs.interests.join(", "),
            pace: prefs.pace.label().to_string(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    hbs: Handlebars<'static>,
    /// Override directory, when it exists
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader rooted at a project directory
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        let user_dir = project_root.as_ref().join(OVERRIDE_DIR);
        let user_dir_exists = user_dir.is_dir();
        debug!(?user_dir, %user_dir_exists, "PromptLoader::new: called");
        Self {
            hbs: Self::engine(),
            user_dir: user_dir_exists.then_some(user_dir),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; "Slow & Relaxed" must not become "&amp;"
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
        }

        get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map(|s| s.trim().to_string())
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// User prompt for an itinerary request
    pub fn itinerary_prompt(&self, prefs: &TripPreferences) -> Result<String> {
        self.render("itinerary", &PromptContext::from(prefs))
    }

    /// System instruction for an itinerary request
    pub fn system_instruction(&self, prefs: &TripPreferences) -> Result<String> {
        self.render("system", &PromptContext::from(prefs))
    }
}
