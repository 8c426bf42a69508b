//! Itinerary request client
//!
//! Turns frozen preferences into a prompt plus output schema, calls the
//! provider once, and accepts the reply only if it is a complete itinerary.

use std::sync::Arc;

use tracing::{debug, info, warn};

mod error;
pub mod prompt;
mod schema;

pub use error::{FORMAT_ERROR_MESSAGE, PlanError};
pub use prompt::{PromptContext, PromptLoader};
pub use schema::itinerary_schema;

use crate::domain::{ItineraryResponse, TripPreferences};
use crate::llm::{CompletionRequest, LlmClient};

/// Issues itinerary requests against one provider
pub struct ItineraryPlanner {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl ItineraryPlanner {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        debug!(model = client.model(), %max_tokens, "ItineraryPlanner::new: called");
        Self {
            client,
            prompts,
            max_tokens,
        }
    }

    /// Build the provider request for a set of preferences
    ///
    /// Pure apart from reading prompt overrides from disk.
    pub fn build_request(&self, prefs: &TripPreferences) -> Result<CompletionRequest, PlanError> {
        debug!("ItineraryPlanner::build_request: called");
        let prompt = self
            .prompts
            .itinerary_prompt(prefs)
            .map_err(|e| PlanError::Prompt(e.to_string()))?;
        let system_instruction = self
            .prompts
            .system_instruction(prefs)
            .map_err(|e| PlanError::Prompt(e.to_string()))?;

        Ok(CompletionRequest {
            prompt,
            system_instruction,
            response_schema: itinerary_schema(),
            max_tokens: self.max_tokens,
        })
    }

    /// Request an itinerary; one attempt, no retries
    pub async fn plan(&self, prefs: &TripPreferences) -> Result<ItineraryResponse, PlanError> {
        info!(destination = %prefs.destination, model = self.client.model(), "ItineraryPlanner::plan: called");
        let request = self.build_request(prefs)?;
        let response = self.client.complete(request).await?;

        match ItineraryResponse::from_json(&response.text) {
            Ok(itinerary) => {
                info!(
                    days = itinerary.itinerary.len(),
                    activities = itinerary.activity_count(),
                    "ItineraryPlanner::plan: accepted"
                );
                Ok(itinerary)
            }
            Err(e) => {
                warn!(error = %e, text_len = response.text.len(), "ItineraryPlanner::plan: rejected payload");
                Err(e.into())
            }
        }
    }
}
