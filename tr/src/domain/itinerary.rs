//! Itinerary returned by the model
//!
//! The provider is asked for JSON matching [`crate::planner::itinerary_schema`].
//! Nothing here trusts that it complied: [`ItineraryResponse::from_json`]
//! rejects anything that is not a complete, well-typed itinerary.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Why a provider payload was not accepted as an itinerary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("empty response")]
    Empty,

    #[error("not valid JSON: {0}")]
    Syntax(String),

    #[error("does not match the itinerary shape: {0}")]
    Shape(String),

    #[error("itinerary has no days")]
    NoDays,

    #[error("day number {0} is not 1-based")]
    BadDayNumber(u32),
}

/// One scheduled activity within a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryActivity {
    pub time: String,
    pub activity: String,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
}

/// A single day of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based day counter
    pub day: u32,
    pub title: String,
    pub activities: Vec<ItineraryActivity>,
}

/// The complete multi-day plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryResponse {
    pub trip_title: String,
    pub destination: String,
    pub total_estimated_cost: String,
    /// Days in order, day 1 first
    pub itinerary: Vec<DayPlan>,
    pub travel_tips: Vec<String>,
}

impl ItineraryResponse {
    /// Parse and structurally validate a provider payload
    pub fn from_json(text: &str) -> Result<Self, FormatError> {
        debug!(text_len = text.len(), "ItineraryResponse::from_json: called");
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("ItineraryResponse::from_json: empty payload");
            return Err(FormatError::Empty);
        }

        let value: serde_json::Value =
            serde_json::from_str(trimmed).map_err(|e| FormatError::Syntax(e.to_string()))?;
        if !value.is_object() {
            debug!("ItineraryResponse::from_json: payload is not an object");
            return Err(FormatError::Shape("expected a JSON object".to_string()));
        }

        // Required keys are required by the derive: no serde defaults on them
        let response: Self = serde_json::from_value(value).map_err(|e| FormatError::Shape(e.to_string()))?;
        response.check()?;

        debug!(days = response.itinerary.len(), "ItineraryResponse::from_json: accepted");
        Ok(response)
    }

    fn check(&self) -> Result<(), FormatError> {
        if self.itinerary.is_empty() {
            return Err(FormatError::NoDays);
        }
        if let Some(bad) = self.itinerary.iter().find(|d| d.day == 0) {
            return Err(FormatError::BadDayNumber(bad.day));
        }
        Ok(())
    }

    pub fn activity_count(&self) -> usize {
        self.itinerary.iter().map(|d| d.activities.len()).sum()
    }
}
