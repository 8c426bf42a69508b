//! TravelRAD - AI travel itinerary planner
//!
//! A traveller fills in a guided preference form; once it validates, the
//! preferences become a prompt and a response schema for a generative model,
//! and the model's JSON reply is parsed into a day-by-day itinerary.
//!
//! # Modules
//!
//! - [`domain`] - preferences, option catalogues and the itinerary types
//! - [`form`] - the preference form state machine and validation
//! - [`planner`] - prompt and schema construction, response parsing
//! - [`llm`] - LLM client trait and the Gemini implementation
//! - [`render`] - text, markdown and JSON output
//! - [`tui`] - interactive terminal front-end
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod form;
pub mod llm;
pub mod planner;
pub mod render;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use domain::{ItineraryResponse, TripPreferences};
pub use form::{Action, FormState, PlanningSession};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use planner::{ItineraryPlanner, PlanError};
