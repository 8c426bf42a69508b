//! Preference form controller
//!
//! Holds the traveller's in-progress preferences and the transient UI state
//! around them, and decides when a submission may go out.

mod autocomplete;
mod session;
mod state;
mod validation;

pub use autocomplete::{CityField, CitySuggestions, MAX_SUGGESTIONS, Region, is_outside, suggest_cities};
pub use session::PlanningSession;
pub use state::{Action, Effect, FormState, REQUEST_FAILED_FALLBACK, Screen, View, preference_actions};
pub use validation::{EMAIL_HINT, ValidationError, email_field_ok, matches_email_pattern, validate_submission};
