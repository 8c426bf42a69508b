//! Domain types for TravelRAD
//!
//! - [`TripPreferences`] - what the traveller asked for (owned by the form)
//! - [`ItineraryResponse`] - what the model planned (owned by the results view)
//! - [`options`] - the fixed catalogues the form offers

mod itinerary;
pub mod options;
mod preferences;

pub use itinerary::{DayPlan, FormatError, ItineraryActivity, ItineraryResponse};
pub use preferences::{Pace, TravelMode, TravellerType, TripPreferences};
