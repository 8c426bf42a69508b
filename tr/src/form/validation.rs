//! Submission validation
//!
//! Checks run in a fixed order and the first failure wins, so the form only
//! ever shows one message at a time.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::domain::{TravellerType, TripPreferences};

/// Inline hint under the email field
pub const EMAIL_HINT: &str = "Please enter a valid email format (e.g., name@domain.com)";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is valid")
});

/// First failing check of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Full Name is mandatory.")]
    MissingFullName,

    #[error("Email Address is mandatory.")]
    MissingEmail,

    #[error("Please provide a valid email address format.")]
    InvalidEmail,

    #[error("Origin city is mandatory.")]
    MissingOrigin,

    #[error("Destination city is mandatory.")]
    MissingDestination,

    #[error("Start Date is mandatory.")]
    MissingStartDate,

    #[error("End Date is mandatory.")]
    MissingEndDate,

    #[error("Travel Mode is mandatory.")]
    MissingTravelMode,

    #[error("Total Budget selection is mandatory.")]
    MissingBudget,

    #[error("Traveller Type is mandatory.")]
    MissingTravellerType,

    #[error("Please specify the number of travellers for your group.")]
    MissingGroupSize,

    #[error("Please select at least one interest.")]
    NoInterests,

    #[error("You must agree to the processing terms.")]
    TermsNotAccepted,
}

/// Does the value look like an email address?
///
/// Callers decide what an empty value means; see [`email_field_ok`].
pub fn matches_email_pattern(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_lowercase())
}

/// Email field state for inline display: empty is "untouched", not an error
pub fn email_field_ok(email: &str) -> bool {
    email.is_empty() || matches_email_pattern(email)
}

/// Validate a submission attempt
pub fn validate_submission(prefs: &TripPreferences, terms_agreed: bool) -> Result<(), ValidationError> {
    debug!(%terms_agreed, "validate_submission: called");
    let result = check_in_order(prefs, terms_agreed);
    if let Err(ref e) = result {
        debug!(error = ?e, "validate_submission: rejected");
    }
    result
}

fn check_in_order(prefs: &TripPreferences, terms_agreed: bool) -> Result<(), ValidationError> {
    use ValidationError::*;

    if prefs.full_name.trim().is_empty() {
        return Err(MissingFullName);
    }
    if prefs.email.trim().is_empty() {
        return Err(MissingEmail);
    }
    if !matches_email_pattern(&prefs.email) {
        return Err(InvalidEmail);
    }
    if prefs.origin.trim().is_empty() {
        return Err(MissingOrigin);
    }
    if prefs.destination.trim().is_empty() {
        return Err(MissingDestination);
    }
    if prefs.start_date.is_none() {
        return Err(MissingStartDate);
    }
    if prefs.end_date.is_none() {
        return Err(MissingEndDate);
    }
    if prefs.travel_mode.is_none() {
        return Err(MissingTravelMode);
    }
    if prefs.budget.is_empty() {
        return Err(MissingBudget);
    }
    let Some(traveller_type) = prefs.traveller_type else {
        return Err(MissingTravellerType);
    };
    if traveller_type == TravellerType::Group && prefs.group_size.as_deref().is_none_or(str::is_empty) {
        return Err(MissingGroupSize);
    }
    if prefs.interests.is_empty() {
        return Err(NoInterests);
    }
    if !terms_agreed {
        return Err(TermsNotAccepted);
    }
    Ok(())
}
