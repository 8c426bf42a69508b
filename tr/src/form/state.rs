//! Form controller state and its reducer
//!
//! Every interaction is an [`Action`]. [`FormState::reduce`] is pure: it
//! consumes the old state and returns the new one plus at most one
//! [`Effect`] for the caller to carry out. The only effect is the request for
//! an itinerary, issued with a frozen copy of the preferences.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::autocomplete::{CityField, CitySuggestions, suggest_cities};
use super::validation::{email_field_ok, validate_submission};
use crate::domain::options::{
    CITIES, canonical_budget, canonical_group_size, canonical_interest, is_budget, is_group_size, is_interest,
};
use crate::domain::{ItineraryResponse, Pace, TravelMode, TravellerType, TripPreferences};

/// Banner text when a request fails without a description
pub const REQUEST_FAILED_FALLBACK: &str = "Failed to generate itinerary. Please try again.";

/// Which view is active once loading is not in the way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Form,
    Results,
}

/// The screen that should be drawn right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Loading,
    Results,
}

/// Something the user did, or the outcome of the request
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetFullName(String),
    SetEmail(String),
    /// Focus left the email field
    BlurEmail,
    /// Keystroke in a city field; carries the full new value
    CityInput(CityField, String),
    /// Move the highlighted suggestion up or down
    MoveSuggestion { forward: bool },
    SelectSuggestion(CityField, String),
    DismissSuggestions,
    SetStartDate(Option<NaiveDate>),
    SetEndDate(Option<NaiveDate>),
    SetTravelMode(Option<TravelMode>),
    ToggleReturnTransport,
    SetBudget(String),
    SetTravellerType(Option<TravellerType>),
    SetGroupSize(Option<String>),
    ToggleInterest(String),
    SetPace(Pace),
    ToggleTerms,
    Submit,
    RequestSucceeded(ItineraryResponse),
    RequestFailed(Option<String>),
    BackToForm,
}

/// Work the caller must perform on behalf of the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RequestItinerary(TripPreferences),
}

/// One preference session
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub prefs: TripPreferences,
    /// Captured once so date clamping does not depend on the wall clock
    pub today: NaiveDate,
    pub suggestions: Option<CitySuggestions>,
    pub email_touched: bool,
    pub terms_agreed: bool,
    pub error: Option<String>,
    pub loading: bool,
    pub view: View,
    pub itinerary: Option<ItineraryResponse>,
}

impl FormState {
    pub fn new(today: NaiveDate) -> Self {
        debug!(%today, "FormState::new: called");
        Self {
            prefs: TripPreferences::default(),
            today,
            suggestions: None,
            email_touched: false,
            terms_agreed: false,
            error: None,
            loading: false,
            view: View::Form,
            itinerary: None,
        }
    }

    /// Apply one action
    pub fn reduce(mut self, action: Action) -> (Self, Option<Effect>) {
        debug!(?action, loading = self.loading, "FormState::reduce: called");

        if self.loading {
            match action {
                Action::RequestSucceeded(itinerary) => {
                    info!(days = itinerary.itinerary.len(), "FormState::reduce: itinerary received");
                    self.loading = false;
                    self.view = View::Results;
                    self.itinerary = Some(itinerary);
                }
                Action::RequestFailed(message) => {
                    info!(?message, "FormState::reduce: request failed");
                    self.loading = false;
                    self.view = View::Form;
                    self.error = Some(message.unwrap_or_else(|| REQUEST_FAILED_FALLBACK.to_string()));
                }
                _ => debug!("FormState::reduce: ignored while loading"),
            }
            return (self, None);
        }

        match action {
            Action::SetFullName(name) => self.prefs.full_name = name,
            Action::SetEmail(email) => self.prefs.email = email,
            Action::BlurEmail => self.email_touched = true,
            Action::CityInput(field, value) => self.city_input(field, value),
            Action::MoveSuggestion { forward } => {
                if let Some(suggestions) = self.suggestions.as_mut() {
                    if forward {
                        suggestions.highlight_next();
                    } else {
                        suggestions.highlight_prev();
                    }
                }
            }
            Action::SelectSuggestion(field, city) => {
                *self.city_mut(field) = city;
                self.suggestions = None;
            }
            Action::DismissSuggestions => self.suggestions = None,
            Action::SetStartDate(date) => self.set_start_date(date),
            Action::SetEndDate(date) => {
                let min = self.min_end_date();
                self.prefs.end_date = date.map(|d| d.max(min));
            }
            Action::SetTravelMode(mode) => self.prefs.travel_mode = mode,
            Action::ToggleReturnTransport => self.prefs.return_transport = !self.prefs.return_transport,
            Action::SetBudget(budget) => {
                if budget.is_empty() || is_budget(&budget) {
                    self.prefs.budget = budget;
                } else {
                    debug!(%budget, "FormState::reduce: unknown budget ignored");
                }
            }
            Action::SetTravellerType(traveller_type) => {
                self.prefs.traveller_type = traveller_type;
                if traveller_type != Some(TravellerType::Group) {
                    self.prefs.group_size = None;
                }
            }
            Action::SetGroupSize(Some(size)) if !is_group_size(&size) => {
                debug!(%size, "FormState::reduce: unknown group size ignored");
            }
            Action::SetGroupSize(size) => self.prefs.group_size = size,
            Action::ToggleInterest(interest) => {
                if is_interest(&interest) {
                    self.prefs.toggle_interest(&interest);
                } else {
                    debug!(%interest, "FormState::reduce: unknown interest ignored");
                }
            }
            Action::SetPace(pace) => self.prefs.pace = pace,
            Action::ToggleTerms => self.terms_agreed = !self.terms_agreed,
            Action::Submit => return self.submit(),
            Action::RequestSucceeded(_) | Action::RequestFailed(_) => {
                debug!("FormState::reduce: stale request outcome ignored");
            }
            Action::BackToForm => {
                self.view = View::Form;
                self.itinerary = None;
            }
        }
        (self, None)
    }

    fn submit(mut self) -> (Self, Option<Effect>) {
        debug!("FormState::submit: called");
        self.email_touched = true;
        self.error = None;

        if let Err(e) = validate_submission(&self.prefs, self.terms_agreed) {
            self.error = Some(e.to_string());
            return (self, None);
        }

        info!(destination = %self.prefs.destination, "FormState::submit: requesting itinerary");
        self.loading = true;
        self.suggestions = None;
        let snapshot = self.prefs.clone();
        (self, Some(Effect::RequestItinerary(snapshot)))
    }

    fn city_input(&mut self, field: CityField, value: String) {
        let list = suggest_cities(&value, CITIES);
        *self.city_mut(field) = value;
        self.suggestions = if list.is_empty() {
            None
        } else {
            Some(CitySuggestions::new(field, list))
        };
    }

    fn city_mut(&mut self, field: CityField) -> &mut String {
        match field {
            CityField::Origin => &mut self.prefs.origin,
            CityField::Destination => &mut self.prefs.destination,
        }
    }

    fn set_start_date(&mut self, date: Option<NaiveDate>) {
        let start = date.map(|d| d.max(self.today));
        self.prefs.start_date = start;
        if let (Some(start), Some(end)) = (start, self.prefs.end_date)
            && end < start
        {
            debug!(%start, %end, "FormState::set_start_date: end date cleared");
            self.prefs.end_date = None;
        }
    }

    /// Earliest selectable start date
    pub fn min_start_date(&self) -> NaiveDate {
        self.today
    }

    /// Earliest selectable end date
    pub fn min_end_date(&self) -> NaiveDate {
        self.prefs.start_date.unwrap_or(self.today)
    }

    /// Should the inline email hint be visible?
    pub fn show_email_error(&self) -> bool {
        self.email_touched && !email_field_ok(&self.prefs.email)
    }

    pub fn screen(&self) -> Screen {
        if self.loading {
            Screen::Loading
        } else {
            match self.view {
                View::Form => Screen::Form,
                View::Results => Screen::Results,
            }
        }
    }

    /// Suggestions for one field, if that field owns the popover
    pub fn suggestions_for(&self, field: CityField) -> Option<&CitySuggestions> {
        self.suggestions.as_ref().filter(|s| s.field == field)
    }

    /// Apply a sequence of actions, collecting the last effect produced
    pub fn apply_all(self, actions: impl IntoIterator<Item = Action>) -> (Self, Option<Effect>) {
        actions.into_iter().fold((self, None), |(state, last), action| {
            let (state, effect) = state.reduce(action);
            (state, effect.or(last))
        })
    }
}

/// Field edits that reproduce a set of preferences on a fresh form
///
/// Going through the reducer applies the same clamping and clearing rules a
/// person at the keyboard would hit. Catalogue values are matched ignoring
/// case; anything that matches nothing is left for the reducer to refuse.
pub fn preference_actions(prefs: &TripPreferences) -> Vec<Action> {
    debug!("preference_actions: called");
    let mut actions = vec![
        Action::SetFullName(prefs.full_name.clone()),
        Action::SetEmail(prefs.email.clone()),
        Action::SelectSuggestion(CityField::Origin, prefs.origin.clone()),
        Action::SelectSuggestion(CityField::Destination, prefs.destination.clone()),
        Action::SetStartDate(prefs.start_date),
        Action::SetEndDate(prefs.end_date),
        Action::SetTravelMode(prefs.travel_mode),
        Action::SetBudget(canonical_budget(&prefs.budget).map_or_else(|| prefs.budget.clone(), str::to_string)),
        Action::SetTravellerType(prefs.traveller_type),
        Action::SetGroupSize(
            prefs
                .group_size
                .as_deref()
                .map(|s| canonical_group_size(s).unwrap_or(s).to_string()),
        ),
        Action::SetPace(prefs.pace),
    ];
    if prefs.return_transport {
        actions.push(Action::ToggleReturnTransport);
    }
    let mut interests: Vec<String> = Vec::new();
    for name in &prefs.interests {
        let name = canonical_interest(name).map_or_else(|| name.clone(), str::to_string);
        if !interests.contains(&name) {
            interests.push(name);
        }
    }
    actions.extend(interests.into_iter().map(Action::ToggleInterest));
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayPlan;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, d).unwrap()
    }

    fn itinerary() -> ItineraryResponse {
        ItineraryResponse {
            trip_title: "Goa".to_string(),
            destination: "Goa".to_string(),
            total_estimated_cost: "₹50,000".to_string(),
            itinerary: vec![DayPlan {
                day: 1,
                title: "Arrive".to_string(),
                activities: vec![],
            }],
            travel_tips: vec![],
        }
    }

    fn filled() -> FormState {
        let (state, _) = FormState::new(today()).apply_all([
            Action::SetFullName("Asha Rao".to_string()),
            Action::SetEmail("asha@example.com".to_string()),
            Action::SelectSuggestion(CityField::Origin, "Mumbai".to_string()),
            Action::SelectSuggestion(CityField::Destination, "Goa".to_string()),
            Action::SetStartDate(Some(day(10))),
            Action::SetEndDate(Some(day(14))),
            Action::SetBudget("Flexible".to_string()),
            Action::SetTravellerType(Some(TravellerType::Couple)),
            Action::ToggleInterest("Foodie".to_string()),
            Action::ToggleTerms,
        ]);
        state
    }

    #[test]
    fn test_city_input_scopes_suggestions_to_field() {
        let (state, _) = FormState::new(today()).reduce(Action::CityInput(CityField::Destination, "go".to_string()));
        assert_eq!(state.prefs.destination, "go");
        assert_eq!(state.suggestions_for(CityField::Destination).unwrap().list, vec!["Goa"]);
        assert!(state.suggestions_for(CityField::Origin).is_none());

        let (state, _) = state.reduce(Action::CityInput(CityField::Origin, "m".to_string()));
        assert!(state.suggestions_for(CityField::Destination).is_none());
        assert_eq!(state.suggestions_for(CityField::Origin).unwrap().list, vec!["Mumbai", "Manali"]);
    }

    #[test]
    fn test_empty_city_input_clears_suggestions() {
        let (state, _) = FormState::new(today()).apply_all([
            Action::CityInput(CityField::Origin, "m".to_string()),
            Action::CityInput(CityField::Origin, String::new()),
        ]);
        assert!(state.suggestions.is_none());
    }

    #[test]
    fn test_select_suggestion_overwrites_and_clears() {
        let (state, _) = FormState::new(today()).apply_all([
            Action::CityInput(CityField::Origin, "de".to_string()),
            Action::SelectSuggestion(CityField::Origin, "Delhi".to_string()),
        ]);
        assert_eq!(state.prefs.origin, "Delhi");
        assert!(state.suggestions.is_none());
    }

    #[test]
    fn test_dismiss_suggestions() {
        let (state, _) = FormState::new(today()).apply_all([
            Action::CityInput(CityField::Origin, "k".to_string()),
            Action::DismissSuggestions,
        ]);
        assert!(state.suggestions.is_none());
        assert_eq!(state.prefs.origin, "k");
    }

    #[test]
    fn test_start_date_clamps_to_today() {
        let past = NaiveDate::from_ymd_opt(2029, 12, 1).unwrap();
        let (state, _) = FormState::new(today()).reduce(Action::SetStartDate(Some(past)));
        assert_eq!(state.prefs.start_date, Some(today()));
    }

    #[test]
    fn test_end_date_clamps_to_start() {
        let (state, _) =
            FormState::new(today()).apply_all([Action::SetStartDate(Some(day(10))), Action::SetEndDate(Some(day(5)))]);
        assert_eq!(state.prefs.end_date, Some(day(10)));
    }

    #[test]
    fn test_moving_start_past_end_clears_end() {
        let (state, _) = FormState::new(today()).apply_all([
            Action::SetStartDate(Some(day(5))),
            Action::SetEndDate(Some(day(8))),
            Action::SetStartDate(Some(day(12))),
        ]);
        assert_eq!(state.prefs.start_date, Some(day(12)));
        assert!(state.prefs.end_date.is_none());
    }

    #[test]
    fn test_non_group_clears_group_size() {
        let (state, _) = FormState::new(today()).apply_all([
            Action::SetTravellerType(Some(TravellerType::Group)),
            Action::SetGroupSize(Some("6".to_string())),
        ]);
        assert_eq!(state.prefs.group_size.as_deref(), Some("6"));

        let (state, _) = state.reduce(Action::SetTravellerType(Some(TravellerType::Solo)));
        assert!(state.prefs.group_size.is_none());
    }

    #[test]
    fn test_unknown_interest_ignored() {
        let (state, _) = FormState::new(today()).reduce(Action::ToggleInterest("Shopping".to_string()));
        assert!(state.prefs.interests.is_empty());
    }

    #[test]
    fn test_email_error_needs_touch() {
        let (state, _) = FormState::new(today()).reduce(Action::SetEmail("nope".to_string()));
        assert!(!state.show_email_error());
        let (state, _) = state.reduce(Action::BlurEmail);
        assert!(state.show_email_error());
    }

    #[test]
    fn test_submit_invalid_sets_error_and_touches_email() {
        let (state, effect) = FormState::new(today()).reduce(Action::Submit);
        assert!(effect.is_none());
        assert!(state.email_touched);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Full Name is mandatory."));
    }

    #[test]
    fn test_submit_valid_emits_snapshot() {
        let state = filled();
        let expected = state.prefs.clone();
        let (state, effect) = state.reduce(Action::Submit);
        assert_eq!(effect, Some(Effect::RequestItinerary(expected)));
        assert!(state.loading);
        assert_eq!(state.screen(), Screen::Loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_loading_ignores_edits_and_resubmission() {
        let (state, _) = filled().reduce(Action::Submit);
        let frozen = state.prefs.clone();
        let (state, effect) = state.apply_all([
            Action::SetFullName("Someone Else".to_string()),
            Action::Submit,
            Action::BackToForm,
        ]);
        assert!(effect.is_none());
        assert_eq!(state.prefs, frozen);
        assert!(state.loading);
    }

    #[test]
    fn test_success_shows_results_and_back_keeps_prefs() {
        let (state, _) = filled().apply_all([Action::Submit, Action::RequestSucceeded(itinerary())]);
        assert_eq!(state.screen(), Screen::Results);
        assert!(state.itinerary.is_some());

        let prefs = state.prefs.clone();
        let (state, _) = state.reduce(Action::BackToForm);
        assert_eq!(state.screen(), Screen::Form);
        assert!(state.itinerary.is_none());
        assert_eq!(state.prefs, prefs);
    }

    #[test]
    fn test_failure_returns_to_form_with_message() {
        let (state, _) =
            filled().apply_all([Action::Submit, Action::RequestFailed(Some("quota exceeded".to_string()))]);
        assert_eq!(state.screen(), Screen::Form);
        assert_eq!(state.error.as_deref(), Some("quota exceeded"));

        let (state, _) = state.apply_all([Action::Submit, Action::RequestFailed(None)]);
        assert_eq!(state.error.as_deref(), Some(REQUEST_FAILED_FALLBACK));
    }

    #[test]
    fn test_resubmit_clears_previous_error() {
        let (state, _) = filled().apply_all([Action::Submit, Action::RequestFailed(None)]);
        assert!(state.error.is_some());
        let (state, effect) = state.reduce(Action::Submit);
        assert!(effect.is_some());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_stale_outcome_ignored_when_idle() {
        let (state, _) = FormState::new(today()).reduce(Action::RequestSucceeded(itinerary()));
        assert_eq!(state.screen(), Screen::Form);
        assert!(state.itinerary.is_none());
    }

    #[test]
    fn test_preference_actions_replay() {
        let mut prefs = filled().prefs;
        prefs.traveller_type = Some(TravellerType::Group);
        prefs.group_size = Some("4".to_string());
        prefs.return_transport = true;
        prefs.interests = vec!["Nightlife".to_string(), "Foodie".to_string()];

        let (state, _) = FormState::new(today()).apply_all(preference_actions(&prefs));
        assert_eq!(state.prefs, prefs);
    }

    #[test]
    fn test_off_catalogue_budget_and_group_size_ignored() {
        let (state, effect) = FormState::new(today()).apply_all([
            Action::SetBudget("a billion dollars".to_string()),
            Action::SetTravellerType(Some(TravellerType::Group)),
            Action::SetGroupSize(Some("500".to_string())),
        ]);
        assert!(effect.is_none());
        assert_eq!(state.prefs.budget, "");
        assert!(state.prefs.group_size.is_none());

        let (state, _) = filled().apply_all([
            Action::SetBudget("a billion dollars".to_string()),
            Action::SetBudget(String::new()),
        ]);
        assert_eq!(state.prefs.budget, "");
    }

    #[test]
    fn test_replayed_off_catalogue_values_fail_validation() {
        let mut prefs = filled().prefs;
        prefs.budget = "a billion dollars".to_string();
        let mut actions = preference_actions(&prefs);
        actions.extend([Action::ToggleTerms, Action::Submit]);
        let (state, effect) = FormState::new(today()).apply_all(actions);
        assert!(effect.is_none());
        assert_eq!(state.error.as_deref(), Some("Total Budget selection is mandatory."));

        let mut prefs = filled().prefs;
        prefs.traveller_type = Some(TravellerType::Group);
        prefs.group_size = Some("500".to_string());
        let mut actions = preference_actions(&prefs);
        actions.extend([Action::ToggleTerms, Action::Submit]);
        let (state, effect) = FormState::new(today()).apply_all(actions);
        assert!(effect.is_none());
        assert_eq!(
            state.error.as_deref(),
            Some("Please specify the number of travellers for your group.")
        );
        assert!(state.prefs.group_size.is_none());
    }

    #[test]
    fn test_preference_actions_match_catalogue_case() {
        let mut prefs = filled().prefs;
        prefs.budget = "flexible".to_string();
        prefs.interests = vec!["foodie".to_string(), "Foodie".to_string(), "NATURE".to_string()];

        let (state, _) = FormState::new(today()).apply_all(preference_actions(&prefs));
        assert_eq!(state.prefs.budget, "Flexible");
        assert_eq!(state.prefs.interests, vec!["Foodie".to_string(), "Nature".to_string()]);
    }

    #[test]
    fn test_preference_actions_clamp_past_dates() {
        let prefs = TripPreferences {
            start_date: NaiveDate::from_ymd_opt(2020, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2020, 5, 3),
            ..Default::default()
        };
        let (state, _) = FormState::new(today()).apply_all(preference_actions(&prefs));
        assert_eq!(state.prefs.start_date, Some(today()));
        assert_eq!(state.prefs.end_date, Some(today()));
    }

    mod properties {
        use super::*;
        use crate::domain::options::INTERESTS;
        use crate::form::autocomplete::MAX_SUGGESTIONS;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn toggling_twice_is_identity(
                picks in proptest::collection::vec(0..INTERESTS.len(), 0..6),
                target in 0..INTERESTS.len(),
            ) {
                let base = picks.into_iter().fold(FormState::new(today()), |s, i| {
                    s.reduce(Action::ToggleInterest(INTERESTS[i].to_string())).0
                });
                let before: std::collections::BTreeSet<_> = base.prefs.interests.iter().cloned().collect();
                let (after, _) = base.apply_all([
                    Action::ToggleInterest(INTERESTS[target].to_string()),
                    Action::ToggleInterest(INTERESTS[target].to_string()),
                ]);
                let after: std::collections::BTreeSet<_> = after.prefs.interests.iter().cloned().collect();
                prop_assert_eq!(before, after);
            }

            #[test]
            fn suggestions_are_capped_prefix_matches(input in "[a-zA-Z]{1,3}") {
                let list = suggest_cities(&input, CITIES);
                prop_assert!(list.len() <= MAX_SUGGESTIONS);
                let needle = input.to_lowercase();
                for city in &list {
                    prop_assert!(city.to_lowercase().starts_with(&needle));
                }
                let positions: Vec<usize> = list
                    .iter()
                    .map(|c| CITIES.iter().position(|k| k == c).unwrap())
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
