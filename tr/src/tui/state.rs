//! TUI state
//!
//! Wraps the form controller's [`FormState`] with what only the terminal
//! front-end needs: which row has focus, scroll offsets, the popover's
//! on-screen region, and work queued for the runner.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{TravellerType, TripPreferences};
use crate::form::{Action, CityField, Effect, FormState, Region, Screen};

/// Messages cycled on the loading screen
pub const LOADING_MESSAGES: [&str; 5] = [
    "Analyzing your preferences...",
    "Scanning destinations for gems...",
    "Optimizing travel routes...",
    "Curating local experiences...",
    "Finalizing your RAD itinerary...",
];

/// How long each loading message stays up
pub const LOADING_MESSAGE_INTERVAL: Duration = Duration::from_millis(2500);

/// Loading message for a given time spent waiting
pub fn loading_message(elapsed: Duration) -> &'static str {
    let idx = (elapsed.as_millis() / LOADING_MESSAGE_INTERVAL.as_millis()) as usize % LOADING_MESSAGES.len();
    LOADING_MESSAGES[idx]
}

/// A row on the form screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FullName,
    Email,
    Origin,
    Destination,
    StartDate,
    EndDate,
    TravelMode,
    ReturnTransport,
    Budget,
    TravellerType,
    GroupSize,
    Interests,
    Pace,
    Terms,
    Submit,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::FullName,
        Field::Email,
        Field::Origin,
        Field::Destination,
        Field::StartDate,
        Field::EndDate,
        Field::TravelMode,
        Field::ReturnTransport,
        Field::Budget,
        Field::TravellerType,
        Field::GroupSize,
        Field::Interests,
        Field::Pace,
        Field::Terms,
        Field::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::Email => "Email Address",
            Self::Origin => "Origin",
            Self::Destination => "Destination",
            Self::StartDate => "Start Date",
            Self::EndDate => "End Date",
            Self::TravelMode => "Travel Mode",
            Self::ReturnTransport => "Return Transport",
            Self::Budget => "Total Budget",
            Self::TravellerType => "Traveller Type",
            Self::GroupSize => "Group Size",
            Self::Interests => "Interests",
            Self::Pace => "Pace",
            Self::Terms => "Terms",
            Self::Submit => "",
        }
    }

    /// Free-text fields swallow printable keys
    pub fn is_text(&self) -> bool {
        matches!(self, Self::FullName | Self::Email | Self::Origin | Self::Destination)
    }

    pub fn city(&self) -> Option<CityField> {
        match self {
            Self::Origin => Some(CityField::Origin),
            Self::Destination => Some(CityField::Destination),
            _ => None,
        }
    }
}

/// Work the runner performs outside the key handler
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Ask the planner for an itinerary
    RequestItinerary(TripPreferences),
    /// Write the shown itinerary as markdown
    Export,
    /// Write the shown itinerary as JSON
    Share,
}

/// Full TUI state
#[derive(Debug)]
pub struct AppState {
    pub form: FormState,
    pub focus: Field,
    /// Highlighted entry in the interest list
    pub interest_cursor: usize,
    pub results_scroll: u16,
    /// First form row shown when the form is taller than the screen
    pub form_scroll: u16,
    /// Where the suggestion popover was last drawn
    pub popover_region: Option<Region>,
    /// One-line status under the results (export paths and such)
    pub notice: Option<String>,
    pub loading_since: Option<Instant>,
    pub pending_action: Option<PendingAction>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        debug!(%today, "AppState::new: called");
        Self {
            form: FormState::new(today),
            focus: Field::FullName,
            interest_cursor: 0,
            results_scroll: 0,
            form_scroll: 0,
            popover_region: None,
            notice: None,
            loading_since: None,
            pending_action: None,
            should_quit: false,
        }
    }

    /// Run an action through the form reducer and queue any effect
    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "AppState::dispatch: called");
        let entering_results = matches!(action, Action::RequestSucceeded(_));
        let today = self.form.today;
        let current = std::mem::replace(&mut self.form, FormState::new(today));
        let (next, effect) = current.reduce(action);
        self.form = next;

        if self.form.suggestions.is_none() {
            self.popover_region = None;
        }
        if !self.form.loading {
            self.loading_since = None;
        }
        if entering_results {
            self.results_scroll = 0;
            self.notice = None;
        }

        if let Some(Effect::RequestItinerary(prefs)) = effect {
            debug!("AppState::dispatch: queueing itinerary request");
            self.loading_since = Some(Instant::now());
            self.pending_action = Some(PendingAction::RequestItinerary(prefs));
        }
    }

    pub fn screen(&self) -> Screen {
        self.form.screen()
    }

    /// Is this row shown at all?
    pub fn is_visible(&self, field: Field) -> bool {
        field != Field::GroupSize || self.form.prefs.traveller_type == Some(TravellerType::Group)
    }

    /// Rows currently shown, in order
    pub fn visible_fields(&self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| self.is_visible(*f)).collect()
    }

    /// Move focus to the next or previous visible row, wrapping
    pub fn move_focus(&mut self, forward: bool) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let len = fields.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.set_focus(fields[next]);
    }

    /// Focus a row, applying the blur rules of the row being left
    pub fn set_focus(&mut self, field: Field) {
        debug!(from = ?self.focus, to = ?field, "AppState::set_focus: called");
        if self.focus == field {
            return;
        }
        if self.focus == Field::Email {
            self.dispatch(Action::BlurEmail);
        }
        if self.focus.city().is_some() && self.form.suggestions.is_some() {
            self.dispatch(Action::DismissSuggestions);
        }
        self.focus = field;
    }

    /// Loading text for the current moment
    pub fn loading_message(&self) -> &'static str {
        let elapsed = self.loading_since.map(|t| t.elapsed()).unwrap_or_default();
        loading_message(elapsed)
    }

    pub fn scroll_results(&mut self, lines: i32) {
        self.results_scroll = if lines < 0 {
            self.results_scroll.saturating_sub(lines.unsigned_abs() as u16)
        } else {
            self.results_scroll.saturating_add(lines as u16)
        };
    }

    /// Scroll the form just enough to keep `row` inside a window `height` rows tall
    pub fn follow_form_focus(&mut self, row: u16, height: u16) {
        if height == 0 {
            return;
        }
        if row < self.form_scroll {
            self.form_scroll = row;
        } else if row >= self.form_scroll + height {
            self.form_scroll = row + 1 - height;
        }
    }

    pub fn set_notice(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        debug!(%msg, "AppState::set_notice: called");
        self.notice = Some(msg);
    }

    /// Periodic housekeeping
    pub fn tick(&mut self) {
        // Focus can be left on a row that has since been hidden
        if !self.is_visible(self.focus) {
            self.focus = Field::TravellerType;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
    }

    #[test]
    fn test_loading_message_rotation() {
        assert_eq!(loading_message(Duration::ZERO), LOADING_MESSAGES[0]);
        assert_eq!(loading_message(Duration::from_millis(2499)), LOADING_MESSAGES[0]);
        assert_eq!(loading_message(Duration::from_millis(2500)), LOADING_MESSAGES[1]);
        assert_eq!(loading_message(Duration::from_millis(12_500)), LOADING_MESSAGES[0]);
    }

    #[test]
    fn test_group_size_row_hidden_unless_group() {
        let mut s = state();
        assert!(!s.visible_fields().contains(&Field::GroupSize));
        s.dispatch(Action::SetTravellerType(Some(TravellerType::Group)));
        assert!(s.visible_fields().contains(&Field::GroupSize));
    }

    #[test]
    fn test_focus_wraps() {
        let mut s = state();
        s.move_focus(false);
        assert_eq!(s.focus, Field::Submit);
        s.move_focus(true);
        assert_eq!(s.focus, Field::FullName);
    }

    #[test]
    fn test_focus_skips_hidden_group_size() {
        let mut s = state();
        s.focus = Field::TravellerType;
        s.move_focus(true);
        assert_eq!(s.focus, Field::Interests);
    }

    #[test]
    fn test_leaving_email_marks_touched() {
        let mut s = state();
        s.set_focus(Field::Email);
        assert!(!s.form.email_touched);
        s.move_focus(true);
        assert!(s.form.email_touched);
    }

    #[test]
    fn test_leaving_city_dismisses_suggestions() {
        let mut s = state();
        s.set_focus(Field::Origin);
        s.dispatch(Action::CityInput(CityField::Origin, "pu".to_string()));
        assert!(s.form.suggestions.is_some());
        s.move_focus(true);
        assert!(s.form.suggestions.is_none());
    }

    #[test]
    fn test_scroll_saturates() {
        let mut s = state();
        s.scroll_results(-5);
        assert_eq!(s.results_scroll, 0);
        s.scroll_results(7);
        s.scroll_results(-2);
        assert_eq!(s.results_scroll, 5);
    }

    #[test]
    fn test_form_scroll_follows_focus() {
        let mut s = state();
        s.follow_form_focus(3, 6);
        assert_eq!(s.form_scroll, 0);
        s.follow_form_focus(13, 6);
        assert_eq!(s.form_scroll, 8);
        s.follow_form_focus(10, 6);
        assert_eq!(s.form_scroll, 8);
        s.follow_form_focus(2, 6);
        assert_eq!(s.form_scroll, 2);
        s.follow_form_focus(40, 0);
        assert_eq!(s.form_scroll, 2);
    }
}
