//! TUI application - event handling
//!
//! The App struct owns the AppState and turns key and mouse events into
//! form actions. It does not do any rendering - that's delegated to the
//! views module - and it never performs I/O; slow work is queued as a
//! [`PendingAction`] for the runner.

use chrono::{Days, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::{debug, trace};

use super::state::{AppState, Field, PendingAction};
use crate::domain::options::{BUDGETS, GROUP_SIZES, INTERESTS, cycle};
use crate::domain::{TravelMode, TravellerType};
use crate::form::{Action, CityField, Screen, is_outside};

/// TUI application
#[derive(Debug)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new(today: NaiveDate) -> Self {
        debug!("App::new: called");
        Self {
            state: AppState::new(today),
        }
    }

    pub fn state(&self) -> &AppState {
        trace!("App::state: called");
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        trace!("App::state_mut: called");
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("App::handle_key: Ctrl+C force quit");
            return true;
        }

        match self.state.screen() {
            Screen::Loading => debug!("App::handle_key: loading, key ignored"),
            Screen::Results => self.handle_results_key(key),
            Screen::Form => self.handle_form_key(key),
        }
        self.state.should_quit
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        debug!(?key, "App::handle_results_key: called");
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('b') | KeyCode::Esc => self.state.dispatch(Action::BackToForm),
            KeyCode::Char('e') => self.state.pending_action = Some(PendingAction::Export),
            KeyCode::Char('s') => self.state.pending_action = Some(PendingAction::Share),
            KeyCode::Up | KeyCode::Char('k') => self.state.scroll_results(-1),
            KeyCode::Down | KeyCode::Char('j') => self.state.scroll_results(1),
            KeyCode::PageUp => self.state.scroll_results(-10),
            KeyCode::PageDown => self.state.scroll_results(10),
            KeyCode::Home => self.state.results_scroll = 0,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        debug!(?key, focus = ?self.state.focus, "App::handle_form_key: called");
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.submit();
            return;
        }

        // An open popover owns navigation keys for its field
        if self.handle_suggestion_key(key) {
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => return self.state.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => return self.state.move_focus(false),
            _ => {}
        }

        let focus = self.state.focus;
        if focus.is_text() {
            self.handle_text_key(focus, key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Left => self.adjust(focus, false),
            KeyCode::Right => self.adjust(focus, true),
            KeyCode::Char(' ') => self.toggle(focus),
            KeyCode::Enter if focus == Field::Submit => self.submit(),
            KeyCode::Enter => self.toggle(focus),
            KeyCode::Backspace | KeyCode::Delete => self.clear(focus),
            _ => {}
        }
    }

    /// Returns true when the key was consumed by the suggestion popover
    fn handle_suggestion_key(&mut self, key: KeyEvent) -> bool {
        let Some(field) = self.state.focus.city() else {
            return false;
        };
        let Some(suggestions) = self.state.form.suggestions_for(field) else {
            return false;
        };
        match key.code {
            KeyCode::Down => self.state.dispatch(Action::MoveSuggestion { forward: true }),
            KeyCode::Up => self.state.dispatch(Action::MoveSuggestion { forward: false }),
            KeyCode::Enter => {
                if let Some(city) = suggestions.highlighted_city().map(str::to_string) {
                    self.state.dispatch(Action::SelectSuggestion(field, city));
                }
            }
            KeyCode::Esc => self.state.dispatch(Action::DismissSuggestions),
            _ => return false,
        }
        true
    }

    fn handle_text_key(&mut self, focus: Field, key: KeyEvent) {
        let mut value = self.text_value(focus).to_string();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => value.push(c),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Enter => return self.state.move_focus(true),
            _ => return,
        }
        let action = match focus {
            Field::FullName => Action::SetFullName(value),
            Field::Email => Action::SetEmail(value),
            Field::Origin => Action::CityInput(CityField::Origin, value),
            Field::Destination => Action::CityInput(CityField::Destination, value),
            _ => return,
        };
        self.state.dispatch(action);
    }

    fn text_value(&self, field: Field) -> &str {
        let prefs = &self.state.form.prefs;
        match field {
            Field::FullName => &prefs.full_name,
            Field::Email => &prefs.email,
            Field::Origin => &prefs.origin,
            Field::Destination => &prefs.destination,
            _ => "",
        }
    }

    /// Left/Right on an enumerated or stepped row
    fn adjust(&mut self, field: Field, forward: bool) {
        debug!(?field, %forward, "App::adjust: called");
        let form = &self.state.form;
        let prefs = &form.prefs;
        let action = match field {
            Field::StartDate => Action::SetStartDate(Some(step_date(prefs.start_date, form.min_start_date(), forward))),
            Field::EndDate => Action::SetEndDate(Some(step_date(prefs.end_date, form.min_end_date(), forward))),
            Field::TravelMode => {
                let mode = prefs.travel_mode.map_or(TravelMode::Flight, |m| if forward { m.next() } else { m.prev() });
                Action::SetTravelMode(Some(mode))
            }
            Field::Budget => {
                let values: Vec<&str> = BUDGETS.iter().map(|(_, v)| *v).collect();
                let current = Some(prefs.budget.as_str()).filter(|b| !b.is_empty());
                match cycle(&values, current, forward) {
                    Some(v) => Action::SetBudget(v.to_string()),
                    None => return,
                }
            }
            Field::TravellerType => {
                let names: Vec<&str> = TravellerType::ALL.iter().map(|t| t.as_str()).collect();
                let current = prefs.traveller_type.map(|t| t.as_str());
                let next = cycle(&names, current, forward)
                    .and_then(|n| TravellerType::ALL.into_iter().find(|t| t.as_str() == n));
                Action::SetTravellerType(next)
            }
            Field::GroupSize => match cycle(GROUP_SIZES, prefs.group_size.as_deref(), forward) {
                Some(size) => Action::SetGroupSize(Some(size.to_string())),
                None => return,
            },
            Field::Interests => {
                let len = INTERESTS.len();
                let cursor = self.state.interest_cursor;
                self.state.interest_cursor = if forward { (cursor + 1) % len } else { (cursor + len - 1) % len };
                return;
            }
            Field::Pace => Action::SetPace(if forward { prefs.pace.faster() } else { prefs.pace.slower() }),
            Field::ReturnTransport | Field::Terms => return self.toggle(field),
            _ => return,
        };
        self.state.dispatch(action);
    }

    /// Space/Enter on a checkbox or the interest list
    fn toggle(&mut self, field: Field) {
        debug!(?field, "App::toggle: called");
        let action = match field {
            Field::ReturnTransport => Action::ToggleReturnTransport,
            Field::Terms => Action::ToggleTerms,
            Field::Interests => match INTERESTS.get(self.state.interest_cursor) {
                Some(interest) => Action::ToggleInterest(interest.to_string()),
                None => return,
            },
            _ => return,
        };
        self.state.dispatch(action);
    }

    fn clear(&mut self, field: Field) {
        let action = match field {
            Field::StartDate => Action::SetStartDate(None),
            Field::EndDate => Action::SetEndDate(None),
            _ => return,
        };
        self.state.dispatch(action);
    }

    fn submit(&mut self) {
        debug!("App::submit: called");
        self.state.set_focus(Field::Submit);
        self.state.dispatch(Action::Submit);
    }

    /// Handle a mouse event
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        debug!(?mouse, "App::handle_mouse: called");
        match (self.state.screen(), mouse.kind) {
            (Screen::Form, MouseEventKind::Down(MouseButton::Left)) => self.handle_form_click(mouse.column, mouse.row),
            (Screen::Results, MouseEventKind::ScrollUp) => self.state.scroll_results(-3),
            (Screen::Results, MouseEventKind::ScrollDown) => self.state.scroll_results(3),
            _ => {}
        }
    }

    fn handle_form_click(&mut self, column: u16, row: u16) {
        let region = self.state.popover_region;
        if is_outside(region, column, row) {
            debug!("App::handle_form_click: outside popover");
            self.state.dispatch(Action::DismissSuggestions);
            return;
        }
        // Inside the popover: rows sit one below the top border
        let (Some(region), Some(suggestions)) = (region, self.state.form.suggestions.as_ref()) else {
            return;
        };
        let idx = row.saturating_sub(region.y + 1) as usize;
        if let Some(city) = suggestions.list.get(idx).cloned() {
            let field = suggestions.field;
            self.state.dispatch(Action::SelectSuggestion(field, city));
        }
    }
}

/// Step a date by one day, starting from the minimum when unset
fn step_date(current: Option<NaiveDate>, min: NaiveDate, forward: bool) -> NaiveDate {
    match current {
        None => min,
        Some(d) if forward => d.checked_add_days(Days::new(1)).unwrap_or(d),
        Some(d) => d.checked_sub_days(Days::new(1)).unwrap_or(d).max(min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayPlan, ItineraryResponse};
    use crate::form::Region;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn itinerary() -> ItineraryResponse {
        ItineraryResponse {
            trip_title: "Trip".to_string(),
            destination: "Goa".to_string(),
            total_estimated_cost: "₹1".to_string(),
            itinerary: vec![DayPlan {
                day: 1,
                title: "One".to_string(),
                activities: vec![],
            }],
            travel_tips: vec![],
        }
    }

    /// Fill every row from the keyboard
    fn fill_form(app: &mut App) {
        type_text(app, "Asha");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "asha@example.com");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "mum");
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "Goa");
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right)); // start = today
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right)); // end = start
        app.handle_key(key(KeyCode::Right)); // end = start + 1
        app.state_mut().set_focus(Field::Budget);
        app.handle_key(key(KeyCode::Left)); // flexible (last)
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right)); // solo
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char(' '))); // Nature
        app.state_mut().set_focus(Field::Terms);
        app.handle_key(key(KeyCode::Char(' ')));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut app = App::new(today());
        assert!(app.handle_key(ctrl('c')));
    }

    #[test]
    fn test_q_is_text_in_text_fields() {
        let mut app = App::new(today());
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        assert_eq!(app.state().form.prefs.full_name, "q");

        app.state_mut().set_focus(Field::Pace);
        assert!(app.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut app = App::new(today());
        type_text(&mut app, "Ashaa");
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.state().form.prefs.full_name, "Asha");
    }

    #[test]
    fn test_city_suggestion_keyboard_flow() {
        let mut app = App::new(today());
        app.state_mut().set_focus(Field::Origin);
        type_text(&mut app, "k");
        assert_eq!(
            app.state().form.suggestions_for(CityField::Origin).unwrap().list,
            vec!["Kolkata", "Kanpur", "Kochi"]
        );
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().form.prefs.origin, "Kanpur");
        assert!(app.state().form.suggestions.is_none());
        assert_eq!(app.state().focus, Field::Origin);
    }

    #[test]
    fn test_click_outside_popover_dismisses() {
        let mut app = App::new(today());
        app.state_mut().set_focus(Field::Destination);
        type_text(&mut app, "v");
        app.state_mut().popover_region = Some(Region::new(10, 5, 20, 5));

        app.handle_mouse(click(40, 20));
        assert!(app.state().form.suggestions.is_none());
        assert_eq!(app.state().form.prefs.destination, "v");
    }

    #[test]
    fn test_click_inside_popover_selects() {
        let mut app = App::new(today());
        app.state_mut().set_focus(Field::Destination);
        type_text(&mut app, "v");
        app.state_mut().popover_region = Some(Region::new(10, 5, 20, 5));

        app.handle_mouse(click(12, 7));
        assert_eq!(app.state().form.prefs.destination, "Vadodara");
    }

    #[test]
    fn test_dates_step_from_minimum() {
        let mut app = App::new(today());
        app.state_mut().set_focus(Field::StartDate);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.state().form.prefs.start_date, Some(today()));
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.state().form.prefs.start_date, Some(today()));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.state().form.prefs.start_date, NaiveDate::from_ymd_opt(2030, 1, 2));
        app.handle_key(key(KeyCode::Backspace));
        assert!(app.state().form.prefs.start_date.is_none());
    }

    #[test]
    fn test_group_size_cycles_when_group() {
        let mut app = App::new(today());
        app.state_mut().set_focus(Field::TravellerType);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.state().form.prefs.traveller_type, Some(TravellerType::Group));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state().focus, Field::GroupSize);
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.state().form.prefs.group_size.as_deref(), Some("4"));
    }

    #[test]
    fn test_interest_cursor_and_toggle() {
        let mut app = App::new(today());
        app.state_mut().set_focus(Field::Interests);
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().form.prefs.interests, vec!["Culture", "Relaxation"]);
    }

    #[test]
    fn test_submit_incomplete_shows_first_error() {
        let mut app = App::new(today());
        app.handle_key(ctrl('s'));
        assert_eq!(app.state().form.error.as_deref(), Some("Full Name is mandatory."));
        assert!(app.state().pending_action.is_none());
    }

    #[test]
    fn test_full_keyboard_submission_queues_request() {
        let mut app = App::new(today());
        fill_form(&mut app);
        app.state_mut().set_focus(Field::Submit);
        app.handle_key(key(KeyCode::Enter));

        let state = app.state();
        assert_eq!(state.form.error, None);
        assert_eq!(state.screen(), Screen::Loading);
        let Some(PendingAction::RequestItinerary(prefs)) = &state.pending_action else {
            panic!("expected a queued request");
        };
        assert_eq!(prefs.origin, "Mumbai");
        assert_eq!(prefs.destination, "Goa");
        assert_eq!(prefs.budget, "Flexible");
        assert_eq!(prefs.traveller_type, Some(TravellerType::Solo));
        assert_eq!(prefs.interests, vec!["Nature"]);
        assert_eq!(prefs.end_date, NaiveDate::from_ymd_opt(2030, 1, 2));
    }

    #[test]
    fn test_loading_ignores_keys() {
        let mut app = App::new(today());
        fill_form(&mut app);
        app.handle_key(ctrl('s'));
        app.state_mut().pending_action = None;

        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        app.handle_key(ctrl('s'));
        assert!(app.state().pending_action.is_none());
    }

    #[test]
    fn test_results_keys() {
        let mut app = App::new(today());
        fill_form(&mut app);
        app.handle_key(ctrl('s'));
        app.state_mut().dispatch(Action::RequestSucceeded(itinerary()));
        assert_eq!(app.state().screen(), Screen::Results);

        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.state().pending_action, Some(PendingAction::Export));
        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.state().pending_action, Some(PendingAction::Share));

        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.state().results_scroll, 10);

        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.state().screen(), Screen::Form);
        assert_eq!(app.state().form.prefs.destination, "Goa");
    }
}
