//! A planning session: form state plus the planner that serves its requests

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::state::{Action, Effect, FormState};
use crate::planner::ItineraryPlanner;

/// Drives one preference session through request/response cycles
pub struct PlanningSession {
    id: Uuid,
    state: FormState,
    planner: Arc<ItineraryPlanner>,
}

impl PlanningSession {
    pub fn new(planner: Arc<ItineraryPlanner>, today: NaiveDate) -> Self {
        let id = Uuid::now_v7();
        info!(session_id = %id, "PlanningSession::new: called");
        Self {
            id,
            state: FormState::new(today),
            planner,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Apply an action; if it asks for an itinerary, await the planner and
    /// apply the outcome before returning
    pub async fn dispatch(&mut self, action: Action) -> &FormState {
        debug!(session_id = %self.id, "PlanningSession::dispatch: called");
        if let Some(Effect::RequestItinerary(prefs)) = self.apply(action) {
            let outcome = match self.planner.plan(&prefs).await {
                Ok(itinerary) => {
                    info!(session_id = %self.id, days = itinerary.itinerary.len(), "PlanningSession::dispatch: itinerary ready");
                    Action::RequestSucceeded(itinerary)
                }
                Err(e) => {
                    warn!(session_id = %self.id, error = %e, "PlanningSession::dispatch: request failed");
                    Action::RequestFailed(Some(e.user_message()))
                }
            };
            self.apply(outcome);
        }
        &self.state
    }

    /// Apply several actions in order
    pub async fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> &FormState {
        for action in actions {
            self.dispatch(action).await;
        }
        &self.state
    }

    fn apply(&mut self, action: Action) -> Option<Effect> {
        let today = self.state.today;
        let current = std::mem::replace(&mut self.state, FormState::new(today));
        let (next, effect) = current.reduce(action);
        self.state = next;
        effect
    }
}
