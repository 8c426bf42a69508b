//! TUI runner - main event loop
//!
//! Draws, waits on terminal events or a finished planner request, and turns
//! queued [`PendingAction`]s into background work.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use eyre::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::app::App;
use super::events::{Event, EventHandler};
use super::state::PendingAction;
use super::{Tui, views};
use crate::domain::TripPreferences;
use crate::form::Action;
use crate::planner::ItineraryPlanner;
use crate::render::{OutputFormat, write_export};

/// Outcome to dispatch once the result channel yields
///
/// A closed channel means the request task died before reporting.
fn request_outcome(received: Option<Action>) -> Action {
    received.unwrap_or_else(|| {
        warn!("request_outcome: planner task ended without a result");
        Action::RequestFailed(None)
    })
}

/// TUI runner that manages the terminal and planner requests
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,
    planner: Arc<ItineraryPlanner>,
    /// Where export and share write their files
    export_dir: PathBuf,
    /// Receiver for the outcome of the in-flight request
    result_rx: Option<mpsc::Receiver<Action>>,
    /// Handle to the background planner task
    task: Option<JoinHandle<()>>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, planner: Arc<ItineraryPlanner>, export_dir: PathBuf, today: NaiveDate) -> Self {
        debug!(?export_dir, %today, "TuiRunner::new: called");
        Self {
            app: App::new(today),
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(100)),
            planner,
            export_dir,
            result_rx: None,
            task: None,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        loop {
            self.terminal.draw(|frame| views::render(self.app.state_mut(), frame))?;

            tokio::select! {
                event = self.event_handler.next() => {
                    match event? {
                        Event::Tick => self.handle_tick(),
                        Event::Key(key) => {
                            if self.app.handle_key(key) {
                                break;
                            }
                        }
                        Event::Mouse(mouse) => self.app.handle_mouse(mouse),
                        Event::Resize(width, height) => debug!(width, height, "TuiRunner::run: resized"),
                    }
                }
                outcome = async {
                    if let Some(rx) = &mut self.result_rx {
                        rx.recv().await
                    } else {
                        std::future::pending::<Option<Action>>().await
                    }
                } => {
                    self.finish_request(request_outcome(outcome));
                }
            }

            // Keys may queue work; start it without waiting for the next tick
            self.process_pending();

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        if let Some(task) = self.task.take() {
            debug!("TuiRunner::run: aborting in-flight request");
            task.abort();
        }
        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.app.state_mut().tick();
        self.process_pending();
    }

    fn process_pending(&mut self) {
        let Some(action) = self.app.state_mut().pending_action.take() else {
            return;
        };
        debug!(?action, "TuiRunner::process_pending: pending action");
        match action {
            PendingAction::RequestItinerary(prefs) => self.start_request(prefs),
            PendingAction::Export => self.export(OutputFormat::Markdown, "Exported"),
            PendingAction::Share => self.export(OutputFormat::Json, "Saved shareable copy"),
        }
    }

    /// Spawn the planner call; its outcome comes back through `result_rx`
    fn start_request(&mut self, prefs: TripPreferences) {
        info!(destination = %prefs.destination, "TuiRunner::start_request: requesting itinerary");
        let (tx, rx) = mpsc::channel(1);
        self.result_rx = Some(rx);

        let planner = Arc::clone(&self.planner);
        self.task = Some(tokio::spawn(async move {
            let outcome = match planner.plan(&prefs).await {
                Ok(itinerary) => Action::RequestSucceeded(itinerary),
                Err(e) => {
                    error!(error = %e, "TuiRunner: itinerary request failed");
                    Action::RequestFailed(Some(e.user_message()))
                }
            };
            if tx.send(outcome).await.is_err() {
                debug!("TuiRunner: result receiver dropped");
            }
        }));
    }

    fn finish_request(&mut self, outcome: Action) {
        debug!("TuiRunner::finish_request: called");
        self.result_rx = None;
        self.task = None;
        self.app.state_mut().dispatch(outcome);
    }

    fn export(&mut self, format: OutputFormat, verb: &str) {
        debug!(?format, "TuiRunner::export: called");
        let state = self.app.state();
        let Some(itinerary) = state.form.itinerary.as_ref() else {
            return;
        };
        let notice = match write_export(&self.export_dir, itinerary, Some(&state.form.prefs), format) {
            Ok(path) => format!("{} to {}", verb, path.display()),
            Err(e) => {
                error!(error = %e, "TuiRunner::export: write failed");
                format!("Could not write file: {}", e)
            }
        };
        self.app.state_mut().set_notice(notice);
    }
}
