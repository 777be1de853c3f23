//! TUI Runner - main loop that owns the terminal and the goal store
//!
//! The TuiRunner is responsible for:
//! - Dispatching terminal events to App
//! - Running goal interpretation in a background task
//! - Applying queued status changes to the store
//! - Recomputing countdowns on the CountdownClock cadence

use std::time::{Duration, Instant};

use chrono::Local;
use eyre::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::countdown::CountdownClock;
use crate::domain::GoalStore;
use crate::interpret::{GoalSpec, InterpretError, Interpreter};
use crate::tracker::{self, Notice, TrackerView};

use super::Tui;
use super::app::{App, NO_INTERPRETER_MESSAGE};
use super::events::{Event, EventHandler};
use super::state::PendingAction;
use super::views;

/// Result from the background interpretation task
type InterpretResult = Result<GoalSpec, InterpretError>;

/// What woke the main loop
enum Wake {
    Event(Event),
    /// `None` when the task ended without sending a result
    Interpreted(Option<InterpretResult>),
}

/// Wait for the in-flight interpretation, or forever when there is none
async fn next_result(rx: &mut Option<mpsc::Receiver<InterpretResult>>) -> Option<InterpretResult> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,
    /// Session goals; only the runner touches them
    store: GoalStore,
    interpreter: Option<Interpreter>,
    clock: CountdownClock,
    /// Receiver for the in-flight interpretation
    interpret_rx: Option<mpsc::Receiver<InterpretResult>>,
    interpret_task: Option<JoinHandle<()>>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, interpreter: Option<Interpreter>, tick_rate: Duration, countdown_interval: Duration) -> Self {
        debug!(
            has_interpreter = interpreter.is_some(),
            ?tick_rate,
            ?countdown_interval,
            "TuiRunner::new: called"
        );
        let mut app = App::new();
        if interpreter.is_none() {
            app.state_mut().interpreter_available = false;
            app.state_mut().set_notice(Notice::warning(NO_INTERPRETER_MESSAGE));
        }

        Self {
            app,
            terminal,
            event_handler: EventHandler::new(tick_rate),
            store: GoalStore::new(),
            interpreter,
            clock: CountdownClock::new(countdown_interval),
            interpret_rx: None,
            interpret_task: None,
        }
    }

    /// Run the main loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        info!("Goal tracker started");
        self.refresh_view();

        loop {
            self.terminal.draw(|frame| views::render(self.app.state_mut(), frame))?;

            let events = &mut self.event_handler;
            let interpret_rx = &mut self.interpret_rx;
            let wake = tokio::select! {
                event = events.next() => Wake::Event(event?),
                result = next_result(interpret_rx) => Wake::Interpreted(result),
            };

            match wake {
                Wake::Event(Event::Tick) => self.handle_tick(),
                Wake::Event(Event::Key(key)) => {
                    if self.app.handle_key(key) {
                        debug!("TuiRunner::run: quit key");
                        break;
                    }
                    self.handle_tick();
                }
                Wake::Event(Event::Resize(width, height)) => {
                    debug!(width, height, "TuiRunner::run: resize");
                }
                Wake::Interpreted(result) => self.finish_interpretation(result),
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        if let Some(task) = self.interpret_task.take() {
            task.abort();
        }
        info!(goals = self.store.len(), "Goal tracker exiting");
        Ok(())
    }

    /// Apply queued work, then recompute countdowns if they are due
    fn handle_tick(&mut self) {
        if let Some(text) = self.app.state_mut().pending_submit.take() {
            self.start_interpretation(text);
        }

        match self.app.state_mut().pending_action.take() {
            Some(PendingAction::SetStatus { index, status }) => {
                debug!(index, %status, "TuiRunner::handle_tick: status change");
                let notice = tracker::change_status(&mut self.store, index, status);
                self.app.state_mut().set_notice(notice);
                self.clock.force();
            }
            Some(PendingAction::Refresh) => self.clock.force(),
            None => {}
        }

        if self.clock.due(Instant::now()) {
            self.refresh_view();
        }
    }

    /// Spawn the interpretation request so the UI keeps redrawing
    fn start_interpretation(&mut self, text: String) {
        let Some(interpreter) = self.interpreter.clone() else {
            warn!("Goal submitted with no interpreter configured");
            return;
        };
        debug!(text_len = text.len(), "TuiRunner::start_interpretation: spawning");

        let (tx, rx) = mpsc::channel(1);
        self.interpret_rx = Some(rx);
        self.app.state_mut().interpreting = true;

        self.interpret_task = Some(tokio::spawn(async move {
            let result = interpreter.interpret(&text).await;
            if tx.send(result).await.is_err() {
                debug!("interpretation result dropped, runner gone");
            }
        }));
    }

    fn finish_interpretation(&mut self, result: Option<InterpretResult>) {
        debug!(received = result.is_some(), "TuiRunner::finish_interpretation: called");
        self.interpret_rx = None;
        self.interpret_task = None;
        self.app.state_mut().interpreting = false;

        let notice = match result {
            Some(result) => tracker::add_interpreted(&mut self.store, result),
            None => {
                warn!("Interpretation task ended without a result");
                Notice::error("Interpretation failed: the request was interrupted")
            }
        };
        self.app.state_mut().set_notice(notice);
        self.clock.force();
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        let view = TrackerView::build(&self.store, &Local::now());
        self.app.state_mut().set_view(view);
    }
}
