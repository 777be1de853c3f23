//! TUI application - key handling
//!
//! The App struct owns the AppState and turns key presses into state changes.
//! Anything that touches the goal store is queued as a [`PendingAction`] or
//! a pending submit for the runner to apply on its next tick.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::interpret::EMPTY_INPUT_MESSAGE;
use crate::tracker::Notice;

use super::state::{AppState, InteractionMode, PendingAction, StatusPicker};

/// Shown when a goal is submitted before the previous one is interpreted
pub const BUSY_MESSAGE: &str = "Still interpreting the previous goal. Please wait.";

/// Shown when no LLM client could be configured
pub const NO_INTERPRETER_MESSAGE: &str =
    "No LLM client configured. Check llm.api-key-env or llm.api-key-file in your config.";

/// TUI application
#[derive(Debug, Default)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self { state: AppState::new() }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.state.clear_notice();

        // Ctrl-C quits from every mode
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!(mode = ?self.state.interaction_mode, "App::handle_key: Ctrl-C");
            return true;
        }

        match &self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::GoalInput(_) => self.handle_goal_input_key(key),
            InteractionMode::StatusSelect(_) => self.handle_status_select_key(key),
            InteractionMode::ConfirmQuit(_) => self.handle_confirm_quit_key(key),
            InteractionMode::Help => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => {
                if self.state.active_count() > 0 {
                    self.state.interaction_mode = InteractionMode::ConfirmQuit(false);
                } else {
                    self.state.should_quit = true;
                }
            }

            (KeyCode::Char('?'), _) | (KeyCode::F(1), _) => {
                self.state.interaction_mode = InteractionMode::Help;
            }

            (KeyCode::Char('a'), _) | (KeyCode::Char('n'), _) | (KeyCode::Char('i'), _) => {
                self.state.interaction_mode = InteractionMode::GoalInput(String::new());
            }

            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
                self.state.selection.select_prev();
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
                let max = self.state.active_count();
                self.state.selection.select_next(max);
            }

            (KeyCode::Char('u'), _) | (KeyCode::Enter, _) => {
                if let Some(goal) = self.state.selected_goal() {
                    debug!(index = goal.index, "App: opening status picker");
                    self.state.interaction_mode = InteractionMode::StatusSelect(StatusPicker::for_goal(goal));
                }
            }

            (KeyCode::Char('r'), _) => {
                self.state.pending_action = Some(PendingAction::Refresh);
            }

            _ => {}
        }

        false
    }

    fn handle_goal_input_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => self.submit_goal(),
            KeyCode::Backspace => {
                if let InteractionMode::GoalInput(buf) = &mut self.state.interaction_mode {
                    buf.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                if let InteractionMode::GoalInput(buf) = &mut self.state.interaction_mode {
                    buf.push(c);
                }
            }
            _ => {}
        }

        false
    }

    /// Queue the typed goal for interpretation
    ///
    /// Empty input and submissions made while a request is in flight keep the
    /// text in the input line so nothing typed is lost.
    fn submit_goal(&mut self) {
        let InteractionMode::GoalInput(text) = &self.state.interaction_mode else {
            return;
        };
        let text = text.trim().to_string();

        if text.is_empty() {
            self.state.set_notice(Notice::error(EMPTY_INPUT_MESSAGE));
            return;
        }
        if !self.state.interpreter_available {
            self.state.set_notice(Notice::error(NO_INTERPRETER_MESSAGE));
            return;
        }
        if self.state.interpreting || self.state.pending_submit.is_some() {
            self.state.set_notice(Notice::warning(BUSY_MESSAGE));
            return;
        }

        debug!(text_len = text.len(), "App::submit_goal: queued");
        self.state.pending_submit = Some(text);
        self.state.interaction_mode = InteractionMode::Normal;
    }

    fn handle_status_select_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let InteractionMode::StatusSelect(picker) = &mut self.state.interaction_mode {
                    picker.select_prev();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let InteractionMode::StatusSelect(picker) = &mut self.state.interaction_mode {
                    picker.select_next();
                }
            }
            KeyCode::Enter => {
                if let InteractionMode::StatusSelect(picker) = &self.state.interaction_mode {
                    self.state.pending_action = Some(PendingAction::SetStatus {
                        index: picker.index,
                        status: picker.status(),
                    });
                }
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {}
        }

        false
    }

    fn handle_confirm_quit_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                if self.state.interaction_mode == InteractionMode::ConfirmQuit(true) {
                    self.state.should_quit = true;
                }
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.state.interaction_mode = InteractionMode::ConfirmQuit(true);
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                if let InteractionMode::ConfirmQuit(yes) = &mut self.state.interaction_mode {
                    *yes = !*yes;
                }
            }
            _ => {}
        }

        false
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {}
        }

        false
    }
}
