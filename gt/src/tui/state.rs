//! TUI state types
//!
//! Everything the views render lives here. The runner writes fresh data into
//! [`AppState::view`] on each countdown refresh; key handling in [`super::App`]
//! only touches interaction state and queues work for the runner.

use crate::domain::GoalStatus;
use crate::tracker::{ActiveGoalRow, Notice, TrackerView};

/// Statuses offered by the status picker, in display order
pub const PICKER_STATUSES: [GoalStatus; 4] = GoalStatus::ALL;

/// Status picker for one goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPicker {
    /// Store index captured when the picker opened
    pub index: usize,
    pub name: String,
    /// Offset into [`PICKER_STATUSES`]
    pub selected: usize,
}

impl StatusPicker {
    pub fn for_goal(goal: &ActiveGoalRow) -> Self {
        Self {
            index: goal.index,
            name: goal.name.clone(),
            selected: GoalStatus::Active.position(),
        }
    }

    pub fn select_next(&mut self) {
        if self.selected < PICKER_STATUSES.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn status(&self) -> GoalStatus {
        PICKER_STATUSES[self.selected]
    }
}

/// Interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionMode {
    /// Normal navigation
    Normal,
    /// Typing a goal description
    GoalInput(String),
    /// Choosing a new status for a goal
    StatusSelect(StatusPicker),
    /// Quit confirmation (true = Yes highlighted)
    ConfirmQuit(bool),
    /// Help overlay
    Help,
}

/// Work queued by key handling for the runner to perform on the next tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Apply a confirmed status change
    SetStatus { index: usize, status: GoalStatus },
    /// Recompute countdowns now
    Refresh,
}

/// Selection state for the active goals table
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub selected_index: usize,
    /// First row shown in the table
    pub scroll_offset: usize,
}

impl SelectionState {
    pub fn select_next(&mut self, max_items: usize) {
        if max_items > 0 && self.selected_index < max_items - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Ensure selection is within bounds
    pub fn clamp(&mut self, max_items: usize) {
        if max_items == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= max_items {
            self.selected_index = max_items - 1;
        }
        self.scroll_offset = self.scroll_offset.min(self.selected_index);
    }

    /// Move the scroll window the least amount that keeps the selection in
    /// view, returning the new offset
    ///
    /// The window never extends past the last of `total` rows.
    pub fn scroll_to_selected(&mut self, visible_rows: usize, total: usize) -> usize {
        let selected = self.selected_index;
        let offset = if visible_rows == 0 {
            selected
        } else if selected >= self.scroll_offset + visible_rows {
            selected + 1 - visible_rows
        } else if selected < self.scroll_offset {
            selected
        } else {
            self.scroll_offset
        };
        self.scroll_offset = offset.min(total.saturating_sub(visible_rows));
        self.scroll_offset
    }
}

/// Main TUI application state
#[derive(Debug)]
pub struct AppState {
    /// Current interaction mode
    pub interaction_mode: InteractionMode,
    /// Should the app quit
    pub should_quit: bool,
    /// Result of the last action, cleared on the next key press
    pub notice: Option<Notice>,

    /// Goals as of the last countdown refresh
    pub view: TrackerView,
    /// Selection in the active goals table
    pub selection: SelectionState,

    /// An interpretation request is in flight
    pub interpreting: bool,
    /// Submitted goal text waiting to be interpreted
    pub pending_submit: Option<String>,
    /// Queued action for the runner
    pub pending_action: Option<PendingAction>,
    /// Whether goal text can be interpreted at all
    pub interpreter_available: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            interaction_mode: InteractionMode::Normal,
            should_quit: false,
            notice: None,
            view: TrackerView::default(),
            selection: SelectionState::default(),
            interpreting: false,
            pending_submit: None,
            pending_action: None,
            interpreter_available: true,
        }
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Replace the displayed goals, keeping the selection in bounds
    pub fn set_view(&mut self, view: TrackerView) {
        self.view = view;
        self.selection.clamp(self.view.active.len());
    }

    pub fn active_count(&self) -> usize {
        self.view.active.len()
    }

    /// Currently highlighted active goal
    pub fn selected_goal(&self) -> Option<&ActiveGoalRow> {
        self.view.active.get(self.selection.selected_index)
    }
}
