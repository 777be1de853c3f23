//! Goal tracker operations and view model
//!
//! The glue between user actions and the [`GoalStore`]: applying an
//! interpretation result, confirming a status change, and projecting the
//! store into rows for display. Nothing here knows about the terminal.

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::countdown::{Remaining, format_clock, format_remaining, remaining};
use crate::domain::{GoalStatus, GoalStore};
use crate::interpret::{GoalSpec, InterpretError};

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A one-line message shown to the user after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }
}

/// Add the interpreted goal to the store, or explain why not
pub fn add_interpreted(store: &mut GoalStore, result: Result<GoalSpec, InterpretError>) -> Notice {
    match result {
        Ok(spec) => {
            debug!(name = %spec.name, "add_interpreted: creating goal");
            store.create(spec.name.clone(), spec.duration);
            Notice::success(format!(
                "Goal '{}' added successfully for {} minutes!",
                spec.name,
                spec.minutes_display()
            ))
        }
        Err(e) => {
            debug!(error = %e, "add_interpreted: no goal created");
            Notice::error(e.user_message())
        }
    }
}

/// Apply a confirmed status change to the goal at `index`
pub fn change_status(store: &mut GoalStore, index: usize, status: GoalStatus) -> Notice {
    match store.set_status(index, status) {
        Ok(goal) => match status {
            GoalStatus::Completed => Notice::success(format!("Goal '{}' marked as completed!", goal.name)),
            GoalStatus::Abandoned => Notice::warning(format!("Goal '{}' marked as abandoned.", goal.name)),
            GoalStatus::Deleted => Notice::info(format!("Goal '{}' has been deleted.", goal.name)),
            GoalStatus::Active => Notice::info(format!("Goal '{}' is active.", goal.name)),
        },
        Err(e) => {
            warn!(error = %e, "Status change rejected");
            Notice::error(format!("Could not update goal: {}", e))
        }
    }
}

/// One active goal, formatted for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveGoalRow {
    /// Position in the store (valid until the next delete)
    pub index: usize,
    pub name: String,
    pub start: String,
    pub end: String,
    pub left: String,
    pub expired: bool,
}

/// One finished goal, formatted for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub name: String,
    /// Deadline clock time
    pub at: String,
}

/// Everything the UI shows, computed from the store at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerView {
    pub active: Vec<ActiveGoalRow>,
    pub completed: Vec<HistoryRow>,
    pub abandoned: Vec<HistoryRow>,
}

impl TrackerView {
    /// Project the store as of `now`
    pub fn build(store: &GoalStore, now: &DateTime<Local>) -> Self {
        let active = store
            .indexed_by_status(GoalStatus::Active)
            .into_iter()
            .map(|(index, goal)| {
                let left = remaining(&goal.end_time, now);
                ActiveGoalRow {
                    index,
                    name: goal.name.clone(),
                    start: format_clock(&goal.start_time),
                    end: format_clock(&goal.end_time),
                    left: format_remaining(left),
                    expired: left == Remaining::Expired,
                }
            })
            .collect();

        let history = |status: GoalStatus| -> Vec<HistoryRow> {
            store
                .list_by_status(status)
                .into_iter()
                .map(|goal| HistoryRow {
                    name: goal.name.clone(),
                    at: format_clock(&goal.end_time),
                })
                .collect()
        };

        Self {
            active,
            completed: history(GoalStatus::Completed),
            abandoned: history(GoalStatus::Abandoned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GoalRecord;
    use chrono::TimeDelta;
    use std::time::Duration;

    fn spec(name: &str, minutes: u64) -> GoalSpec {
        GoalSpec {
            name: name.to_string(),
            duration: Duration::from_secs(minutes * 60),
        }
    }

    #[test]
    fn test_add_interpreted_success() {
        let mut store = GoalStore::new();
        let notice = add_interpreted(&mut store, Ok(spec("finish report", 45)));

        assert_eq!(store.len(), 1);
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.text, "Goal 'finish report' added successfully for 45 minutes!");
    }

    #[test]
    fn test_add_interpreted_failure_leaves_store() {
        let mut store = GoalStore::new();
        let notice = add_interpreted(&mut store, Err(InterpretError::MissingField("duration_minutes")));

        assert!(store.is_empty());
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.text.starts_with("Couldn't interpret the input."));

        let notice = add_interpreted(&mut store, Err(InterpretError::EmptyInput));
        assert_eq!(notice.text, "Please enter a goal and duration.");
        assert!(store.is_empty());
    }

    #[test]
    fn test_change_status_messages() {
        let mut store = GoalStore::new();
        for name in ["a", "b", "c"] {
            store.create(name, Duration::from_secs(60));
        }

        let n = change_status(&mut store, 0, GoalStatus::Completed);
        assert_eq!(n, Notice::success("Goal 'a' marked as completed!"));

        let n = change_status(&mut store, 1, GoalStatus::Abandoned);
        assert_eq!(n, Notice::warning("Goal 'b' marked as abandoned."));

        let n = change_status(&mut store, 2, GoalStatus::Deleted);
        assert_eq!(n, Notice::info("Goal 'c' has been deleted."));
        assert_eq!(store.len(), 2);

        let n = change_status(&mut store, 5, GoalStatus::Completed);
        assert_eq!(n.level, NoticeLevel::Error);
    }

    #[test]
    fn test_view_build() {
        let mut store = GoalStore::new();
        let now = Local::now();
        store.add(GoalRecord::starting_at("running", Duration::from_secs(3600), now));
        store.add(GoalRecord::starting_at(
            "late",
            Duration::from_secs(60),
            now - TimeDelta::minutes(5),
        ));
        store.add(GoalRecord::starting_at("done", Duration::from_secs(60), now));
        store.add(GoalRecord::starting_at("dropped", Duration::from_secs(60), now));
        store.set_status(2, GoalStatus::Completed).unwrap();
        store.set_status(3, GoalStatus::Abandoned).unwrap();

        let view = TrackerView::build(&store, &now);

        assert_eq!(view.active.len(), 2);
        assert_eq!(view.active[0].index, 0);
        assert_eq!(view.active[0].left, "01:00:00");
        assert!(!view.active[0].expired);
        assert_eq!(view.active[1].left, "Time's up!");
        assert!(view.active[1].expired);

        assert_eq!(view.completed.len(), 1);
        assert_eq!(view.completed[0].name, "done");
        assert_eq!(view.abandoned.len(), 1);
        assert_eq!(view.abandoned[0].name, "dropped");
    }
}
