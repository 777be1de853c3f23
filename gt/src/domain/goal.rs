//! GoalRecord domain type
//!
//! A tracked user objective with a time window and a lifecycle status.

use chrono::{DateTime, Local, TimeDelta};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Countdown running
    #[default]
    Active,
    /// User confirmed the goal was reached
    Completed,
    /// User gave up on the goal
    Abandoned,
    /// Removed from the store (never held by a stored record)
    Deleted,
}

impl GoalStatus {
    /// All statuses in selector order
    pub const ALL: [GoalStatus; 4] = [Self::Active, Self::Completed, Self::Abandoned, Self::Deleted];

    /// Position of this status in [`GoalStatus::ALL`]
    pub fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
            Self::Abandoned => write!(f, "Abandoned"),
            Self::Deleted => write!(f, "Deleted"),
        }
    }
}

/// A goal with its countdown window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    /// Goal name as extracted from the user's text
    pub name: String,

    /// When the goal was created
    pub start_time: DateTime<Local>,

    /// Deadline (start_time + requested duration)
    pub end_time: DateTime<Local>,

    /// Current status
    pub status: GoalStatus,
}

impl GoalRecord {
    /// Create an active goal starting now
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self::starting_at(name, duration, Local::now())
    }

    /// Create an active goal with an explicit start time
    pub fn starting_at(name: impl Into<String>, duration: Duration, start_time: DateTime<Local>) -> Self {
        let name = name.into();
        debug!(%name, ?duration, "GoalRecord::starting_at: called");
        let delta = TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX);
        let end_time = start_time.checked_add_signed(delta).unwrap_or(start_time);

        Self {
            name,
            start_time,
            end_time,
            status: GoalStatus::Active,
        }
    }

    /// Create an active goal from a minute count
    ///
    /// Negative minute counts are clamped to zero so the deadline never
    /// precedes the start.
    pub fn from_minutes(name: impl Into<String>, duration_minutes: i64) -> Self {
        let secs = duration_minutes.max(0).unsigned_abs().saturating_mul(60);
        Self::new(name, Duration::from_secs(secs))
    }

    /// Length of the goal window
    pub fn duration(&self) -> Duration {
        (self.end_time - self.start_time).to_std().unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_goal_is_active() {
        let goal = GoalRecord::new("finish report", Duration::from_secs(45 * 60));
        assert_eq!(goal.status, GoalStatus::Active);
        assert!(goal.is_active());
        assert_eq!(goal.end_time - goal.start_time, TimeDelta::minutes(45));
    }

    #[test]
    fn test_from_minutes_matches_duration() {
        let goal = GoalRecord::from_minutes("read", 90);
        assert_eq!(goal.duration(), Duration::from_secs(90 * 60));
    }

    #[test]
    fn test_negative_minutes_clamped() {
        let goal = GoalRecord::from_minutes("oops", -5);
        assert_eq!(goal.start_time, goal.end_time);
        assert_eq!(goal.duration(), Duration::ZERO);
    }

    #[test]
    fn test_empty_name_allowed() {
        let goal = GoalRecord::from_minutes("", 10);
        assert!(goal.name.is_empty());
    }

    #[test]
    fn test_status_display() {
        let names: Vec<String> = GoalStatus::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["Active", "Completed", "Abandoned", "Deleted"]);
    }

    #[test]
    fn test_status_position() {
        assert_eq!(GoalStatus::Active.position(), 0);
        assert_eq!(GoalStatus::Deleted.position(), 3);
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&GoalStatus::Abandoned).unwrap();
        assert_eq!(json, "\"abandoned\"");
    }
}
