//! Session goal store
//!
//! An ordered, in-memory collection of goals owned by one session. Indices
//! are positions in insertion order; deleting a goal shifts every later
//! index down by one, so callers must not hold indices across a delete.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use super::goal::{GoalRecord, GoalStatus};

/// Errors from store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Goal index {index} out of range (store holds {len} goals)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered goal collection for a single session
#[derive(Debug, Clone, Default)]
pub struct GoalStore {
    goals: Vec<GoalRecord>,
}

impl GoalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an active goal starting now and append it
    pub fn create(&mut self, name: impl Into<String>, duration: Duration) -> &GoalRecord {
        let index = self.add(GoalRecord::new(name, duration));
        &self.goals[index]
    }

    /// Append a goal, returning its index
    pub fn add(&mut self, record: GoalRecord) -> usize {
        debug!(name = %record.name, status = %record.status, "GoalStore::add: called");
        self.goals.push(record);
        self.goals.len() - 1
    }

    /// Change the status of the goal at `index`
    ///
    /// `Deleted` removes the goal; every other status is applied in place.
    /// Returns the affected goal as it now stands (the removed goal for
    /// `Deleted`).
    pub fn set_status(&mut self, index: usize, status: GoalStatus) -> Result<GoalRecord, StoreError> {
        debug!(index, %status, len = self.goals.len(), "GoalStore::set_status: called");
        if index >= self.goals.len() {
            debug!(index, "GoalStore::set_status: index out of range");
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.goals.len(),
            });
        }

        if status == GoalStatus::Deleted {
            let mut removed = self.goals.remove(index);
            removed.status = GoalStatus::Deleted;
            info!(name = %removed.name, index, "Goal deleted");
            return Ok(removed);
        }

        let goal = &mut self.goals[index];
        goal.status = status;
        info!(name = %goal.name, index, %status, "Goal status updated");
        Ok(goal.clone())
    }

    /// Goals with the given status, in insertion order
    pub fn list_by_status(&self, status: GoalStatus) -> Vec<&GoalRecord> {
        self.goals.iter().filter(|g| g.status == status).collect()
    }

    /// Like [`GoalStore::list_by_status`] but paired with each goal's index
    pub fn indexed_by_status(&self, status: GoalStatus) -> Vec<(usize, &GoalRecord)> {
        self.goals
            .iter()
            .enumerate()
            .filter(|(_, g)| g.status == status)
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&GoalRecord> {
        self.goals.get(index)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GoalRecord> {
        self.goals.iter()
    }
}
