//! Domain types for goal tracking
//!
//! - [`GoalRecord`] / [`GoalStatus`] - a single tracked goal
//! - [`GoalStore`] - the session's ordered goal collection

mod goal;
mod store;

pub use goal::{GoalRecord, GoalStatus};
pub use store::{GoalStore, StoreError};
