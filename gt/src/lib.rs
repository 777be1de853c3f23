//! Goal Tracker - LLM-interpreted goals with live countdowns
//!
//! Describe a goal in plain words ("finish report in 45 minutes"), an LLM
//! extracts the goal name and duration, and the tracker counts down to the
//! deadline until the goal is completed, abandoned, or deleted.
//!
//! # Modules
//!
//! - [`domain`] - Goal records and the session goal store
//! - [`interpret`] - Free text to validated goal parameters
//! - [`llm`] - LLM client trait with OpenAI and Anthropic implementations
//! - [`countdown`] - Remaining-time computation and refresh cadence
//! - [`tracker`] - Store operations and the display view model
//! - [`tui`] - Terminal user interface
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod countdown;
pub mod domain;
pub mod interpret;
pub mod llm;
pub mod tracker;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, LlmConfig, TrackerConfig};
pub use domain::{GoalRecord, GoalStatus, GoalStore, StoreError};
pub use interpret::{GoalSpec, InterpretError, Interpreter};
pub use llm::{
    AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client,
};
pub use tracker::{Notice, NoticeLevel, TrackerView};
