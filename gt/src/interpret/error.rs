//! Interpretation error types

use thiserror::Error;

use crate::llm::LlmError;

/// Message shown when input is missing
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a goal and duration.";

/// Message shown when the model's reply cannot be used
pub const UNINTERPRETABLE_MESSAGE: &str =
    "Couldn't interpret the input. Please try again with a clear goal and duration.";

/// Message shown when the provider rejects the API key
pub const AUTH_FAILED_MESSAGE: &str =
    "Interpretation failed: the LLM provider rejected the API key. Check llm.api-key-env or llm.api-key-file.";

/// Why free text could not be turned into a goal
#[derive(Debug, Error)]
pub enum InterpretError {
    /// Input was empty or whitespace
    #[error("no goal text given")]
    EmptyInput,

    /// Model reply was not a JSON object
    #[error("reply is not a JSON object: {0}")]
    NotJson(String),

    /// A required key was absent or null
    #[error("reply is missing '{0}'")]
    MissingField(&'static str),

    /// A key was present with an unusable value
    #[error("reply has invalid '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Model returned no text at all
    #[error("reply has no text content")]
    NoContent,

    /// The completion call itself failed
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl InterpretError {
    /// True when the model answered but the answer was unusable
    pub fn is_uninterpretable(&self) -> bool {
        matches!(
            self,
            Self::NotJson(_) | Self::MissingField(_) | Self::InvalidField { .. } | Self::NoContent
        )
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => EMPTY_INPUT_MESSAGE.to_string(),
            e if e.is_uninterpretable() => UNINTERPRETABLE_MESSAGE.to_string(),
            Self::Llm(e) if e.is_auth() => AUTH_FAILED_MESSAGE.to_string(),
            e => format!("Interpretation failed: {}", e),
        }
    }
}
