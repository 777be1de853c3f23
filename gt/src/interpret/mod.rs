//! Interpretation adapter
//!
//! Turns free text such as "finish report in 45 minutes" into a validated
//! [`GoalSpec`] with a single LLM completion call. There is no retry: a
//! reply that cannot be decoded is reported as uninterpretable.

mod error;
mod parse;

pub use error::{AUTH_FAILED_MESSAGE, EMPTY_INPUT_MESSAGE, InterpretError, UNINTERPRETABLE_MESSAGE};
pub use parse::{GoalSpec, MAX_DURATION_MINUTES, parse_goal_response};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::llm::{CompletionRequest, LlmClient, Message};

/// Fixed instruction sent with every interpretation request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that interprets goal descriptions and extracts \
                                 the goal name and duration in minutes. Respond with a JSON object containing \
                                 'goal_name' and 'duration_minutes'.";

/// Token budget for an interpretation reply
const INTERPRET_MAX_TOKENS: u32 = 256;

/// Maps free text to goal parameters via an LLM
#[derive(Clone)]
pub struct Interpreter {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl Interpreter {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            max_tokens: INTERPRET_MAX_TOKENS,
        }
    }

    /// Override the reply token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the completion request for `text`
    pub fn build_request(&self, text: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(format!("Interpret this goal: {}", text))],
            max_tokens: self.max_tokens,
        }
    }

    /// Interpret `text` as a goal and duration
    ///
    /// Empty input is rejected without contacting the model.
    pub async fn interpret(&self, text: &str) -> Result<GoalSpec, InterpretError> {
        let text = text.trim();
        debug!(text_len = text.len(), "Interpreter::interpret: called");
        if text.is_empty() {
            debug!("Interpreter::interpret: empty input");
            return Err(InterpretError::EmptyInput);
        }

        let response = self.llm.complete(self.build_request(text)).await.map_err(|e| {
            warn!(error = %e, "Interpretation request failed");
            InterpretError::Llm(e)
        })?;

        let content = response.content.ok_or(InterpretError::NoContent)?;
        match parse_goal_response(&content) {
            Ok(spec) => {
                info!(name = %spec.name, minutes = spec.minutes(), "Interpreted goal");
                Ok(spec)
            }
            Err(e) => {
                warn!(error = %e, "Could not interpret model reply");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{CompletionResponse, LlmError, StopReason, TokenUsage};
    use std::time::Duration;

    #[tokio::test]
    async fn test_interpret_valid_reply() {
        let mock = Arc::new(MockLlmClient::replying(
            r#"{"goal_name": "finish report", "duration_minutes": 45}"#,
        ));
        let interpreter = Interpreter::new(mock.clone());

        let spec = interpreter.interpret("finish report in 45 minutes").await.unwrap();
        assert_eq!(spec.name, "finish report");
        assert_eq!(spec.duration, Duration::from_secs(45 * 60));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt, SYSTEM_PROMPT);
        assert_eq!(
            requests[0].messages[0].content,
            "Interpret this goal: finish report in 45 minutes"
        );
    }

    #[tokio::test]
    async fn test_interpret_empty_input_skips_llm() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let interpreter = Interpreter::new(mock.clone());

        let err = interpreter.interpret("   ").await.unwrap_err();
        assert!(matches!(err, InterpretError::EmptyInput));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_interpret_uninterpretable_reply() {
        let mock = Arc::new(MockLlmClient::replying(r#"{"goal_name": null}"#));
        let interpreter = Interpreter::new(mock.clone());

        let err = interpreter.interpret("something vague").await.unwrap_err();
        assert!(err.is_uninterpretable());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_interpret_no_content() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse {
            content: None,
            stop_reason: StopReason::MaxTokens,
            usage: TokenUsage::default(),
        }]));
        let err = Interpreter::new(mock).interpret("nap 20 min").await.unwrap_err();
        assert!(matches!(err, InterpretError::NoContent));
    }

    #[tokio::test]
    async fn test_interpret_llm_failure_propagates() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let err = Interpreter::new(mock).interpret("nap 20 min").await.unwrap_err();
        assert!(matches!(err, InterpretError::Llm(LlmError::InvalidResponse(_))));
        assert!(!err.is_uninterpretable());
    }

    #[test]
    fn test_with_max_tokens() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let interpreter = Interpreter::new(mock).with_max_tokens(64);
        assert_eq!(interpreter.build_request("x").max_tokens, 64);
    }
}
