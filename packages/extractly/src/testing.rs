//! Testing utilities including mock implementations.
//!
//! Useful for exercising the pipeline and the server without making real
//! LLM or network calls.

use async_trait::async_trait;
use std::sync::{Mutex, RwLock};

use crate::error::{ExtractlyError, Result};
use crate::traits::ai::AI;

/// A mock AI implementation for tests.
///
/// Replays canned responses (a queue first, then a constant fallback) or
/// fails every call with a configured error. Records every prompt it was
/// given for assertions.
#[derive(Default)]
pub struct MockAI {
    responses: Mutex<Vec<String>>,
    fallback: Option<String>,
    error: Option<String>,
    prompts: RwLock<Vec<String>>,
}

impl MockAI {
    /// Always reply with the same text.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            fallback: Some(response.into()),
            ..Default::default()
        }
    }

    /// Reply with each queued response once, in order, then the fallback
    /// (if any).
    pub fn with_responses(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut queued: Vec<String> = responses.into_iter().map(Into::into).collect();
        queued.reverse(); // pop() yields front-of-queue first
        Self {
            responses: Mutex::new(queued),
            ..Default::default()
        }
    }

    /// Fail every call with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.prompts.read().unwrap().len()
    }

    /// The most recent prompt, if any call was made.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.read().unwrap().last().cloned()
    }
}

#[async_trait]
impl AI for MockAI {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.write().unwrap().push(prompt.to_string());

        if let Some(message) = &self.error {
            return Err(ExtractlyError::AI(message.clone().into()));
        }

        if let Some(queued) = self.responses.lock().unwrap().pop() {
            return Ok(queued);
        }

        self.fallback
            .clone()
            .ok_or_else(|| ExtractlyError::AI("MockAI has no response configured".into()))
    }
}
