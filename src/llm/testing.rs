//! In-process provider double for tests.

use crate::llm::service::{LlmServiceError, Provider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Reply {
    Text(String),
    RejectCredential,
    Fail(String),
}

/// Provider that answers every call the same way and counts invocations
pub(crate) struct ScriptedProvider {
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedProvider {
    fn build(reply: Reply, delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            delay,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Self::build(Reply::Text(text.into()), None)
    }

    pub fn rejecting_credential() -> Arc<Self> {
        Self::build(Reply::RejectCredential, None)
    }

    pub fn failing(message: impl Into<String>) -> Arc<Self> {
        Self::build(Reply::Fail(message.into()), None)
    }

    pub fn stalling(delay: Duration) -> Arc<Self> {
        Self::build(Reply::Text(String::new()), Some(delay))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(
        &self,
        prompt: &str,
        _api_key: &str,
        _max_tokens: u32,
    ) -> Result<String, LlmServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::RejectCredential => Err(LlmServiceError::AuthError("invalid x-api-key".to_string())),
            Reply::Fail(message) => Err(LlmServiceError::ApiError(message.clone())),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
