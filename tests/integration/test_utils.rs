//! Shared fixtures: a scripted backend and sample schemas.

use async_trait::async_trait;
use graphgen::error::ApiError;
use graphgen::provider::{
    ChatMessage, CompletionOptions, CompletionResponse, ModelProviderClient, TokenUsage,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MOVIE_SCHEMA: &str = r#"
"""A film"""
type Movie {
  title: String!
  plot: String
}

type Actor {
  name: String!
  awards: [String!]
}

interface Named {
  name: String!
}

scalar Date

enum Genre {
  DRAMA
  COMEDY
}

input MovieFilter {
  title: String
}

union Credit = Movie | Actor
"#;

type Script = dyn Fn(&[ChatMessage], &CompletionOptions) -> Result<String, ApiError> + Send + Sync;

/// Backend double: answers through a script and records every request
pub struct ScriptedProvider {
    script: Box<Script>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&[ChatMessage], &CompletionOptions) -> Result<String, ApiError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            script: Box::new(script),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Echo the last message back, prefixed with the model in use
    pub fn echo() -> Self {
        Self::new(|messages, options| {
            let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            let model = options.model.clone().unwrap_or_else(|| "scripted".to_string());
            Ok(format!("[{}] {}", model, prompt))
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|messages| messages.last().map(|m| m.content.clone()))
            .collect()
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl ModelProviderClient for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        self.calls.lock().unwrap().push(messages.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let content = (self.script)(&messages, &options)?;
        Ok(CompletionResponse {
            content,
            model: options.model.unwrap_or_else(|| "scripted".to_string()),
            usage: TokenUsage::default(),
            finish_reason: Some("stop".to_string()),
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
