//! Generation pipeline
//!
//! Three stages run in order for every call: fill the prompt template from
//! the call's context, send the prompt to the backend, decode the backend's
//! reply to plain text. A templating failure stops the pipeline before the
//! backend is contacted.

use crate::error::ApiError;
use crate::provider::{ChatMessage, CompletionOptions, CompletionResponse, ModelProviderClient};
use crate::template::{PromptTemplate, TemplateContext};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Final stage: backend response to text
#[derive(Debug, Clone, Copy, Default)]
pub struct StringOutputDecoder;

impl StringOutputDecoder {
    pub fn decode(&self, response: CompletionResponse) -> String {
        response.content
    }
}

/// Template fill → backend completion → text decoding
#[derive(Clone)]
pub struct GenerationPipeline {
    client: Arc<dyn ModelProviderClient>,
    options: CompletionOptions,
    system_prompt: Option<String>,
    decoder: StringOutputDecoder,
}

impl GenerationPipeline {
    pub fn new(client: Arc<dyn ModelProviderClient>) -> Self {
        Self {
            client,
            options: CompletionOptions::default(),
            system_prompt: None,
            decoder: StringOutputDecoder,
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn client(&self) -> &dyn ModelProviderClient {
        self.client.as_ref()
    }

    /// Run all three stages. `model` overrides the configured model for this call.
    #[instrument(skip_all, fields(provider = self.client.provider_name()))]
    pub async fn run(
        &self,
        template: &PromptTemplate,
        context: &TemplateContext,
        model: Option<&str>,
    ) -> Result<String, ApiError> {
        let prompt = template.fill(context)?;
        debug!(prompt_len = prompt.len(), "Prompt filled");

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(prompt));

        let mut options = self.options.clone();
        if let Some(model) = model {
            options.model = Some(model.to_string());
        }

        let response = self.client.complete(messages, options).await?;
        debug!(
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Completion received"
        );
        Ok(self.decoder.decode(response))
    }
}
