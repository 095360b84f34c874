//! Model Provider Abstraction
//!
//! Unified interface for the text-generation backends a resolver can call
//! (OpenAI, Anthropic, local models via Ollama, custom OpenAI-compatible
//! servers). Transport concerns such as timeouts and status mapping live
//! here; retry policy does not.

use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

pub mod profile;

pub use profile::{ProviderConfig, ProviderType};

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Completion options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Per-call model override; the client's configured model otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>, // 0.0-2.0
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    #[serde(default)]
    pub stop: Option<Vec<String>>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: Some(1.0),
            max_tokens: None,
            top_p: None,
            stop: None,
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
    pub finish_reason: Option<String>,
}

/// Model provider client trait
#[async_trait]
pub trait ModelProviderClient: Send + Sync {
    /// Generate a completion from a list of messages
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Get the default model name
    fn model_name(&self) -> &str;
}

// OpenAI-compatible API request/response structures
#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl ChatCompletionResponse {
    /// First choice wins; an empty `choices` array is a provider error
    fn into_completion(self) -> Result<CompletionResponse, ApiError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ProviderError("No choices in response".to_string()))?;

        let usage = self.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(CompletionResponse {
            content: choice.message.content,
            model: self.model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    model: String,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    /// Text blocks are concatenated in order
    fn into_completion(self) -> CompletionResponse {
        let content = self
            .content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        let usage = self.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        CompletionResponse {
            content,
            model: self.model,
            usage,
            finish_reason: self.stop_reason,
        }
    }
}

fn role_to_string(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    }
}

// Map transport-level failures to ApiError
fn map_http_error(error: reqwest::Error) -> ApiError {
    if let Some(status) = error.status() {
        map_status(status.as_u16(), &error.to_string())
    } else if error.is_timeout() {
        ApiError::ProviderRequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ApiError::ProviderRequestFailed(format!("Connection error: {}", error))
    } else {
        ApiError::ProviderError(format!("HTTP error: {}", error))
    }
}

pub(crate) fn map_status(status: u16, detail: &str) -> ApiError {
    match status {
        401 | 403 => ApiError::ProviderAuthFailed(format!("Authentication failed: {}", detail)),
        429 => ApiError::ProviderRateLimit(format!("Rate limit exceeded: {}", detail)),
        404 => ApiError::ProviderModelNotFound(format!("Model not found: {}", detail)),
        _ => ApiError::ProviderRequestFailed(format!(
            "Request failed with status {}: {}",
            status, detail
        )),
    }
}

/// Send a request and turn non-success statuses into provider errors
async fn send_checked(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(map_http_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(map_status(status.as_u16(), &error_text))
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn build_provider_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT)
        .timeout(PROVIDER_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Client for any backend speaking the OpenAI chat-completions format
/// (OpenAI itself, Ollama's `/v1` endpoint, local inference servers)
pub struct OpenAICompatibleClient {
    client: Client,
    provider: &'static str,
    model: String,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAICompatibleClient {
    pub fn new(
        provider: &'static str,
        model: String,
        api_key: Option<String>,
        base_url: String,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_provider_http_client()?,
            provider,
            model,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn openai(model: String, api_key: String, base_url: Option<String>) -> Result<Self, ApiError> {
        let base_url = base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string());
        Self::new("openai", model, Some(api_key), base_url)
    }

    pub fn ollama(model: String, base_url: Option<String>) -> Result<Self, ApiError> {
        let base_url = base_url.unwrap_or_else(|| OLLAMA_BASE_URL.to_string());
        Self::new("ollama", model, None, base_url)
    }

    pub fn local(model: String, endpoint: String, api_key: Option<String>) -> Result<Self, ApiError> {
        Self::new("local", model, api_key, endpoint)
    }
}

#[async_trait]
impl ModelProviderClient for OpenAICompatibleClient {
    #[instrument(skip_all, fields(provider = self.provider))]
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        let request = ChatCompletionRequest {
            model: options.model.unwrap_or_else(|| self.model.clone()),
            messages: messages
                .into_iter()
                .map(|msg| OpenAIMessage {
                    role: role_to_string(msg.role).to_string(),
                    content: msg.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: options.stop,
            stream: false,
        };
        debug!(model = %request.model, "Sending chat completion request");

        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }
        let response = send_checked(builder).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))?;

        completion.into_completion()
    }

    fn provider_name(&self) -> &str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Anthropic messages API client
pub struct AnthropicClient {
    client: Client,
    model: String,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(model: String, api_key: String) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_provider_http_client()?,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl ModelProviderClient for AnthropicClient {
    #[instrument(skip_all, fields(provider = "anthropic"))]
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        let model = options.model.unwrap_or_else(|| self.model.clone());
        let system_message = messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| m.content.clone());

        let turns: Vec<_> = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| json!({"role": role_to_string(m.role), "content": m.content}))
            .collect();

        let mut request_body = json!({
            "model": model,
            "max_tokens": options.max_tokens.unwrap_or(1024),
            "messages": turns,
        });
        if let Some(system) = system_message {
            request_body["system"] = json!(system);
        }
        if let Some(temp) = options.temperature {
            request_body["temperature"] = json!(temp);
        }
        if let Some(stop) = options.stop {
            request_body["stop_sequences"] = json!(stop);
        }

        let response = send_checked(
            self.client
                .post(ANTHROPIC_MESSAGES_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .json(&request_body),
        )
        .await?;

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))?;

        Ok(completion.into_completion())
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Provider factory for creating provider clients
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_client(config: &ProviderConfig) -> Result<Box<dyn ModelProviderClient>, ApiError> {
        let model = config.model.clone();
        let endpoint = config.endpoint.clone();
        match config.provider_type {
            ProviderType::OpenAI => Ok(Box::new(OpenAICompatibleClient::openai(
                model,
                config.require_api_key()?,
                endpoint,
            )?)),
            ProviderType::Anthropic => Ok(Box::new(AnthropicClient::new(
                model,
                config.require_api_key()?,
            )?)),
            ProviderType::Ollama => Ok(Box::new(OpenAICompatibleClient::ollama(model, endpoint)?)),
            ProviderType::LocalCustom => {
                let endpoint = endpoint.ok_or_else(|| {
                    ApiError::ProviderNotConfigured(
                        "local provider requires an endpoint".to_string(),
                    )
                })?;
                Ok(Box::new(OpenAICompatibleClient::local(
                    model,
                    endpoint,
                    config.resolve_api_key(),
                )?))
            }
        }
    }
}
