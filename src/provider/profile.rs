//! Provider configuration: which backend to call, with which model and credentials.

use crate::error::ApiError;
use crate::provider::CompletionOptions;
use serde::{Deserialize, Serialize};

/// Backend family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    #[serde(rename = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
    #[serde(rename = "local")]
    LocalCustom,
}

impl ProviderType {
    /// Environment variable consulted when no API key is configured
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderType::OpenAI => Some("OPENAI_API_KEY"),
            ProviderType::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderType::Ollama | ProviderType::LocalCustom => None,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderType::OpenAI | ProviderType::Anthropic)
    }
}

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider_type: ProviderType,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub default_options: CompletionOptions,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::OpenAI,
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            endpoint: None,
            default_options: CompletionOptions::default(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!(
                    "Endpoint must start with http:// or https://: {}",
                    endpoint
                ));
            }
        }
        if self.provider_type == ProviderType::LocalCustom && self.endpoint.is_none() {
            return Err("Local provider requires an endpoint".to_string());
        }
        if let Some(temperature) = self.default_options.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(format!("Temperature out of range 0.0-2.0: {}", temperature));
            }
        }
        Ok(())
    }

    /// Configured key, falling back to the provider's environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| {
                self.provider_type
                    .api_key_env()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|key| !key.is_empty())
            })
    }

    pub fn require_api_key(&self) -> Result<String, ApiError> {
        self.resolve_api_key().ok_or_else(|| {
            ApiError::ProviderNotConfigured(format!(
                "No API key for {:?} provider (set api_key or {})",
                self.provider_type,
                self.provider_type.api_key_env().unwrap_or("api_key")
            ))
        })
    }

    /// Copy safe to print: the API key is masked
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}
