//! Integration tests for Model Provider Integration

use graphgen::config::{ProviderConfig, ProviderType};
use graphgen::error::ApiError;
use graphgen::provider::ProviderFactory;

fn provider(provider_type: ProviderType, model: &str) -> ProviderConfig {
    ProviderConfig {
        provider_type,
        model: model.to_string(),
        ..ProviderConfig::default()
    }
}

#[test]
fn test_openai_provider_with_configured_key() {
    let config = ProviderConfig {
        api_key: Some("test-key".to_string()),
        ..provider(ProviderType::OpenAI, "gpt-4o")
    };
    let client = ProviderFactory::create_client(&config).unwrap();
    assert_eq!(client.provider_name(), "openai");
    assert_eq!(client.model_name(), "gpt-4o");
}

#[test]
fn test_anthropic_provider() {
    let config = ProviderConfig {
        api_key: Some("test-key".to_string()),
        ..provider(ProviderType::Anthropic, "claude-3-haiku")
    };
    let client = ProviderFactory::create_client(&config).unwrap();
    assert_eq!(client.provider_name(), "anthropic");
    assert_eq!(client.model_name(), "claude-3-haiku");
}

#[test]
fn test_ollama_provider_needs_no_key() {
    let client = ProviderFactory::create_client(&provider(ProviderType::Ollama, "llama3")).unwrap();
    assert_eq!(client.provider_name(), "ollama");
    assert_eq!(client.model_name(), "llama3");
}

#[test]
fn test_local_provider_requires_endpoint() {
    let result = ProviderFactory::create_client(&provider(ProviderType::LocalCustom, "custom"));
    assert!(matches!(result, Err(ApiError::ProviderNotConfigured(_))));

    let config = ProviderConfig {
        endpoint: Some("http://localhost:8080/v1".to_string()),
        ..provider(ProviderType::LocalCustom, "custom")
    };
    let client = ProviderFactory::create_client(&config).unwrap();
    assert_eq!(client.provider_name(), "local");
}
