//! Configuration System
//!
//! Process-wide settings (backend provider and credentials, capability
//! injection policy, resolver templates, logging) loaded once at start-up
//! from layered sources and then passed by reference. Nothing mutates a
//! loaded configuration.

use crate::error::{ApiError, SchemaError};
use crate::logging::LoggingConfig;
use crate::pipeline::GenerationPipeline;
use crate::provider::{ModelProviderClient, ProviderFactory};
use crate::resolver::{GenerateResolver, TemplateSource};
use crate::schema::{
    CapabilityInjector, DuplicatePolicy, EligibilityPolicy, InjectedField, InjectorConfig,
};
use crate::template::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub use crate::provider::{ProviderConfig, ProviderType};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphgenConfig {
    /// Generation backend
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Capability injection and resolver settings
    #[serde(default)]
    pub capability: CapabilityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Capability injection and resolver binding settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityConfig {
    /// Field appended to eligible types
    #[serde(default)]
    pub field: InjectedField,

    #[serde(default)]
    pub eligibility: EligibilityPolicy,

    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    /// Types to bind the resolver to; empty binds every augmented type
    #[serde(default)]
    pub bind_types: Vec<String>,

    /// Fixed prompt template; when unset the template comes from `prompt_argument`
    #[serde(default)]
    pub template: Option<String>,

    #[serde(default = "default_prompt_argument")]
    pub prompt_argument: String,

    #[serde(default = "default_model_argument")]
    pub model_argument: String,

    /// Optional system message sent ahead of every prompt
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Per-call limit on backend latency, in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_prompt_argument() -> String {
    crate::resolver::PROMPT_ARGUMENT.to_string()
}

fn default_model_argument() -> String {
    crate::resolver::MODEL_ARGUMENT.to_string()
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            field: InjectedField::default(),
            eligibility: EligibilityPolicy::default(),
            duplicates: DuplicatePolicy::default(),
            bind_types: Vec::new(),
            template: None,
            prompt_argument: default_prompt_argument(),
            model_argument: default_model_argument(),
            system_prompt: None,
            timeout_secs: None,
        }
    }
}

impl CapabilityConfig {
    pub fn injector_config(&self) -> InjectorConfig {
        InjectorConfig {
            field: self.field.clone(),
            eligibility: self.eligibility.clone(),
            duplicates: self.duplicates,
        }
    }

    pub fn injector(&self) -> Result<CapabilityInjector, SchemaError> {
        CapabilityInjector::new(self.injector_config())
    }

    pub fn template_source(&self) -> Result<TemplateSource, ApiError> {
        Ok(match &self.template {
            Some(text) => TemplateSource::Fixed(PromptTemplate::parse(text)?),
            None => TemplateSource::Argument(self.prompt_argument.clone()),
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !is_graphql_name(&self.field.name) {
            return Err(format!("Invalid capability field name '{}'", self.field.name));
        }
        self.injector().map_err(|e| e.to_string())?;
        if let Some(template) = &self.template {
            PromptTemplate::parse(template).map_err(|e| e.to_string())?;
        }
        if self.prompt_argument.is_empty() || self.model_argument.is_empty() {
            return Err("Argument names cannot be empty".to_string());
        }
        if let EligibilityPolicy::ImplementsInterface(name) = &self.eligibility {
            if !is_graphql_name(name) {
                return Err(format!("Invalid interface name '{}'", name));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Provider(String),
    Capability(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
            ValidationError::Capability(msg) => write!(f, "Capability: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl GraphgenConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.provider.validate() {
            errors.push(ValidationError::Provider(e));
        }
        if let Err(e) = self.capability.validate() {
            errors.push(ValidationError::Capability(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all problems into one error
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }

    /// Copy safe to print
    pub fn redacted(&self) -> Self {
        Self {
            provider: self.provider.redacted(),
            ..self.clone()
        }
    }

    /// Build the shared resolver over the given backend client
    pub fn build_resolver(
        &self,
        client: Arc<dyn ModelProviderClient>,
    ) -> Result<GenerateResolver, ApiError> {
        let mut pipeline =
            GenerationPipeline::new(client).with_options(self.provider.default_options.clone());
        if let Some(system) = &self.capability.system_prompt {
            pipeline = pipeline.with_system_prompt(system.clone());
        }
        Ok(
            GenerateResolver::new(pipeline, self.capability.template_source()?)
                .with_model_argument(self.capability.model_argument.clone()),
        )
    }

    /// Build the shared resolver over the configured provider
    pub fn build_provider_resolver(&self) -> Result<GenerateResolver, ApiError> {
        let client: Arc<dyn ModelProviderClient> =
            Arc::from(ProviderFactory::create_client(&self.provider)?);
        self.build_resolver(client)
    }
}
