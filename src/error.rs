//! Error types for schema augmentation and generation resolvers.

use thiserror::Error;

/// Schema-related errors
///
/// All of these are build-time failures: a schema that cannot be parsed or
/// traversed must stop the process before it starts serving.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Schema syntax error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Malformed schema tree at {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Cannot append field to {kind} node at {path}: node has no field sequence")]
    StructuralMutation { kind: String, path: String },

    #[error("Schema JSON error: {0}")]
    Json(String),
}

/// Prompt template errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Invalid prompt template at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Missing value for template placeholder '{name}'")]
    MissingPlaceholder { name: String },
}

/// Resolution and runtime errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Templating failed: {0}")]
    Templating(#[from] TemplateError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("No '{operation}' resolver bound for type '{type_name}'")]
    UnknownBinding {
        type_name: String,
        operation: String,
    },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Generation cancelled after {0:?}")]
    Cancelled(std::time::Duration),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// True for failures raised by the generation backend rather than by this crate.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            ApiError::ProviderError(_)
                | ApiError::ProviderNotConfigured(_)
                | ApiError::ProviderRequestFailed(_)
                | ApiError::ProviderAuthFailed(_)
                | ApiError::ProviderRateLimit(_)
                | ApiError::ProviderModelNotFound(_)
        )
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
