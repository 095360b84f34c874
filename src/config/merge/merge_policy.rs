//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key, so a file that only sets
/// `provider.api_key` keeps the default provider type and model.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("provider.provider_type", "openai")?
        .set_default("provider.model", "gpt-4o-mini")?
        .set_default("capability.field.name", crate::schema::CAPABILITY_FIELD)?
        .set_default("capability.prompt_argument", crate::resolver::PROMPT_ARGUMENT)?
        .set_default("capability.model_argument", crate::resolver::MODEL_ARGUMENT)
}
