//! Integration tests for graphgen

mod cli_commands;
mod config_integration;
mod context_assembly;
mod generate_resolver;
mod model_providers;
mod schema_injection;
mod test_utils;
