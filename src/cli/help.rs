//! CLI help and command-name contract for logging spans.

use crate::cli::parse::{Commands, ConfigCommands};

/// Command name string for log spans (e.g. "inject", "config.show").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Inject { .. } => "inject".to_string(),
        Commands::Context { .. } => "context".to_string(),
        Commands::Generate { .. } => "generate".to_string(),
        Commands::Config { command } => format!("config.{}", config_command_name(command)),
    }
}

pub fn config_command_name(command: &ConfigCommands) -> &'static str {
    match command {
        ConfigCommands::Show => "show",
        ConfigCommands::Validate => "validate",
        ConfigCommands::Path => "path",
    }
}
