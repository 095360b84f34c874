//! CLI parse: clap types for graphgen. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// graphgen CLI - schema capability injection and generation resolvers
#[derive(Parser)]
#[command(name = "graphgen")]
#[command(about = "Inject a generation capability into GraphQL schemas and resolve it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append the capability field to every eligible type of a schema
    Inject {
        /// Schema file (SDL, or the JSON document encoding)
        schema: PathBuf,
        /// Print the augmented document as JSON instead of SDL
        #[arg(long)]
        json: bool,
        /// Only augment this interface and the types implementing it
        #[arg(long)]
        interface: Option<String>,
        /// Leave types that already declare the field unchanged
        #[arg(long)]
        skip_existing: bool,
        /// Print which types were augmented instead of the schema
        #[arg(long)]
        report: bool,
    },
    /// Show the template context assembled for one call
    Context {
        /// Source entity as a JSON object
        #[arg(long, default_value = "{}")]
        source: String,
        /// Call arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Invoke the generate resolver bound to a type
    Generate {
        /// Type whose capability is invoked
        #[arg(long = "type")]
        type_name: String,
        /// Source entity as a JSON object
        #[arg(long, default_value = "{}")]
        source: String,
        /// Call arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
        /// Bind only the types this schema's injection pass augments
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Cancel the call after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration with secrets redacted
    Show,
    /// Validate the effective configuration
    Validate,
    /// Print the global configuration file path
    Path,
}
