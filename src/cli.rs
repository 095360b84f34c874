//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, parse_json_object};
pub use parse::{Cli, Commands, ConfigCommands};
pub use presentation::{
    format_context_json, format_generated_json, format_injection_report_json,
    format_injection_report_text, format_validation_result,
};
pub use route::RunContext;
