//! CLI presentation: text and json formatters per command.

use crate::config::ValidationError;
use crate::error::ApiError;
use crate::resolver::GeneratedResponse;
use crate::schema::InjectionReport;
use crate::template::TemplateContext;
use serde_json::json;

fn to_pretty_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize output: {}", e)))
}

pub fn format_injection_report_text(report: &InjectionReport) -> String {
    let mut output = format!("Augmented {} type(s)", report.augmented.len());
    for name in &report.augmented {
        output.push_str(&format!("\n  + {}", name));
    }
    if !report.already_present.is_empty() {
        output.push_str(&format!(
            "\nAlready present on {} type(s)",
            report.already_present.len()
        ));
        for name in &report.already_present {
            output.push_str(&format!("\n  = {}", name));
        }
    }
    if !report.skipped.is_empty() {
        output.push_str(&format!("\nSkipped {} type(s)", report.skipped.len()));
        for name in &report.skipped {
            output.push_str(&format!("\n  - {}", name));
        }
    }
    output
}

pub fn format_injection_report_json(report: &InjectionReport) -> Result<String, ApiError> {
    to_pretty_json(&json!({
        "augmented": report.augmented,
        "already_present": report.already_present,
        "skipped": report.skipped,
    }))
}

pub fn format_context_json(context: &TemplateContext) -> Result<String, ApiError> {
    serde_json::to_string_pretty(context)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize output: {}", e)))
}

pub fn format_generated_json(response: &GeneratedResponse) -> Result<String, ApiError> {
    to_pretty_json(&json!({ "text": response.text }))
}

pub fn format_validation_result(result: &Result<(), Vec<ValidationError>>) -> String {
    match result {
        Ok(()) => "Configuration is valid".to_string(),
        Err(errors) => {
            let mut output = format!("Configuration has {} problem(s):", errors.len());
            for error in errors {
                output.push_str(&format!("\n  {}", error));
            }
            output
        }
    }
}
