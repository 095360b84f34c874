//! Integration tests for Configuration System

use super::test_utils::ScriptedProvider;
use graphgen::config::{ConfigLoader, GraphgenConfig, ProviderType};
use graphgen::resolver::ResolverMap;
use graphgen::schema::{parse_schema, EligibilityPolicy};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tempfile::TempDir;

fn write_workspace_config(dir: &TempDir, name: &str, contents: &str) {
    let config_dir = dir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join(name), contents).unwrap();
}

#[test]
fn test_workspace_config_layers_over_defaults() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        &temp_dir,
        "config.toml",
        r#"
[provider]
provider_type = "ollama"
model = "llama3"
endpoint = "http://localhost:11434/v1"

[capability]
system_prompt = "Answer in one sentence."
timeout_secs = 30

[logging]
level = "debug"
"#,
    );
    write_workspace_config(
        &temp_dir,
        "development.toml",
        r#"
[provider]
model = "llama3:8b"
"#,
    );

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.provider.provider_type, ProviderType::Ollama);
    assert_eq!(config.provider.model, "llama3:8b");
    assert_eq!(config.capability.field.name, "Generate");
    assert_eq!(config.capability.prompt_argument, "prompt");
    assert_eq!(config.capability.timeout_secs, Some(30));
    assert_eq!(config.logging.level, "debug");
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_workspace_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.provider.model, "gpt-4o-mini");
    assert_eq!(config.capability.eligibility, EligibilityPolicy::AllFieldBearing);
}

#[test]
fn test_invalid_file_values_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("graphgen.toml");
    std::fs::write(
        &config_file,
        r#"
[provider]
provider_type = "local"
model = "tiny"

[capability]
template = "{unclosed"

[logging]
format = "yaml"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(messages.iter().any(|m| m.starts_with("Capability:")));
    assert!(messages.iter().any(|m| m.starts_with("Logging:")));
}

#[tokio::test]
async fn test_config_builds_resolver_with_fixed_template() {
    let mut config = GraphgenConfig::default();
    config.capability.template = Some("Pitch {title} in {words} words".to_string());
    config.capability.system_prompt = Some("You write loglines.".to_string());

    let provider = ScriptedProvider::new(|messages, _| {
        let system = &messages[0].content;
        let user = &messages[1].content;
        Ok(format!("{} | {}", system, user))
    })
    .shared();
    let resolver = Arc::new(config.build_resolver(provider).unwrap());

    let injector = config.capability.injector().unwrap();
    let (_, report) = injector
        .inject_with_report(parse_schema("type Movie { title: String }").unwrap().into_node())
        .unwrap();
    let map = ResolverMap::from_report(&report, resolver);

    let source = match json!({ "title": "Inception" }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    let mut args = Map::new();
    args.insert("words".to_string(), json!(12));
    let response = map.dispatch("Movie", "generate", &source, &args).await.unwrap();
    assert_eq!(response.text, "You write loglines. | Pitch Inception in 12 words");
}
