//! Integration tests for the graphgen binary

use super::test_utils::MOVIE_SCHEMA;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn graphgen(workspace: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_graphgen"))
        .arg("--workspace")
        .arg(workspace)
        .arg("--log-level")
        .arg("off")
        .args(args)
        .env_remove("GRAPHGEN_LOG")
        .env_remove("GRAPHGEN_ENV")
        .output()
        .expect("failed to run graphgen binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn workspace_with_schema() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("schema.graphql"), MOVIE_SCHEMA).unwrap();
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    std::fs::write(
        dir.path().join("config").join("config.toml"),
        r#"
[provider]
provider_type = "ollama"
model = "llama3"

[capability]
bind_types = ["Movie"]
"#,
    )
    .unwrap();
    dir
}

#[test]
fn test_inject_command_prints_augmented_sdl() {
    let dir = workspace_with_schema();
    let output = graphgen(dir.path(), &["inject", "schema.graphql"]);
    assert!(output.status.success());
    let sdl = stdout(&output);
    assert!(sdl.contains("type Movie {\n  title: String!\n  plot: String\n  Generate\n}"));
    assert!(sdl.contains("enum Genre {\n  DRAMA\n  COMEDY\n}"));
}

#[test]
fn test_inject_report_as_json() {
    let dir = workspace_with_schema();
    let output = graphgen(dir.path(), &["inject", "schema.graphql", "--report", "--json"]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["augmented"], serde_json::json!(["Movie", "Actor", "Named"]));
}

#[test]
fn test_context_command() {
    let dir = workspace_with_schema();
    let output = graphgen(
        dir.path(),
        &[
            "context",
            "--source",
            r#"{"title": "Inception", "plot": "A thief enters dreams"}"#,
            "--args",
            r#"{"stars": 5}"#,
        ],
    );
    assert!(output.status.success());
    let context: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        context,
        serde_json::json!({
            "title": "Inception",
            "plot": "A thief enters dreams",
            "stars": "5"
        })
    );
}

#[test]
fn test_generate_for_unbound_type_fails() {
    let dir = workspace_with_schema();
    let output = graphgen(
        dir.path(),
        &["generate", "--type", "Actor", "--args", r#"{"prompt": "Hi"}"#],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No 'generate' resolver bound for type 'Actor'"));
}

#[test]
fn test_missing_schema_file_fails() {
    let dir = workspace_with_schema();
    let output = graphgen(dir.path(), &["inject", "missing.graphql"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_show_reflects_workspace_file() {
    let dir = workspace_with_schema();
    let output = graphgen(dir.path(), &["config", "show"]);
    assert!(output.status.success());
    let shown = stdout(&output);
    assert!(shown.contains("provider_type = \"ollama\""));
    assert!(shown.contains("bind_types"));
    assert!(shown.contains("\"Movie\""));
}
