//! Integration tests for template context assembly and prompt filling

use graphgen::error::TemplateError;
use graphgen::template::{assemble, CallArguments, PromptTemplate, SourceEntity};
use serde_json::{json, Value};

fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

#[test]
fn test_scalar_fields_and_arguments_flatten_to_text() {
    let source: SourceEntity = object(json!({
        "title": "Inception",
        "plot": "A thief enters dreams"
    }));
    let args: CallArguments = object(json!({ "stars": 5 }));

    let context = assemble(&source, &args);
    let expected = [
        ("plot", "A thief enters dreams"),
        ("stars", "5"),
        ("title", "Inception"),
    ];
    assert_eq!(context.iter().collect::<Vec<_>>(), expected);
}

#[test]
fn test_composite_values_are_encoded_and_prompt_kept_verbatim() {
    let source = object(json!({ "name": "Actor X", "awards": ["Oscar", "Globe"] }));
    let args = object(json!({ "prompt": "Describe {name} who won {awards}" }));

    let context = assemble(&source, &args);
    assert_eq!(context.get("awards"), Some(r#"["Oscar","Globe"]"#));
    assert_eq!(context.get("prompt"), Some("Describe {name} who won {awards}"));

    let template = PromptTemplate::parse(context.get("prompt").unwrap()).unwrap();
    assert_eq!(
        template.fill(&context).unwrap(),
        r#"Describe Actor X who won ["Oscar","Globe"]"#
    );
}

#[test]
fn test_arguments_override_source_fields() {
    let source = object(json!({ "title": "Inception", "year": 2010 }));
    let args = object(json!({ "title": "Tenet", "nested": { "a": null } }));

    let context = assemble(&source, &args);
    assert_eq!(context.get("title"), Some("Tenet"));
    assert_eq!(context.get("year"), Some("2010"));
    assert_eq!(context.get("nested"), Some(r#"{"a":null}"#));
    assert_eq!(context.len(), 3);
}

#[test]
fn test_missing_placeholder_is_reported_by_name() {
    let context = assemble(&object(json!({ "title": "Inception" })), &CallArguments::new());
    let template = PromptTemplate::parse("Who directed {title}? Ask {director}.").unwrap();

    assert_eq!(template.missing(&context), vec!["director"]);
    match template.fill(&context) {
        Err(TemplateError::MissingPlaceholder { name }) => assert_eq!(name, "director"),
        other => panic!("expected missing placeholder, got {:?}", other),
    }
}

#[test]
fn test_escaped_braces_survive_filling() {
    let context = assemble(&object(json!({ "title": "Inception" })), &CallArguments::new());
    let template = PromptTemplate::parse("Reply as JSON {{\"title\": \"{title}\"}}").unwrap();
    assert_eq!(
        template.fill(&context).unwrap(),
        "Reply as JSON {\"title\": \"Inception\"}"
    );
}
