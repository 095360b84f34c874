//! Integration tests for capability field injection over full schemas

use super::test_utils::MOVIE_SCHEMA;
use graphgen::schema::{
    load_schema, parse_schema, print_schema, schema_to_json, visit, CapabilityInjector, Document,
    DuplicatePolicy, EligibilityPolicy, InjectedField, InjectorConfig, NodeKind, SchemaNode,
    VisitContext, CAPABILITY_FIELD,
};

fn injector(config: InjectorConfig) -> CapabilityInjector {
    CapabilityInjector::new(config).unwrap()
}

fn field_count(doc: &Document, name: &str) -> usize {
    doc.find_type(name).unwrap().field_definitions().count()
}

#[test]
fn test_every_field_bearing_type_gains_exactly_one_field() {
    let before = parse_schema(MOVIE_SCHEMA).unwrap();
    let after = injector(InjectorConfig::default())
        .inject_document(before.clone())
        .unwrap();

    for name in ["Movie", "Actor", "Named"] {
        assert_eq!(field_count(&after, name), field_count(&before, name) + 1);
        let last = after.find_type(name).unwrap().field_definitions().last().unwrap();
        assert_eq!(last.name, CAPABILITY_FIELD);
        assert!(last.ty.is_none());
    }

    let untouched = |node: &&SchemaNode| {
        !matches!(node.kind(), NodeKind::Object | NodeKind::Interface)
    };
    let before_other: Vec<_> = before.definitions.iter().filter(untouched).collect();
    let after_other: Vec<_> = after.definitions.iter().filter(untouched).collect();
    assert_eq!(before_other, after_other);
}

#[test]
fn test_injected_schema_prints_and_reparses() {
    let doc = injector(InjectorConfig::default())
        .inject_document(parse_schema(MOVIE_SCHEMA).unwrap())
        .unwrap();
    let sdl = print_schema(&doc);
    assert!(sdl.contains("type Movie {\n  title: String!\n  plot: String\n  Generate\n}"));
    assert!(sdl.contains("scalar Date"));
    assert_eq!(parse_schema(&sdl).unwrap(), doc);
}

#[test]
fn test_json_schema_input_matches_sdl() {
    let doc = parse_schema(MOVIE_SCHEMA).unwrap();
    let from_json = load_schema(&schema_to_json(&doc).unwrap()).unwrap();
    let injector = injector(InjectorConfig::default());
    assert_eq!(
        injector.inject_document(from_json).unwrap(),
        injector.inject_document(doc).unwrap()
    );
}

#[test]
fn test_second_pass_appends_again_by_default() {
    let injector = injector(InjectorConfig::default());
    let once = injector
        .inject_document(parse_schema(MOVIE_SCHEMA).unwrap())
        .unwrap();
    let twice = injector.inject_document(once.clone()).unwrap();
    assert_eq!(field_count(&twice, "Movie"), field_count(&once, "Movie") + 1);
}

#[test]
fn test_skip_existing_makes_injection_idempotent() {
    let injector = injector(InjectorConfig {
        duplicates: DuplicatePolicy::SkipExisting,
        ..InjectorConfig::default()
    });
    let once = injector
        .inject_document(parse_schema(MOVIE_SCHEMA).unwrap())
        .unwrap();
    let (twice, report) = injector.inject_with_report(once.clone().into_node()).unwrap();
    assert_eq!(twice, once.into_node());
    assert!(report.augmented.is_empty());
    assert_eq!(report.already_present, vec!["Movie", "Actor", "Named"]);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_interface_policy_and_typed_field() {
    let schema = r#"
        interface CanGenerate { id: ID! }
        type Movie implements CanGenerate { id: ID! title: String }
        type Studio { name: String }
    "#;
    let injector = injector(InjectorConfig {
        field: InjectedField {
            name: "generate".to_string(),
            arguments: vec![("prompt".to_string(), "String!".to_string())],
            return_type: Some("GeneratedResponse!".to_string()),
        },
        eligibility: EligibilityPolicy::ImplementsInterface("CanGenerate".to_string()),
        duplicates: DuplicatePolicy::Append,
    });
    let (root, report) = injector
        .inject_with_report(parse_schema(schema).unwrap().into_node())
        .unwrap();
    assert_eq!(report.augmented, vec!["CanGenerate", "Movie"]);
    assert_eq!(report.skipped, vec!["Studio"]);

    let SchemaNode::Document(doc) = root else {
        panic!("root must stay a document");
    };
    assert!(print_schema(&doc).contains("generate(prompt: String!): GeneratedResponse!"));
    assert_eq!(field_count(&doc, "Studio"), 1);
}

#[test]
fn test_visitor_sees_injected_fields_once() {
    let doc = injector(InjectorConfig::default())
        .inject_document(parse_schema("type A { x: Int }\ntype B { y: Int }").unwrap())
        .unwrap();

    let mut seen = Vec::new();
    let mut record = |node: &mut SchemaNode, ctx: &VisitContext<'_>| {
        if node.kind() == NodeKind::Field {
            let parent = ctx.parent().and_then(|p| p.name.clone()).unwrap_or_default();
            seen.push(format!("{}.{}@{}", parent, node.name().unwrap_or(""), ctx.path_string()));
        }
    };
    visit(doc.into_node(), &mut record).unwrap();
    assert_eq!(
        seen,
        vec![
            "A.x@$.0.0",
            "A.Generate@$.0.1",
            "B.y@$.1.0",
            "B.Generate@$.1.1",
        ]
    );
}

#[test]
fn test_non_document_root_is_rejected() {
    let field = SchemaNode::Scalar(graphgen::schema::ScalarDefinition {
        name: "Date".to_string(),
        description: None,
        directives: Vec::new(),
        extension: false,
    });
    assert!(injector(InjectorConfig::default()).inject(field).is_err());
}
