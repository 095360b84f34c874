//! Schema Graph
//!
//! In-memory model of a GraphQL type-system document, its SDL reader and
//! writer, a generic pre-order visitor, and the capability field injector
//! built on top of it.

pub mod inject;
pub mod node;
pub mod parser;
pub mod printer;
pub mod visitor;

pub use inject::{
    CapabilityInjector, DuplicatePolicy, EligibilityPolicy, InjectedField, InjectionReport,
    InjectorConfig, CAPABILITY_FIELD,
};
pub use node::{
    ConstValue, Directive, Document, FieldDefinition, InputValue, NodeKind, OtherDefinition,
    ScalarDefinition, SchemaNode, TypeDefinition, TypeRef,
};
pub use parser::parse_schema;
pub use printer::print_schema;
pub use visitor::{visit, Key, NodeSummary, VisitContext, Visitor};

use crate::error::SchemaError;

/// Read a schema from SDL or, when the text starts with `{`, from its JSON encoding
pub fn load_schema(source: &str) -> Result<Document, SchemaError> {
    if source.trim_start().starts_with('{') {
        match serde_json::from_str::<SchemaNode>(source) {
            Ok(SchemaNode::Document(doc)) => Ok(doc),
            Ok(other) => Err(SchemaError::Malformed {
                path: "$".to_string(),
                reason: format!("root must be a Document, found {}", other.kind()),
            }),
            Err(e) => Err(SchemaError::Json(e.to_string())),
        }
    } else {
        parse_schema(source)
    }
}

/// JSON encoding of a document, readable by [`load_schema`]
pub fn schema_to_json(document: &Document) -> Result<String, SchemaError> {
    serde_json::to_string_pretty(&SchemaNode::Document(document.clone()))
        .map_err(|e| SchemaError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_and_sdl_load_to_same_document() {
        let doc = parse_schema("type Movie { title: String! Generate }").unwrap();
        let json = schema_to_json(&doc).unwrap();
        assert_eq!(load_schema(&json).unwrap(), doc);
    }

    #[test]
    fn test_json_root_must_be_document() {
        let err = load_schema(r#"{"kind": "Field", "name": "Generate"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }
}
