//! SDL writer
//!
//! Renders a schema document back to SDL with two-space indentation and a
//! blank line between definitions. A field without a declared type is
//! printed as its bare name.

use crate::schema::node::{
    ConstValue, Directive, Document, FieldDefinition, InputValue, OtherDefinition, SchemaNode,
    TypeDefinition,
};
use std::fmt::Write;

pub fn print_schema(document: &Document) -> String {
    document
        .definitions
        .iter()
        .map(print_definition)
        .collect::<Vec<_>>()
        .join("\n\n")
        + "\n"
}

fn print_definition(node: &SchemaNode) -> String {
    let mut out = String::new();
    match node {
        SchemaNode::Document(doc) => return print_schema(doc),
        SchemaNode::Object(def) => print_type("type", def, &mut out),
        SchemaNode::Interface(def) => print_type("interface", def, &mut out),
        SchemaNode::Scalar(def) => {
            description(&def.description, "", &mut out);
            extend(def.extension, &mut out);
            let _ = write!(out, "scalar {}{}", def.name, directives(&def.directives));
        }
        SchemaNode::Field(field) => print_field(field, "", &mut out),
        SchemaNode::Other(other) => print_other(other, &mut out),
    }
    out
}

fn print_type(keyword: &str, def: &TypeDefinition, out: &mut String) {
    description(&def.description, "", out);
    extend(def.extension, out);
    let _ = write!(out, "{} {}", keyword, def.name);
    if !def.interfaces.is_empty() {
        let _ = write!(out, " implements {}", def.interfaces.join(" & "));
    }
    out.push_str(&directives(&def.directives));
    if let Some(fields) = &def.fields {
        out.push_str(" {\n");
        for field in fields {
            if let SchemaNode::Field(field) = field {
                print_field(field, "  ", out);
                out.push('\n');
            }
        }
        out.push('}');
    }
}

fn print_field(field: &FieldDefinition, indent: &str, out: &mut String) {
    description(&field.description, indent, out);
    let _ = write!(out, "{}{}{}", indent, field.name, arguments(&field.arguments));
    if let Some(ty) = &field.ty {
        let _ = write!(out, ": {}", ty);
    }
    out.push_str(&directives(&field.directives));
}

fn print_other(other: &OtherDefinition, out: &mut String) {
    match other {
        OtherDefinition::Enum {
            name,
            description: desc,
            directives: dirs,
            values,
            extension,
        } => {
            description(desc, "", out);
            extend(*extension, out);
            let _ = write!(out, "enum {}{}", name, directives(dirs));
            if !values.is_empty() {
                out.push_str(" {\n");
                for value in values {
                    description(&value.description, "  ", out);
                    let _ = writeln!(out, "  {}{}", value.name, directives(&value.directives));
                }
                out.push('}');
            }
        }
        OtherDefinition::Union {
            name,
            description: desc,
            directives: dirs,
            members,
            extension,
        } => {
            description(desc, "", out);
            extend(*extension, out);
            let _ = write!(out, "union {}{}", name, directives(dirs));
            if !members.is_empty() {
                let _ = write!(out, " = {}", members.join(" | "));
            }
        }
        OtherDefinition::InputObject {
            name,
            description: desc,
            directives: dirs,
            fields,
            extension,
        } => {
            description(desc, "", out);
            extend(*extension, out);
            let _ = write!(out, "input {}{}", name, directives(dirs));
            if !fields.is_empty() {
                out.push_str(" {\n");
                for field in fields {
                    description(&field.description, "  ", out);
                    let _ = writeln!(out, "  {}", input_value(field));
                }
                out.push('}');
            }
        }
        OtherDefinition::Directive {
            name,
            description: desc,
            arguments: args,
            repeatable,
            locations,
        } => {
            description(desc, "", out);
            let _ = write!(out, "directive @{}{}", name, arguments(args));
            if *repeatable {
                out.push_str(" repeatable");
            }
            let _ = write!(out, " on {}", locations.join(" | "));
        }
        OtherDefinition::Schema {
            directives: dirs,
            operations,
            extension,
        } => {
            extend(*extension, out);
            let _ = write!(out, "schema{}", directives(dirs));
            if !operations.is_empty() {
                out.push_str(" {\n");
                for (operation, ty) in operations {
                    let _ = writeln!(out, "  {}: {}", operation, ty);
                }
                out.push('}');
            }
        }
    }
}

fn extend(extension: bool, out: &mut String) {
    if extension {
        out.push_str("extend ");
    }
}

fn description(text: &Option<String>, indent: &str, out: &mut String) {
    if let Some(text) = text {
        if text.contains('\n') || text.contains('"') {
            let _ = writeln!(out, "{}\"\"\"", indent);
            for line in text.replace("\"\"\"", "\\\"\"\"").lines() {
                let _ = writeln!(out, "{}{}", indent, line);
            }
            let _ = writeln!(out, "{}\"\"\"", indent);
        } else {
            let _ = writeln!(out, "{}{}", indent, quote(text));
        }
    }
}

fn arguments(args: &[InputValue]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = args.iter().map(input_value).collect();
    format!("({})", rendered.join(", "))
}

fn input_value(value: &InputValue) -> String {
    let mut out = format!("{}: {}", value.name, value.ty);
    if let Some(default) = &value.default_value {
        let _ = write!(out, " = {}", const_value(default));
    }
    out.push_str(&directives(&value.directives));
    out
}

fn directives(directives: &[Directive]) -> String {
    let mut out = String::new();
    for directive in directives {
        let _ = write!(out, " @{}", directive.name);
        if !directive.arguments.is_empty() {
            let args: Vec<String> = directive
                .arguments
                .iter()
                .map(|(name, value)| format!("{}: {}", name, const_value(value)))
                .collect();
            let _ = write!(out, "({})", args.join(", "));
        }
    }
    out
}

fn const_value(value: &ConstValue) -> String {
    match value {
        ConstValue::Null => "null".to_string(),
        ConstValue::Boolean(b) => b.to_string(),
        ConstValue::Int(i) => i.to_string(),
        ConstValue::Float(text) => text.clone(),
        ConstValue::String(s) => quote(s),
        ConstValue::Enum(name) => name.clone(),
        ConstValue::List(items) => {
            let items: Vec<String> = items.iter().map(const_value).collect();
            format!("[{}]", items.join(", "))
        }
        ConstValue::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}: {}", key, const_value(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parser::parse_schema;

    #[test]
    fn test_prints_object_type() {
        let doc = parse_schema(
            r#"type Actor implements CanGenerate & Named @node {
              name: String!
              actedInMovies(limit: Int = 10): [Movie!]! @relationship(type: "ACTED_IN", direction: OUT)
            }"#,
        )
        .unwrap();
        assert_eq!(
            print_schema(&doc),
            "type Actor implements CanGenerate & Named @node {\n  name: String!\n  actedInMovies(limit: Int = 10): [Movie!]! @relationship(type: \"ACTED_IN\", direction: OUT)\n}\n"
        );
    }

    #[test]
    fn test_bare_field_prints_name_only() {
        let doc = parse_schema("type Movie { title: String! Generate }").unwrap();
        assert_eq!(
            print_schema(&doc),
            "type Movie {\n  title: String!\n  Generate\n}\n"
        );
    }

    #[test]
    fn test_printed_schema_reparses_identically() {
        let source = r#"
            "Release date"
            scalar Date
            enum Genre { DRAMA COMEDY }
            union Credit = Movie | Actor
            input MovieFilter { title: String = "a \"quoted\" title" }
            directive @customResolver(requires: [String!]) on FIELD_DEFINITION
            schema { query: Query }
            """
            Multi-line
            description
            """
            interface CanGenerate { generate(prompt: String!, model: String): GeneratedResponse! }
            extend type Movie @key(fields: {title: true})
        "#;
        let doc = parse_schema(source).unwrap();
        let reparsed = parse_schema(&print_schema(&doc)).unwrap();
        assert_eq!(doc, reparsed);
    }
}
