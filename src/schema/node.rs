//! Schema node types
//!
//! A parsed schema is a tree rooted at [`SchemaNode::Document`]. Type
//! definitions that can carry fields hold them as an ordered sequence of
//! [`SchemaNode::Field`] children; everything else is a leaf as far as
//! traversal is concerned.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node of the schema graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SchemaNode {
    Document(Document),
    Object(TypeDefinition),
    Interface(TypeDefinition),
    Scalar(ScalarDefinition),
    Field(FieldDefinition),
    Other(OtherDefinition),
}

/// Discriminant of a [`SchemaNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Document,
    Object,
    Interface,
    Scalar,
    Field,
    Other,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Document => "Document",
            NodeKind::Object => "Object",
            NodeKind::Interface => "Interface",
            NodeKind::Scalar => "Scalar",
            NodeKind::Field => "Field",
            NodeKind::Other => "Other",
        };
        f.write_str(name)
    }
}

impl SchemaNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            SchemaNode::Document(_) => NodeKind::Document,
            SchemaNode::Object(_) => NodeKind::Object,
            SchemaNode::Interface(_) => NodeKind::Interface,
            SchemaNode::Scalar(_) => NodeKind::Scalar,
            SchemaNode::Field(_) => NodeKind::Field,
            SchemaNode::Other(_) => NodeKind::Other,
        }
    }

    /// Declared name, if the node has one (schema definitions and documents do not)
    pub fn name(&self) -> Option<&str> {
        match self {
            SchemaNode::Document(_) => None,
            SchemaNode::Object(def) | SchemaNode::Interface(def) => Some(&def.name),
            SchemaNode::Scalar(def) => Some(&def.name),
            SchemaNode::Field(field) => Some(&field.name),
            SchemaNode::Other(other) => other.name(),
        }
    }

    /// The node's field sequence, if it structurally carries one
    pub fn fields(&self) -> Option<&Vec<SchemaNode>> {
        match self {
            SchemaNode::Object(def) | SchemaNode::Interface(def) => def.fields.as_ref(),
            _ => None,
        }
    }

    pub fn fields_mut(&mut self) -> Option<&mut Vec<SchemaNode>> {
        match self {
            SchemaNode::Object(def) | SchemaNode::Interface(def) => def.fields.as_mut(),
            _ => None,
        }
    }

    /// Children in traversal order
    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<SchemaNode>> {
        match self {
            SchemaNode::Document(doc) => Some(&mut doc.definitions),
            other => other.fields_mut(),
        }
    }

    pub fn as_type_definition(&self) -> Option<&TypeDefinition> {
        match self {
            SchemaNode::Object(def) | SchemaNode::Interface(def) => Some(def),
            _ => None,
        }
    }
}

/// Root of a schema tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub definitions: Vec<SchemaNode>,
}

impl Document {
    pub fn new(definitions: Vec<SchemaNode>) -> Self {
        Self { definitions }
    }

    /// First object or interface definition with the given name
    pub fn find_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions
            .iter()
            .filter_map(SchemaNode::as_type_definition)
            .find(|def| def.name == name)
    }

    pub fn into_node(self) -> SchemaNode {
        SchemaNode::Document(self)
    }
}

/// Object or interface type definition (or extension)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub directives: Vec<Directive>,
    /// `None` when the definition has no field block at all
    #[serde(default)]
    pub fields: Option<Vec<SchemaNode>>,
    #[serde(default)]
    pub extension: bool,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            interfaces: Vec::new(),
            directives: Vec::new(),
            fields: Some(Vec::new()),
            extension: false,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = Some(fields.into_iter().map(SchemaNode::Field).collect());
        self
    }

    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|name| name == interface)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_definitions().any(|field| field.name == name)
    }

    pub fn field_definitions(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().flatten().filter_map(|node| match node {
            SchemaNode::Field(field) => Some(field),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub directives: Vec<Directive>,
    #[serde(default)]
    pub extension: bool,
}

/// Field of an object or interface type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<InputValue>,
    /// Declared return type; absent for the minimal injected capability field
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            ty: Some(ty),
            directives: Vec::new(),
        }
    }

    /// Field with a name and nothing else
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            ty: None,
            directives: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: InputValue) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Argument or input object field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ConstValue>,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl InputValue {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            default_value: None,
            directives: Vec::new(),
        }
    }
}

/// Type reference in SDL notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of")]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn non_null(self) -> Self {
        TypeRef::NonNull(Box::new(self))
    }

    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Innermost named type
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<(String, ConstValue)>,
}

/// Constant value appearing in directive arguments and defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ConstValue {
    Null,
    Boolean(bool),
    Int(i64),
    /// Kept as written so printing does not reformat the literal
    Float(String),
    String(String),
    Enum(String),
    List(Vec<ConstValue>),
    Object(Vec<(String, ConstValue)>),
}

/// Definitions that never carry a field sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "definition")]
pub enum OtherDefinition {
    Enum {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default)]
        directives: Vec<Directive>,
        values: Vec<EnumValue>,
        #[serde(default)]
        extension: bool,
    },
    Union {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default)]
        directives: Vec<Directive>,
        members: Vec<String>,
        #[serde(default)]
        extension: bool,
    },
    InputObject {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default)]
        directives: Vec<Directive>,
        fields: Vec<InputValue>,
        #[serde(default)]
        extension: bool,
    },
    Directive {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default)]
        arguments: Vec<InputValue>,
        #[serde(default)]
        repeatable: bool,
        locations: Vec<String>,
    },
    Schema {
        #[serde(default)]
        directives: Vec<Directive>,
        operations: Vec<(String, String)>,
        #[serde(default)]
        extension: bool,
    },
}

impl OtherDefinition {
    pub fn name(&self) -> Option<&str> {
        match self {
            OtherDefinition::Enum { name, .. }
            | OtherDefinition::Union { name, .. }
            | OtherDefinition::InputObject { name, .. }
            | OtherDefinition::Directive { name, .. } => Some(name),
            OtherDefinition::Schema { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub directives: Vec<Directive>,
}
