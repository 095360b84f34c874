//! Capability field injection
//!
//! Appends the capability field (by default a bare `Generate`) to every
//! eligible type in a schema. Eligibility is an explicit predicate over the
//! node kind: object and interface definitions that declare a field sequence.
//! Everything else is left structurally untouched.

use crate::error::SchemaError;
use crate::schema::node::{Document, FieldDefinition, InputValue, SchemaNode, TypeRef};
use crate::schema::visitor::{visit, VisitContext, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, trace};

/// Reserved name of the capability field
pub const CAPABILITY_FIELD: &str = "Generate";

/// Which nodes receive the capability field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "interface")]
pub enum EligibilityPolicy {
    /// Every object or interface definition with a field sequence
    #[default]
    AllFieldBearing,
    /// Only the named interface and object types that implement it
    ImplementsInterface(String),
}

/// What to do with a type that already declares a field of the capability name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Append regardless; injection is expected to run once per schema
    #[default]
    Append,
    /// Leave the type unchanged, making repeated runs idempotent
    SkipExisting,
}

/// Shape of the field appended to eligible types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectedField {
    #[serde(default = "default_field_name")]
    pub name: String,
    /// Arguments as `(name, SDL type)` pairs, e.g. `("prompt", "String!")`
    #[serde(default)]
    pub arguments: Vec<(String, String)>,
    /// Return type in SDL notation, e.g. `GeneratedResponse!`
    #[serde(default)]
    pub return_type: Option<String>,
}

fn default_field_name() -> String {
    CAPABILITY_FIELD.to_string()
}

impl Default for InjectedField {
    fn default() -> Self {
        Self {
            name: default_field_name(),
            arguments: Vec::new(),
            return_type: None,
        }
    }
}

impl InjectedField {
    /// Build the field literal appended to each eligible type
    pub fn to_definition(&self) -> Result<FieldDefinition, SchemaError> {
        let mut field = FieldDefinition::bare(self.name.clone());
        for (name, ty) in &self.arguments {
            field
                .arguments
                .push(InputValue::new(name.clone(), parse_type_ref(ty)?));
        }
        field.ty = self.return_type.as_deref().map(parse_type_ref).transpose()?;
        Ok(field)
    }
}

/// Parse a type reference such as `[Movie!]!`
pub fn parse_type_ref(text: &str) -> Result<TypeRef, SchemaError> {
    let text = text.trim();
    let invalid = || SchemaError::Parse {
        line: 1,
        column: 1,
        message: format!("invalid type reference '{}'", text),
    };

    if let Some(inner) = text.strip_suffix('!') {
        return Ok(parse_type_ref(inner)?.non_null());
    }
    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return Ok(parse_type_ref(inner)?.list());
    }
    let valid_name = !text.is_empty()
        && !text.starts_with(|c: char| c.is_ascii_digit())
        && text.chars().all(|c| c == '_' || c.is_ascii_alphanumeric());
    if valid_name {
        Ok(TypeRef::named(text))
    } else {
        Err(invalid())
    }
}

/// Injector configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectorConfig {
    #[serde(default)]
    pub field: InjectedField,
    #[serde(default)]
    pub eligibility: EligibilityPolicy,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

/// Outcome of one injection pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InjectionReport {
    /// Types that received the capability field, in document order
    pub augmented: Vec<String>,
    /// Eligible types that already carried the field and were left as is
    /// under [`DuplicatePolicy::SkipExisting`]
    pub already_present: Vec<String>,
    /// Field-bearing types left unchanged by the eligibility policy
    pub skipped: Vec<String>,
}

impl InjectionReport {
    /// Types that expose the capability after the pass, augmented first
    pub fn capable_types(&self) -> impl Iterator<Item = &str> {
        self.augmented
            .iter()
            .chain(&self.already_present)
            .map(String::as_str)
    }
}

/// Capability field injector
#[derive(Debug, Clone)]
pub struct CapabilityInjector {
    config: InjectorConfig,
    field: FieldDefinition,
}

impl CapabilityInjector {
    pub fn new(config: InjectorConfig) -> Result<Self, SchemaError> {
        let field = config.field.to_definition()?;
        Ok(Self { config, field })
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Whether `node` structurally supports the capability field
    pub fn is_eligible(&self, node: &SchemaNode) -> bool {
        let (def, is_interface) = match node {
            SchemaNode::Object(def) => (def, false),
            SchemaNode::Interface(def) => (def, true),
            _ => return false,
        };
        if def.fields.is_none() {
            return false;
        }
        match &self.config.eligibility {
            EligibilityPolicy::AllFieldBearing => true,
            EligibilityPolicy::ImplementsInterface(interface) => {
                if is_interface {
                    def.name == *interface
                } else {
                    def.implements(interface)
                }
            }
        }
    }

    /// Inject into a tree rooted at a document node
    pub fn inject(&self, root: SchemaNode) -> Result<SchemaNode, SchemaError> {
        self.inject_with_report(root).map(|(root, _)| root)
    }

    pub fn inject_document(&self, document: Document) -> Result<Document, SchemaError> {
        match self.inject(document.into_node())? {
            SchemaNode::Document(doc) => Ok(doc),
            other => Err(SchemaError::Malformed {
                path: "$".to_string(),
                reason: format!("traversal returned a {} root", other.kind()),
            }),
        }
    }

    #[instrument(skip(self, root), fields(field = %self.field.name))]
    pub fn inject_with_report(
        &self,
        root: SchemaNode,
    ) -> Result<(SchemaNode, InjectionReport), SchemaError> {
        // Type extensions share their base type's name, so a field declared
        // on any of them counts for all.
        let carrying = match &root {
            SchemaNode::Document(doc) => doc
                .definitions
                .iter()
                .filter_map(SchemaNode::as_type_definition)
                .filter(|def| def.has_field(&self.field.name))
                .map(|def| def.name.clone())
                .collect(),
            _ => HashSet::new(),
        };
        let mut pass = InjectionPass {
            injector: self,
            carrying,
            report: InjectionReport::default(),
        };
        let root = visit(root, &mut pass)?;
        info!(
            augmented = pass.report.augmented.len(),
            already_present = pass.report.already_present.len(),
            skipped = pass.report.skipped.len(),
            "Capability injection complete"
        );
        Ok((root, pass.report))
    }
}

struct InjectionPass<'a> {
    injector: &'a CapabilityInjector,
    /// Type names carrying the field, including those augmented so far
    carrying: HashSet<String>,
    report: InjectionReport,
}

impl Visitor for InjectionPass<'_> {
    fn enter(&mut self, node: &mut SchemaNode, ctx: &VisitContext<'_>) {
        if !self.injector.is_eligible(node) {
            if node.fields().is_none() {
                // No field sequence to append to; leave the node as is.
                let failure = SchemaError::StructuralMutation {
                    kind: node.kind().to_string(),
                    path: ctx.path_string(),
                };
                trace!(error = %failure, "Node not eligible for capability field");
            } else if let Some(name) = node.name() {
                self.report.skipped.push(name.to_string());
            }
            return;
        }

        let name = node.name().unwrap_or_default().to_string();
        let skip_existing = self.injector.config.duplicates == DuplicatePolicy::SkipExisting;
        if skip_existing && self.carrying.contains(&name) {
            debug!(type_name = %name, "Capability field already present, skipping");
            let known = self.report.augmented.contains(&name)
                || self.report.already_present.contains(&name);
            if !known {
                self.report.already_present.push(name);
            }
            return;
        }

        if let Some(fields) = node.fields_mut() {
            fields.push(SchemaNode::Field(self.injector.field.clone()));
            debug!(type_name = %name, path = %ctx.path_string(), "Injected capability field");
            self.carrying.insert(name.clone());
            self.report.augmented.push(name);
        }
    }
}
