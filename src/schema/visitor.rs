//! Schema graph visitor
//!
//! Pre-order traversal of a schema tree that hands every node to a callback
//! together with its positional key, the path from the root and a summary of
//! each ancestor. The visitor has no notion of what the callback does; any
//! structural rewrite can be expressed on top of it.

use crate::error::SchemaError;
use crate::schema::node::{NodeKind, SchemaNode};
use std::fmt;

/// Nesting limit for a well-formed schema tree (document > type > field)
pub const MAX_DEPTH: usize = 3;

/// Position of a node within its parent's child sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Root,
    Index(usize),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Root => f.write_str("$"),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Snapshot of an ancestor node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary {
    pub kind: NodeKind,
    pub name: Option<String>,
}

impl NodeSummary {
    fn of(node: &SchemaNode) -> Self {
        Self {
            kind: node.kind(),
            name: node.name().map(str::to_string),
        }
    }
}

/// Everything the callback learns about a node besides the node itself
#[derive(Debug)]
pub struct VisitContext<'a> {
    pub key: Key,
    pub path: &'a [Key],
    pub ancestors: &'a [NodeSummary],
}

impl VisitContext<'_> {
    pub fn parent(&self) -> Option<&NodeSummary> {
        self.ancestors.last()
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Dotted rendering of the path, e.g. `$.2.0`
    pub fn path_string(&self) -> String {
        format_path(self.path)
    }
}

fn format_path(path: &[Key]) -> String {
    path.iter()
        .map(Key::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Per-node callback
pub trait Visitor {
    fn enter(&mut self, node: &mut SchemaNode, ctx: &VisitContext<'_>);
}

impl<F> Visitor for F
where
    F: FnMut(&mut SchemaNode, &VisitContext<'_>),
{
    fn enter(&mut self, node: &mut SchemaNode, ctx: &VisitContext<'_>) {
        self(node, ctx)
    }
}

/// Traverse `root` in pre-order, calling `visitor` once per node.
///
/// Children are read after `enter` returns, so a field appended by the
/// callback is itself visited once. Fails only when the tree is malformed.
pub fn visit<V: Visitor + ?Sized>(
    mut root: SchemaNode,
    visitor: &mut V,
) -> Result<SchemaNode, SchemaError> {
    if root.kind() != NodeKind::Document {
        return Err(SchemaError::Malformed {
            path: Key::Root.to_string(),
            reason: format!("root must be a Document, found {}", root.kind()),
        });
    }

    let mut path = vec![Key::Root];
    let mut ancestors = Vec::new();
    walk(&mut root, visitor, &mut path, &mut ancestors)?;
    Ok(root)
}

fn walk<V: Visitor + ?Sized>(
    node: &mut SchemaNode,
    visitor: &mut V,
    path: &mut Vec<Key>,
    ancestors: &mut Vec<NodeSummary>,
) -> Result<(), SchemaError> {
    if ancestors.len() >= MAX_DEPTH {
        return Err(SchemaError::Malformed {
            path: format_path(path),
            reason: format!("nesting deeper than {} levels", MAX_DEPTH),
        });
    }

    let key = *path.last().unwrap_or(&Key::Root);
    visitor.enter(
        node,
        &VisitContext {
            key,
            path: path.as_slice(),
            ancestors: ancestors.as_slice(),
        },
    );

    let parent_kind = node.kind();
    ancestors.push(NodeSummary::of(node));
    if let Some(children) = node.children_mut() {
        for (index, child) in children.iter_mut().enumerate() {
            path.push(Key::Index(index));
            check_child(parent_kind, child, path)?;
            walk(child, visitor, path, ancestors)?;
            path.pop();
        }
    }
    ancestors.pop();
    Ok(())
}

fn check_child(parent: NodeKind, child: &SchemaNode, path: &[Key]) -> Result<(), SchemaError> {
    let allowed = match parent {
        NodeKind::Document => child.kind() != NodeKind::Document && child.kind() != NodeKind::Field,
        NodeKind::Object | NodeKind::Interface => child.kind() == NodeKind::Field,
        _ => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(SchemaError::Malformed {
            path: format_path(path),
            reason: format!("{} node cannot appear inside {}", child.kind(), parent),
        })
    }
}
