//! graphgen: Schema-driven Generation Capability
//!
//! Augments a GraphQL type-system document so every eligible type exposes a
//! generation field, and resolves that field for any type through one shared,
//! shape-agnostic resolver backed by a language-model provider.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod resolver;
pub mod schema;
pub mod template;
