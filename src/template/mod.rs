//! Prompt Templating
//!
//! Context assembly (entity attributes + call arguments → flat text map) and
//! the `{placeholder}` templates filled from it.

pub mod context;
pub mod prompt;

pub use context::{assemble, value_to_text, CallArguments, SourceEntity, TemplateContext};
pub use prompt::PromptTemplate;
