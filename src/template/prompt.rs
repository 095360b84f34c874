//! Prompt templates
//!
//! Templates use `{name}` placeholders. `{{` and `}}` render literal braces.
//! Filling never substitutes an empty string for a missing value.

use crate::error::TemplateError;
use crate::template::context::TemplateContext;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Parsed prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((at, '{')) => {
                                return Err(TemplateError::Syntax {
                                    offset: at,
                                    message: "nested '{' inside placeholder".to_string(),
                                })
                            }
                            Some((_, ch)) => name.push(ch),
                            None => {
                                return Err(TemplateError::Syntax {
                                    offset,
                                    message: "unclosed placeholder".to_string(),
                                })
                            }
                        }
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(TemplateError::Syntax {
                            offset,
                            message: "empty placeholder".to_string(),
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                }
                '}' => {
                    return Err(TemplateError::Syntax {
                        offset,
                        message: "unmatched '}'; use '}}' for a literal brace".to_string(),
                    })
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct placeholder names the template requires
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Placeholders with no value in `context`
    pub fn missing<'a>(&'a self, context: &TemplateContext) -> Vec<&'a str> {
        self.placeholders()
            .into_iter()
            .filter(|name| !context.contains(name))
            .collect()
    }

    /// Substitute every placeholder from `context`
    pub fn fill(&self, context: &TemplateContext) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = context
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingPlaceholder { name: name.clone() })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

impl std::str::FromStr for PromptTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptTemplate::parse(s)
    }
}
