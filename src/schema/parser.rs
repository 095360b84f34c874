//! SDL reader
//!
//! Recursive-descent parser for the type-system subset of the GraphQL schema
//! definition language. Executable definitions (queries, fragments) are not
//! accepted. A field may omit its `: Type` so that documents printed after a
//! minimal capability injection can be read back.

use crate::error::SchemaError;
use crate::schema::node::{
    ConstValue, Directive, Document, EnumValue, FieldDefinition, InputValue, OtherDefinition,
    ScalarDefinition, SchemaNode, TypeDefinition, TypeRef,
};

/// Parse SDL text into a schema document
pub fn parse_schema(source: &str) -> Result<Document, SchemaError> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser { tokens, pos: 0 }.document()
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Name(String),
    Int(String),
    Float(String),
    Str(String),
    Punct(char),
    Spread,
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    line: usize,
    column: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::Parse {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, SchemaError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_ignored();
            let (line, column) = (self.line, self.column);
            let tok = match self.chars.peek().copied() {
                None => {
                    tokens.push(Token {
                        tok: Tok::Eof,
                        line,
                        column,
                    });
                    return Ok(tokens);
                }
                Some(c) if c == '_' || c.is_ascii_alphabetic() => self.name(),
                Some(c) if c == '-' || c.is_ascii_digit() => self.number()?,
                Some('"') => self.string()?,
                Some('.') => {
                    for _ in 0..3 {
                        if self.bump() != Some('.') {
                            return Err(self.error("expected '...'"));
                        }
                    }
                    Tok::Spread
                }
                Some(c) if "!$()[]{}:=@|&".contains(c) => {
                    self.bump();
                    Tok::Punct(c)
                }
                Some(c) => return Err(self.error(format!("unexpected character '{}'", c))),
            };
            tokens.push(Token { tok, line, column });
        }
    }

    /// Whitespace, commas and `#` comments are insignificant
    fn skip_ignored(&mut self) {
        while let Some(&c) = self.chars.peek() {
            match c {
                ' ' | '\t' | '\n' | '\r' | ',' | '\u{feff}' => {
                    self.bump();
                }
                '#' => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn name(&mut self) -> Tok {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '_' || c.is_ascii_alphanumeric() {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Tok::Name(name)
    }

    fn digits(&mut self, out: &mut String) -> Result<(), SchemaError> {
        let start = out.len();
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            out.push(c);
            self.bump();
        }
        if out.len() == start {
            return Err(self.error("expected digit"));
        }
        Ok(())
    }

    fn number(&mut self) -> Result<Tok, SchemaError> {
        let mut text = String::new();
        if self.chars.peek() == Some(&'-') {
            text.push('-');
            self.bump();
        }
        self.digits(&mut text)?;
        let mut float = false;
        if self.chars.peek() == Some(&'.') {
            float = true;
            text.push('.');
            self.bump();
            self.digits(&mut text)?;
        }
        if let Some(&e) = self.chars.peek() {
            if e == 'e' || e == 'E' {
                float = true;
                text.push(e);
                self.bump();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '+' || sign == '-' {
                        text.push(sign);
                        self.bump();
                    }
                }
                self.digits(&mut text)?;
            }
        }
        Ok(if float { Tok::Float(text) } else { Tok::Int(text) })
    }

    fn string(&mut self) -> Result<Tok, SchemaError> {
        self.bump();
        if self.chars.peek() == Some(&'"') {
            self.bump();
            if self.chars.peek() == Some(&'"') {
                self.bump();
                return self.block_string();
            }
            return Ok(Tok::Str(String::new()));
        }

        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some('"') => return Ok(Tok::Str(value)),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => {
                            let mut hex = String::new();
                            for _ in 0..4 {
                                match self.bump() {
                                    Some(h) if h.is_ascii_hexdigit() => hex.push(h),
                                    _ => return Err(self.error("invalid unicode escape")),
                                }
                            }
                            u32::from_str_radix(&hex, 16)
                                .ok()
                                .and_then(char::from_u32)
                                .ok_or_else(|| self.error("invalid unicode escape"))?
                        }
                        _ => return Err(self.error("invalid escape sequence")),
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn block_string(&mut self) -> Result<Tok, SchemaError> {
        let mut raw = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated block string")),
                Some('"') if raw.ends_with("\"\"") && !raw.ends_with("\\\"\"") => {
                    raw.truncate(raw.len() - 2);
                    return Ok(Tok::Str(block_string_value(&raw)));
                }
                Some(c) => raw.push(c),
            }
        }
    }
}

/// Leading GraphQL whitespace (space, tab) in bytes
fn leading_whitespace(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn is_blank(line: &str) -> bool {
    line.trim_matches([' ', '\t']).is_empty()
}

/// Common-indent removal and blank edge line trimming for `"""` strings
fn block_string_value(raw: &str) -> String {
    let raw = raw.replace("\\\"\"\"", "\"\"\"");
    let lines: Vec<&str> = raw.lines().collect();
    let indent = lines
        .iter()
        .skip(1)
        .filter(|line| !is_blank(line))
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    let mut out: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| match line.get(indent..) {
            _ if i == 0 => line.to_string(),
            Some(rest) if leading_whitespace(line) >= indent => rest.to_string(),
            _ => line.trim_start_matches([' ', '\t']).to_string(),
        })
        .collect();
    while out.first().is_some_and(|l| is_blank(l)) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| is_blank(l)) {
        out.pop();
    }
    out.join("\n")
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Tok {
        &self.tokens[self.pos].tok
    }

    fn peek_at(&self, offset: usize) -> &Tok {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].tok
    }

    fn advance(&mut self) -> Tok {
        let tok = self.tokens[self.pos].tok.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> SchemaError {
        let token = &self.tokens[self.pos];
        SchemaError::Parse {
            line: token.line,
            column: token.column,
            message: message.into(),
        }
    }

    fn at_punct(&self, c: char) -> bool {
        *self.peek() == Tok::Punct(c)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Tok::Name(name) if name == keyword)
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.at_punct(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<(), SchemaError> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}', found {}", c, describe(self.peek()))))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), SchemaError> {
        if self.at_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!(
                "expected '{}', found {}",
                keyword,
                describe(self.peek())
            )))
        }
    }

    fn name(&mut self) -> Result<String, SchemaError> {
        match self.peek().clone() {
            Tok::Name(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!("expected name, found {}", describe(&other)))),
        }
    }

    fn description(&mut self) -> Option<String> {
        match self.peek().clone() {
            Tok::Str(text) => {
                self.advance();
                Some(text)
            }
            _ => None,
        }
    }

    fn document(&mut self) -> Result<Document, SchemaError> {
        let mut definitions = Vec::new();
        while *self.peek() != Tok::Eof {
            definitions.push(self.definition()?);
        }
        Ok(Document::new(definitions))
    }

    fn definition(&mut self) -> Result<SchemaNode, SchemaError> {
        let description = self.description();
        let extension = self.at_keyword("extend");
        if extension {
            if description.is_some() {
                return Err(self.error("extensions cannot have descriptions"));
            }
            self.advance();
        }

        let keyword = match self.peek() {
            Tok::Name(name) => name.clone(),
            other => {
                return Err(self.error(format!(
                    "expected definition keyword, found {}",
                    describe(other)
                )))
            }
        };
        self.advance();

        match keyword.as_str() {
            "type" | "interface" => {
                let name = self.name()?;
                let interfaces = self.implements()?;
                let directives = self.directives()?;
                let fields = if self.at_punct('{') {
                    Some(self.fields_definition()?)
                } else {
                    None
                };
                let def = TypeDefinition {
                    name,
                    description,
                    interfaces,
                    directives,
                    fields,
                    extension,
                };
                Ok(if keyword == "type" {
                    SchemaNode::Object(def)
                } else {
                    SchemaNode::Interface(def)
                })
            }
            "scalar" => Ok(SchemaNode::Scalar(ScalarDefinition {
                name: self.name()?,
                description,
                directives: self.directives()?,
                extension,
            })),
            "enum" => {
                let name = self.name()?;
                let directives = self.directives()?;
                let mut values = Vec::new();
                if self.eat_punct('{') {
                    while !self.eat_punct('}') {
                        let description = self.description();
                        let name = self.name()?;
                        if matches!(name.as_str(), "true" | "false" | "null") {
                            return Err(self.error(format!("invalid enum value '{}'", name)));
                        }
                        values.push(EnumValue {
                            name,
                            description,
                            directives: self.directives()?,
                        });
                    }
                }
                Ok(SchemaNode::Other(OtherDefinition::Enum {
                    name,
                    description,
                    directives,
                    values,
                    extension,
                }))
            }
            "union" => {
                let name = self.name()?;
                let directives = self.directives()?;
                let mut members = Vec::new();
                if self.eat_punct('=') {
                    self.eat_punct('|');
                    members.push(self.name()?);
                    while self.eat_punct('|') {
                        members.push(self.name()?);
                    }
                }
                Ok(SchemaNode::Other(OtherDefinition::Union {
                    name,
                    description,
                    directives,
                    members,
                    extension,
                }))
            }
            "input" => {
                let name = self.name()?;
                let directives = self.directives()?;
                let mut fields = Vec::new();
                if self.eat_punct('{') {
                    while !self.eat_punct('}') {
                        fields.push(self.input_value()?);
                    }
                }
                Ok(SchemaNode::Other(OtherDefinition::InputObject {
                    name,
                    description,
                    directives,
                    fields,
                    extension,
                }))
            }
            "directive" if !extension => {
                self.expect_punct('@')?;
                let name = self.name()?;
                let arguments = self.arguments_definition()?;
                let repeatable = self.at_keyword("repeatable");
                if repeatable {
                    self.advance();
                }
                self.expect_keyword("on")?;
                self.eat_punct('|');
                let mut locations = vec![self.name()?];
                while self.eat_punct('|') {
                    locations.push(self.name()?);
                }
                Ok(SchemaNode::Other(OtherDefinition::Directive {
                    name,
                    description,
                    arguments,
                    repeatable,
                    locations,
                }))
            }
            "schema" => {
                let directives = self.directives()?;
                let mut operations = Vec::new();
                if self.eat_punct('{') {
                    while !self.eat_punct('}') {
                        let operation = self.name()?;
                        self.expect_punct(':')?;
                        operations.push((operation, self.name()?));
                    }
                }
                Ok(SchemaNode::Other(OtherDefinition::Schema {
                    directives,
                    operations,
                    extension,
                }))
            }
            other => Err(SchemaError::Parse {
                line: self.tokens[self.pos.saturating_sub(1)].line,
                column: self.tokens[self.pos.saturating_sub(1)].column,
                message: format!("unsupported definition '{}'", other),
            }),
        }
    }

    fn implements(&mut self) -> Result<Vec<String>, SchemaError> {
        let mut interfaces = Vec::new();
        if self.at_keyword("implements") {
            self.advance();
            self.eat_punct('&');
            interfaces.push(self.name()?);
            while self.eat_punct('&') {
                interfaces.push(self.name()?);
            }
        }
        Ok(interfaces)
    }

    fn fields_definition(&mut self) -> Result<Vec<SchemaNode>, SchemaError> {
        self.expect_punct('{')?;
        let mut fields = Vec::new();
        while !self.eat_punct('}') {
            if *self.peek() == Tok::Eof {
                return Err(self.error("unterminated field block"));
            }
            let description = self.description();
            let name = self.name()?;
            let arguments = self.arguments_definition()?;
            let ty = if self.eat_punct(':') {
                Some(self.type_ref()?)
            } else {
                None
            };
            let directives = self.directives()?;
            fields.push(SchemaNode::Field(FieldDefinition {
                name,
                description,
                arguments,
                ty,
                directives,
            }));
        }
        Ok(fields)
    }

    fn arguments_definition(&mut self) -> Result<Vec<InputValue>, SchemaError> {
        let mut arguments = Vec::new();
        if self.eat_punct('(') {
            while !self.eat_punct(')') {
                arguments.push(self.input_value()?);
            }
        }
        Ok(arguments)
    }

    fn input_value(&mut self) -> Result<InputValue, SchemaError> {
        let description = self.description();
        let name = self.name()?;
        self.expect_punct(':')?;
        let ty = self.type_ref()?;
        let default_value = if self.eat_punct('=') {
            Some(self.const_value()?)
        } else {
            None
        };
        Ok(InputValue {
            name,
            description,
            ty,
            default_value,
            directives: self.directives()?,
        })
    }

    fn type_ref(&mut self) -> Result<TypeRef, SchemaError> {
        let base = if self.eat_punct('[') {
            let inner = self.type_ref()?;
            self.expect_punct(']')?;
            TypeRef::List(Box::new(inner))
        } else {
            TypeRef::Named(self.name()?)
        };
        Ok(if self.eat_punct('!') {
            base.non_null()
        } else {
            base
        })
    }

    fn directives(&mut self) -> Result<Vec<Directive>, SchemaError> {
        let mut directives = Vec::new();
        while self.at_punct('@') && matches!(self.peek_at(1), Tok::Name(_)) {
            self.advance();
            let name = self.name()?;
            let mut arguments = Vec::new();
            if self.eat_punct('(') {
                while !self.eat_punct(')') {
                    let arg = self.name()?;
                    self.expect_punct(':')?;
                    arguments.push((arg, self.const_value()?));
                }
            }
            directives.push(Directive { name, arguments });
        }
        Ok(directives)
    }

    fn const_value(&mut self) -> Result<ConstValue, SchemaError> {
        match self.advance() {
            Tok::Int(text) => text
                .parse::<i64>()
                .map(ConstValue::Int)
                .map_err(|_| self.error(format!("integer out of range: {}", text))),
            Tok::Float(text) => Ok(ConstValue::Float(text)),
            Tok::Str(text) => Ok(ConstValue::String(text)),
            Tok::Name(name) => Ok(match name.as_str() {
                "true" => ConstValue::Boolean(true),
                "false" => ConstValue::Boolean(false),
                "null" => ConstValue::Null,
                _ => ConstValue::Enum(name),
            }),
            Tok::Punct('[') => {
                let mut items = Vec::new();
                while !self.eat_punct(']') {
                    items.push(self.const_value()?);
                }
                Ok(ConstValue::List(items))
            }
            Tok::Punct('{') => {
                let mut entries = Vec::new();
                while !self.eat_punct('}') {
                    let key = self.name()?;
                    self.expect_punct(':')?;
                    entries.push((key, self.const_value()?));
                }
                Ok(ConstValue::Object(entries))
            }
            Tok::Punct('$') => Err(self.error("variables are not allowed in constant values")),
            other => Err(self.error(format!("expected value, found {}", describe(&other)))),
        }
    }
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::Name(name) => format!("name '{}'", name),
        Tok::Int(text) | Tok::Float(text) => format!("number {}", text),
        Tok::Str(_) => "string".to_string(),
        Tok::Punct(c) => format!("'{}'", c),
        Tok::Spread => "'...'".to_string(),
        Tok::Eof => "end of input".to_string(),
    }
}
