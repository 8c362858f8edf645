//! C#-like type expressions used on the command line and in manifests.
//!
//! ```text
//! type      := primary suffix*
//! primary   := name ( '<' type ( ',' type )* '>' )?
//! suffix    := '[]' | '?'
//! name      := [A-Za-z_] [A-Za-z0-9_.`]*
//! ```
//!
//! `int`, `string?`, `Dictionary<string, List<string>>`, `Color[]?`.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    /// A keyword, a (possibly qualified) name, or a generic instantiation.
    Named { name: String, arguments: Vec<TypeExpr> },
    Array(Box<TypeExpr>),
    Nullable(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            arguments: Vec::new(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, arguments } => {
                f.write_str(name)?;
                if let Some((first, rest)) = arguments.split_first() {
                    write!(f, "<{first}")?;
                    for argument in rest {
                        write!(f, ", {argument}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Array(element) => write!(f, "{element}[]"),
            Self::Nullable(underlying) => write!(f, "{underlying}?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type expression `{input}` at offset {offset}: {message}")]
pub struct TypeSyntaxError {
    pub input: String,
    pub offset: usize,
    pub message: &'static str,
}

impl FromStr for TypeExpr {
    type Err = TypeSyntaxError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input, pos: 0 };
        let expr = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(expr)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn parse_type(&mut self) -> Result<TypeExpr, TypeSyntaxError> {
        let mut expr = self.parse_primary()?;
        loop {
            self.skip_whitespace();
            if self.eat('?') {
                expr = TypeExpr::Nullable(Box::new(expr));
            } else if self.eat('[') {
                self.skip_whitespace();
                if !self.eat(']') {
                    return Err(self.error("expected `]`"));
                }
                expr = TypeExpr::Array(Box::new(expr));
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<TypeExpr, TypeSyntaxError> {
        self.skip_whitespace();
        let name = self.parse_name()?;
        self.skip_whitespace();
        let mut arguments = Vec::new();
        if self.eat('<') {
            loop {
                arguments.push(self.parse_type()?);
                self.skip_whitespace();
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }
        Ok(TypeExpr::Named { name, arguments })
    }

    fn parse_name(&mut self) -> Result<String, TypeSyntaxError> {
        let rest = &self.input[self.pos..];
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Err(self.error("expected a type name")),
        }
        let len = chars
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '`')))
            .map_or(rest.len(), |(index, _)| index);
        let name = &rest[..len];
        if name.ends_with('.') || name.contains("..") {
            return Err(self.error("malformed qualified name"));
        }
        self.pos += len;
        Ok(name.to_string())
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.input[self.pos..].starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, message: &'static str) -> TypeSyntaxError {
        TypeSyntaxError {
            input: self.input.to_string(),
            offset: self.pos,
            message,
        }
    }
}

#[cfg(test)]
#[path = "../tests/type_syntax_tests.rs"]
mod tests;
