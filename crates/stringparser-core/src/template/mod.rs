//! Template scanning: literal text and replacement fields.
//!
//! A template uses the replacement-field syntax of format strings:
//! `{name!conversion:spec}`, with `{{` and `}}` standing for literal braces.

mod field;

pub use field::{FieldPath, PathStep};

use std::iter::Peekable;
use std::str::Chars;

use crate::error::TemplateSyntaxError;

/// A replacement field as written in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name, possibly empty or compound (`0.name[key]`).
    pub name: String,
    /// Format specifier after `:`, if any.
    pub spec: Option<String>,
    /// Conversion character after `!`, if any. Parsing ignores it.
    pub conversion: Option<char>,
}

/// Literal text followed by an optional replacement field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub literal: String,
    pub field: Option<Field>,
}

/// Iterator over the tokens of a template.
pub struct Tokens<'a> {
    chars: Peekable<Chars<'a>>,
    failed: bool,
}

/// Scan a template left to right.
///
/// The last token may carry a trailing literal and no field. Iteration
/// stops after the first error.
pub fn tokenize(template: &str) -> Tokens<'_> {
    Tokens {
        chars: template.chars().peekable(),
        failed: false,
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, TemplateSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.chars.peek().is_none() {
            return None;
        }

        let result = self.next_token();
        self.failed = result.is_err();
        Some(result)
    }
}

impl Tokens<'_> {
    fn next_token(&mut self) -> Result<Token, TemplateSyntaxError> {
        let mut literal = String::new();

        while let Some(ch) = self.chars.next() {
            match ch {
                '{' if self.chars.peek() == Some(&'{') => {
                    self.chars.next();
                    literal.push('{');
                }
                '}' if self.chars.peek() == Some(&'}') => {
                    self.chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateSyntaxError::UnmatchedCloseBrace),
                '{' => {
                    let content = self.field_content()?;
                    let field = parse_field(&content)?;
                    return Ok(Token {
                        literal,
                        field: Some(field),
                    });
                }
                _ => literal.push(ch),
            }
        }

        Ok(Token {
            literal,
            field: None,
        })
    }

    /// Everything up to the `}` closing the current field, nested braces included.
    fn field_content(&mut self) -> Result<String, TemplateSyntaxError> {
        let mut content = String::new();
        let mut depth = 1usize;

        for ch in self.chars.by_ref() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(content);
                    }
                }
                _ => {}
            }
            content.push(ch);
        }

        Err(TemplateSyntaxError::UnmatchedOpenBrace)
    }
}

fn parse_field(content: &str) -> Result<Field, TemplateSyntaxError> {
    let mut chars = content.char_indices().peekable();
    let mut name_end = content.len();

    // The name ends at the first ':' or '!' outside brackets.
    while let Some((i, ch)) = chars.next() {
        match ch {
            '{' => return Err(TemplateSyntaxError::UnexpectedBraceInFieldName),
            '[' => {
                while chars.next_if(|&(_, c)| c != ']').is_some() {}
            }
            ':' | '!' => {
                name_end = i;
                break;
            }
            _ => {}
        }
    }

    let name = content[..name_end].to_string();
    let rest = &content[name_end..];

    let (conversion, spec) = if let Some(after) = rest.strip_prefix('!') {
        let mut after = after.chars();
        let conversion = after.next().ok_or(TemplateSyntaxError::MissingConversion)?;
        let tail = after.as_str();
        let spec = match tail.strip_prefix(':') {
            Some(spec) => Some(spec.to_string()),
            None if tail.is_empty() => None,
            None => return Err(TemplateSyntaxError::ExpectedColonAfterConversion),
        };
        (Some(conversion), spec)
    } else {
        (None, rest.strip_prefix(':').map(str::to_string))
    };

    Ok(Field {
        name,
        spec,
        conversion,
    })
}
