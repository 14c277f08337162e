//! Template parser: compile a format-string template once, parse text with it many times.

mod compiler;
mod flags;
mod shape;

pub use compiler::{CompiledPattern, FieldSpec, IGNORE_MARKER, compile};
pub use flags::Flags;

use std::str::FromStr;

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{ExtractionError, TemplateSyntaxError};
use crate::models::Value;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for extracting values from text.
pub trait Extractor {
    /// Extract values from the whole text.
    fn extract(&self, text: &str) -> Result<Value>;

    /// Extract values from every line of the text independently.
    fn extract_lines(&self, text: &str) -> Vec<Result<Value>> {
        text.lines().map(|line| self.extract(line)).collect()
    }
}

/// Parses text using a format string as the template.
///
/// ```
/// use stringparser_core::{Parser, Value};
///
/// let parser = Parser::new("before {0:d} after").unwrap();
/// assert_eq!(parser.parse("before 42 after").unwrap(), Value::from(42));
/// ```
///
/// The output has the shape of the template's fields: a bare value for a
/// single field, a list for fields numbered `0..n`, a map when any field is
/// named, and nested maps, lists and objects for compound field names.
///
/// Matching runs on the `regex` crate, so matching time is linear in the
/// input and no template can cause catastrophic backtracking.
#[derive(Debug, Clone)]
pub struct Parser {
    compiled: CompiledPattern,
}

impl Parser {
    /// Compile a template with default matching flags.
    pub fn new(template: &str) -> std::result::Result<Self, TemplateSyntaxError> {
        Self::with_flags(template, Flags::EMPTY)
    }

    /// Compile a template with the given matching flags.
    pub fn with_flags(
        template: &str,
        flags: impl Into<Flags>,
    ) -> std::result::Result<Self, TemplateSyntaxError> {
        Ok(Self {
            compiled: compile(template, flags.into())?,
        })
    }

    /// Parse a text.
    ///
    /// The whole template must match; with [`Flags::MULTILINE`] it may match a
    /// single line of the text.
    pub fn parse(&self, text: &str) -> Result<Value> {
        let compiled = &self.compiled;
        let caps = compiled
            .regex
            .captures(text)
            .ok_or_else(|| ExtractionError::NoMatch {
                text: text.to_string(),
                pattern: compiled.regex.as_str().to_string(),
            })?;

        let mut parsed = compiled.shape.clone();
        for (group, field) in caps.iter().skip(1).zip(&compiled.fields) {
            let raw = group.map(|m| m.as_str()).unwrap_or_default();
            let value = field
                .converter()
                .convert(raw)
                .map_err(|reason| ExtractionError::Conversion {
                    field: field.path().to_string(),
                    value: raw.to_string(),
                    reason,
                })?;

            if !shape::populate(&mut parsed, field.path(), value) {
                trace!("Field {} already filled, keeping the first value", field.path());
            }
        }

        trace!("Parsed {:?} into {}", text, parsed);

        Ok(match parsed {
            Value::List(items) if items.len() == 1 => items.into_iter().next().unwrap_or_default(),
            other => other,
        })
    }

    /// Parse a text and deserialize the result.
    pub fn parse_into<T: DeserializeOwned>(&self, text: &str) -> crate::Result<T> {
        let value = self.parse(text)?;
        Ok(serde_json::from_value(value.to_json())?)
    }

    /// The template this parser was compiled from.
    pub fn template(&self) -> &str {
        &self.compiled.template
    }

    /// Source of the generated anchored pattern.
    pub fn pattern(&self) -> &str {
        self.compiled.regex.as_str()
    }

    pub fn flags(&self) -> Flags {
        self.compiled.flags
    }

    /// Capturing fields in template order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.compiled.fields
    }
}

impl Extractor for Parser {
    fn extract(&self, text: &str) -> Result<Value> {
        self.parse(text)
    }
}

impl FromStr for Parser {
    type Err = TemplateSyntaxError;

    fn from_str(template: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(template)
    }
}
