//! Compound field names split into access steps.

use std::fmt;

use crate::error::TemplateSyntaxError;
use crate::models::Key;

/// One access step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Container lookup: the leading name or a `[key]`.
    Index(Key),
    /// Member lookup: `.name`.
    Attribute(String),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Index(key) => write!(f, "[{}]", key),
            PathStep::Attribute(name) => write!(f, ".{}", name),
        }
    }
}

/// Decomposition of a field name such as `0.second[third]`.
///
/// The first step is always an [`PathStep::Index`] with a string key
/// addressing the top-level slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    name: String,
    steps: Vec<PathStep>,
}

impl FieldPath {
    /// Split a field name into its steps.
    ///
    /// `x.y[0]` becomes `Index("x")`, `Attribute("y")`, `Index(0)`.
    pub fn parse(name: &str) -> Result<Self, TemplateSyntaxError> {
        let mut steps = Vec::new();

        for (position, part) in name.split('.').enumerate() {
            let mut keys = part.split('[');
            let head = keys.next().unwrap_or_default();
            if head.is_empty() {
                return Err(TemplateSyntaxError::EmptyFieldName(name.to_string()));
            }

            steps.push(if position == 0 {
                PathStep::Index(Key::Str(head.to_string()))
            } else {
                PathStep::Attribute(head.to_string())
            });

            for key in keys {
                let key = key
                    .strip_suffix(']')
                    .filter(|k| !k.contains(']'))
                    .ok_or_else(|| TemplateSyntaxError::InvalidFieldSyntax(name.to_string()))?;
                if key.is_empty() {
                    return Err(TemplateSyntaxError::EmptyFieldName(name.to_string()));
                }
                steps.push(PathStep::Index(index_key(key)));
            }
        }

        Ok(Self {
            name: name.to_string(),
            steps,
        })
    }

    /// The field name this path was parsed from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Key for a `[key]` step.
///
/// All-digit keys are integers. Those past `i64` keep their canonical
/// decimal digits as a string key, which prints the same as the number.
fn index_key(key: &str) -> Key {
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return Key::Str(key.to_string());
    }
    match key.parse::<i64>() {
        Ok(i) => Key::Int(i),
        Err(_) => Key::Str(key.trim_start_matches('0').to_string()),
    }
}
