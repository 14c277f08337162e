//! Template compilation into an anchored pattern, field list and output shape.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::TemplateSyntaxError;
use crate::format::{self, Converter, FormatType, Translation};
use crate::models::Value;
use crate::template::{FieldPath, tokenize};

use super::flags::Flags;
use super::shape;

/// Field name whose match is discarded.
pub const IGNORE_MARKER: &str = "_";

/// One capturing placeholder of a compiled template.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    path: FieldPath,
    format_type: FormatType,
    pattern: String,
    converter: Converter,
}

impl FieldSpec {
    /// Where the converted value goes in the output.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn format_type(&self) -> FormatType {
        self.format_type
    }

    /// Regex fragment inside the field's capture group.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn converter(&self) -> Converter {
        self.converter
    }
}

/// A template compiled for matching.
///
/// Capture groups of `regex` line up one to one with `fields`.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub(crate) template: String,
    pub(crate) regex: Regex,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) shape: Value,
    pub(crate) flags: Flags,
}

/// Compile a template in a single pass over its tokens.
pub fn compile(template: &str, flags: Flags) -> Result<CompiledPattern, TemplateSyntaxError> {
    let mut source = String::from("^");
    let mut fields = Vec::new();
    let mut skeleton = shape::root();
    let mut implicit = 0usize;

    for token in tokenize(template) {
        let token = token?;
        push_literal(&mut source, &token.literal);

        let Some(field) = token.field else {
            continue;
        };

        let translation = match field.spec.as_deref() {
            None | Some("") => Translation::string(),
            Some(spec) => format::translate(spec)?,
        };

        if field.name == IGNORE_MARKER {
            source.push_str("(?:");
            source.push_str(&translation.pattern);
            source.push(')');
            continue;
        }

        let name = if field.name.is_empty() || field.name.starts_with(['.', '[']) {
            let name = format!("{}{}", implicit, field.name);
            implicit += 1;
            name
        } else {
            field.name
        };

        source.push('(');
        source.push_str(&translation.pattern);
        source.push(')');

        let path = FieldPath::parse(&name)?;
        shape::insert(&mut skeleton, &path)?;
        fields.push(FieldSpec {
            path,
            format_type: translation.format_type,
            pattern: translation.pattern,
            converter: translation.converter,
        });
    }

    // A single trailing newline is allowed unless `$` already matches at line ends
    if !flags.contains(Flags::MULTILINE) {
        source.push_str(r"\n?");
    }
    source.push('$');

    let mut builder = RegexBuilder::new(&source);
    flags.apply(&mut builder);
    let regex = builder.build()?;

    debug!(
        "Compiled template {:?} into {} with {} fields",
        template,
        regex.as_str(),
        fields.len()
    );

    Ok(CompiledPattern {
        template: template.to_string(),
        regex,
        fields,
        shape: shape::normalize(skeleton),
        flags,
    })
}

/// Append template text that must match verbatim, whitespace included.
///
/// Whitespace is written as escapes so the verbose flag cannot drop it.
fn push_literal(source: &mut String, literal: &str) {
    for ch in regex::escape(literal).chars() {
        match ch {
            ' ' => source.push_str(r"\x20"),
            '\t' => source.push_str(r"\t"),
            '\n' => source.push_str(r"\n"),
            '\r' => source.push_str(r"\r"),
            ch if ch.is_whitespace() => source.push_str(&format!(r"\x{{{:X}}}", ch as u32)),
            ch => source.push(ch),
        }
    }
}
