//! Error types for the stringparser-core library.

use thiserror::Error;

/// Main error type for the stringparser library.
#[derive(Error, Debug)]
pub enum StringParserError {
    /// The template could not be compiled.
    #[error("template error: {0}")]
    Template(#[from] TemplateSyntaxError),

    /// The text could not be parsed with a compiled template.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while compiling a template.
///
/// These are always reported when the parser is built, never when it is used.
#[derive(Error, Debug)]
pub enum TemplateSyntaxError {
    /// A `{` without a closing `}`.
    #[error("expected '}}' before end of string")]
    UnmatchedOpenBrace,

    /// A single `}` that is not part of a `}}` escape.
    #[error("single '}}' encountered in format string")]
    UnmatchedCloseBrace,

    /// A `{` inside a field name.
    #[error("unexpected '{{' in field name")]
    UnexpectedBraceInFieldName,

    /// A `!` at the end of a replacement field.
    #[error("end of string while looking for conversion specifier")]
    MissingConversion,

    /// The conversion character is followed by something other than `:`.
    #[error("expected ':' after conversion specifier")]
    ExpectedColonAfterConversion,

    /// A field name with an empty component, e.g. `{a..b}` or `{0[]}`.
    #[error("empty field name in '{0}'")]
    EmptyFieldName(String),

    /// A malformed bracket expression in a field name.
    #[error("invalid field syntax in '{0}'")]
    InvalidFieldSyntax(String),

    /// The format specifier does not follow the standard grammar.
    #[error("could not parse the format specifier '{0}'")]
    InvalidFormatSpec(String),

    /// The type letter is not supported.
    #[error("'{0}' is not a valid format type")]
    InvalidFormatType(String),

    /// `#` used with a type that has no radix prefix.
    #[error("alternate form (#) not allowed in '{0}' format type")]
    AlternateFormNotAllowed(String),

    /// The sign position holds something other than `+`, `-` or a space.
    #[error("'{0}' is not a valid sign")]
    InvalidSign(char),

    /// A field path conflicts with the structure built by an earlier field.
    #[error("incompatible access {step} in field '{field}'")]
    IncompatiblePath { field: String, step: String },

    /// The matching engine rejected the assembled pattern.
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Errors raised while parsing text with a compiled template.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The text does not satisfy the template.
    #[error("could not parse '{text}' with '{pattern}'")]
    NoMatch { text: String, pattern: String },

    /// A captured substring was rejected by its converter.
    #[error("failed to convert {field}: '{value}' ({reason})")]
    Conversion {
        field: String,
        value: String,
        reason: String,
    },
}

/// Result type for the stringparser library.
pub type Result<T> = std::result::Result<T, StringParserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_messages() {
        assert_eq!(
            TemplateSyntaxError::UnmatchedOpenBrace.to_string(),
            "expected '}' before end of string"
        );
        assert_eq!(
            TemplateSyntaxError::InvalidSign('*').to_string(),
            "'*' is not a valid sign"
        );
        assert_eq!(
            TemplateSyntaxError::AlternateFormNotAllowed("d".into()).to_string(),
            "alternate form (#) not allowed in 'd' format type"
        );
    }

    #[test]
    fn test_no_match_carries_text_and_pattern() {
        let err = ExtractionError::NoMatch {
            text: "before bla after".into(),
            pattern: "^before ([-]?[0-9]+?) after$".into(),
        };
        let message = err.to_string();
        assert!(message.contains("before bla after"));
        assert!(message.contains("[0-9]+?"));
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: StringParserError = TemplateSyntaxError::UnmatchedCloseBrace.into();
        assert!(matches!(err, StringParserError::Template(_)));
    }
}
