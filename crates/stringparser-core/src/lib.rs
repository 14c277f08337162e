//! Core library for extracting values from text with format-string templates.
//!
//! Parsing is the inverse of formatting: a template such as
//! `"{name} is {age:d} years old"` is compiled once into an anchored pattern,
//! and each parsed text yields the values at the replacement fields.
//!
//! This crate provides:
//! - Template scanning (literal text and replacement fields)
//! - Format specifier translation (sign, `#` and type letter)
//! - Template compilation into a pattern, field list and output shape
//! - Extraction of typed values into lists, maps and objects
//! - Configuration for named templates and matching flags

pub mod error;
pub mod format;
pub mod models;
pub mod parser;
pub mod template;

pub use error::{ExtractionError, Result, StringParserError, TemplateSyntaxError};
pub use format::{Converter, FormatType};
pub use models::config::StringParserConfig;
pub use models::value::{Key, Value};
pub use parser::{Extractor, FieldSpec, Flags, Parser};
pub use template::{FieldPath, PathStep};
