//! Data models: extracted values and configuration.

pub mod config;
pub mod value;

pub use config::{MatchingConfig, OutputConfig, StringParserConfig};
pub use value::{Key, Value};
