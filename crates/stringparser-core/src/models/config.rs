//! Configuration structures for parsers and the command line.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StringParserError};
use crate::parser::{Flags, Parser};

/// Main configuration for stringparser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StringParserConfig {
    /// Matching modes applied to every template.
    pub matching: MatchingConfig,

    /// Output handling.
    pub output: OutputConfig,

    /// Named templates.
    pub templates: BTreeMap<String, String>,
}

/// Matching modes passed to the regex engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Ignore letter case.
    pub case_insensitive: bool,

    /// Let the template match any single line of a multi-line text.
    pub multiline: bool,

    /// Let string fields span newlines.
    pub dot_matches_newline: bool,

    /// Ignore whitespace in the generated pattern.
    pub verbose: bool,

    /// Accepted for compatibility, has no effect.
    pub locale: bool,

    /// Unicode classes. Always on.
    pub unicode: bool,
}

impl MatchingConfig {
    /// Combined flag mask.
    pub fn flags(&self) -> Flags {
        [
            (self.case_insensitive, Flags::IGNORECASE),
            (self.multiline, Flags::MULTILINE),
            (self.dot_matches_newline, Flags::DOTALL),
            (self.verbose, Flags::VERBOSE),
            (self.locale, Flags::LOCALE),
            (self.unicode, Flags::UNICODE),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .fold(Flags::EMPTY, |acc, (_, flag)| acc | flag)
    }
}

/// Output handling configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Skip texts that do not match instead of failing.
    pub skip_unmatched: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl StringParserConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Look up a named template.
    pub fn template(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Compile a named template with the configured flags.
    pub fn parser(&self, name: &str) -> Result<Parser> {
        let template = self
            .template(name)
            .ok_or_else(|| StringParserError::Config(format!("unknown template '{}'", name)))?;
        Ok(Parser::with_flags(template, self.matching.flags())?)
    }
}
