//! # Compile options
//!
//! Knobs of the script emitter. Options can be built in code or read from a
//! JSON file; every field is optional there.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChroniclerError, Result};

/// Default bound on nested emission
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// One level of indentation in the emitted script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndentRepr", into = "IndentRepr")]
pub enum Indent {
    Spaces(u8),
    Tab,
}

impl Indent {
    pub fn unit(&self) -> String {
        match self {
            Indent::Spaces(width) => " ".repeat(usize::from(*width)),
            Indent::Tab => "\t".to_string(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(4)
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indent::Spaces(width) => write!(f, "{}", width),
            Indent::Tab => write!(f, "tab"),
        }
    }
}

impl FromStr for Indent {
    type Err = ChroniclerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "tab" | "tabs" | "\\t" => Ok(Indent::Tab),
            other => match other.parse::<u8>() {
                Ok(width) if width > 0 => Ok(Indent::Spaces(width)),
                _ => Err(ChroniclerError::InvalidOption(format!(
                    "indent must be 'tab' or a positive number of spaces, got '{}'",
                    other
                ))),
            },
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum IndentRepr {
    Width(u8),
    Name(String),
}

impl TryFrom<IndentRepr> for Indent {
    type Error = ChroniclerError;

    fn try_from(repr: IndentRepr) -> Result<Self> {
        match repr {
            IndentRepr::Width(width) => width.to_string().parse(),
            IndentRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Indent> for IndentRepr {
    fn from(indent: Indent) -> Self {
        match indent {
            Indent::Spaces(width) => IndentRepr::Width(width),
            Indent::Tab => IndentRepr::Name("tab".to_string()),
        }
    }
}

/// Options for script emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Indentation unit for nesting under `*choice` and `*if`
    pub indent: Indent,
    /// Maximum nesting of inlined bubbles before emission gives up
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            indent: Indent::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompileOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ChroniclerError::io(path, e))?;
        let options = Self::from_json(&json)?;
        tracing::debug!("[CONFIG] loaded compile options from {}: {:?}", path.display(), options);
        Ok(options)
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_four_spaces() {
        let options = CompileOptions::default();
        assert_eq!(options.indent.unit(), "    ");
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn parses_indent_settings() {
        assert_eq!("tab".parse::<Indent>().unwrap(), Indent::Tab);
        assert_eq!("2".parse::<Indent>().unwrap(), Indent::Spaces(2));
        assert!("0".parse::<Indent>().is_err());
        assert!("wide".parse::<Indent>().is_err());
    }

    #[test]
    fn reads_partial_json() {
        let options = CompileOptions::from_json(r#"{ "indent": "tab" }"#).unwrap();
        assert_eq!(options.indent, Indent::Tab);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);

        let options = CompileOptions::from_json(r#"{ "indent": 2, "max_depth": 16 }"#).unwrap();
        assert_eq!(options.indent.unit(), "  ");
        assert_eq!(options.max_depth, 16);
    }

    #[test]
    fn rejects_bad_indent_in_json() {
        assert!(CompileOptions::from_json(r#"{ "indent": "sideways" }"#).is_err());
    }
}
