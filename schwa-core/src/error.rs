//! Error types for schwa-core.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for schwa-core operations.
pub type Result<T> = std::result::Result<T, SchwaError>;

/// Which revision of a diff pair an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The older revision (`A`).
    Base,
    /// The newer revision (`B`).
    Head,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Base => "base",
            Side::Head => "head",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while parsing or diffing source units.
#[derive(Error, Debug)]
pub enum SchwaError {
    /// Source could not be split into classes and methods.
    #[error(
        "Parse error in {filename}{}{}: {message}",
        .side.map(|s| format!(" ({} revision)", s)).unwrap_or_default(),
        .line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    Parse {
        /// File the source came from (`<source>` when parsed without one).
        filename: String,
        /// Revision that failed, when parsing as part of a diff.
        side: Option<Side>,
        /// Line of the offending declaration, if known.
        line: Option<u32>,
        /// Description of the structural problem.
        message: String,
    },

    /// Requested class is absent from the parse result.
    #[error("Class not found: {class}")]
    ClassNotFound {
        /// Name that was looked up.
        class: String,
    },

    /// Requested method is absent from an existing class.
    #[error("Method not found: {class}.{method}")]
    MethodNotFound {
        /// Class that was searched.
        class: String,
        /// Method name that was looked up.
        method: String,
    },

    /// No parser is registered for a language or file extension.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Invalid TOML configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchwaError {
    /// Build a parse error that has not been attributed to a file yet.
    pub fn parse(line: Option<u32>, message: impl Into<String>) -> Self {
        SchwaError::Parse {
            filename: UNNAMED_SOURCE.to_string(),
            side: None,
            line,
            message: message.into(),
        }
    }

    /// Attach a filename to a parse error. Other variants pass through.
    pub fn with_filename(self, name: &str) -> Self {
        match self {
            SchwaError::Parse {
                side,
                line,
                message,
                ..
            } => SchwaError::Parse {
                filename: name.to_string(),
                side,
                line,
                message,
            },
            other => other,
        }
    }

    /// Attach the diff side to a parse error. Other variants pass through.
    pub fn on_side(self, which: Side) -> Self {
        match self {
            SchwaError::Parse {
                filename,
                line,
                message,
                ..
            } => SchwaError::Parse {
                filename,
                side: Some(which),
                line,
                message,
            },
            other => other,
        }
    }

    /// True for the not-found lookup errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SchwaError::ClassNotFound { .. } | SchwaError::MethodNotFound { .. }
        )
    }
}

/// Placeholder filename for sources parsed without a `SourceUnit`.
pub const UNNAMED_SOURCE: &str = "<source>";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchwaError::MethodNotFound {
            class: "API".to_string(),
            method: "register".to_string(),
        };
        assert_eq!(err.to_string(), "Method not found: API.register");

        let err = SchwaError::parse(Some(12), "unbalanced braces");
        assert_eq!(
            err.to_string(),
            "Parse error in <source> at line 12: unbalanced braces"
        );
    }

    #[test]
    fn test_parse_error_attribution() {
        let err = SchwaError::parse(None, "no class declarations found")
            .with_filename("API.java")
            .on_side(Side::Head);

        match &err {
            SchwaError::Parse { filename, side, .. } => {
                assert_eq!(filename, "API.java");
                assert_eq!(*side, Some(Side::Head));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("API.java (head revision)"));
    }

    #[test]
    fn test_attribution_leaves_lookups_alone() {
        let err = SchwaError::ClassNotFound {
            class: "Missing".to_string(),
        }
        .with_filename("A.java")
        .on_side(Side::Base);

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Class not found: Missing");
    }
}
