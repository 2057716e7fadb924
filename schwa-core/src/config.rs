//! Diff configuration.
//!
//! Configuration is optional: every field has a default that reproduces the
//! plain name-aligned, byte-exact diff. Callers that keep settings in a TOML
//! file hand the text in; this crate never reads files itself.
//!
//! # Example Configuration
//!
//! ```toml
//! [diff]
//! similarity_threshold = 0.95
//! detect_member_changes = true
//! expand_class_members = false
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for the diff engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// A method present in both revisions is reported as modified when the
    /// similarity of its two spans falls below this ratio.
    ///
    /// Default: `1.0`, so any textual change counts.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Report a matched class as modified when its text outside method
    /// bodies changed (fields, extends clause, initializers), even if no
    /// method did.
    ///
    /// Default: `false`; such classes stay silent.
    #[serde(default)]
    pub detect_member_changes: bool,

    /// Follow an added or removed class with one method record per method
    /// it declares.
    #[serde(default)]
    pub expand_class_members: bool,
}

fn default_similarity_threshold() -> f32 {
    1.0
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            detect_member_changes: false,
            expand_class_members: false,
        }
    }
}

/// Root of a TOML document carrying a `[diff]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    diff: DiffConfig,
}

impl DiffConfig {
    /// Parse the `[diff]` table out of TOML text. A missing table yields
    /// the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.diff.normalized())
    }

    /// Threshold clamped into `0.0..=1.0`; NaN falls back to the default.
    pub fn threshold(&self) -> f32 {
        if self.similarity_threshold.is_nan() {
            default_similarity_threshold()
        } else {
            self.similarity_threshold.clamp(0.0, 1.0)
        }
    }

    fn normalized(mut self) -> Self {
        self.similarity_threshold = self.threshold();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiffConfig::default();
        assert_eq!(config.similarity_threshold, 1.0);
        assert!(!config.detect_member_changes);
        assert!(!config.expand_class_members);
    }

    #[test]
    fn test_from_toml_str() {
        let config = DiffConfig::from_toml_str(
            r#"
[diff]
similarity_threshold = 0.9
detect_member_changes = true
"#,
        )
        .unwrap();

        assert_eq!(config.similarity_threshold, 0.9);
        assert!(config.detect_member_changes);
        assert!(!config.expand_class_members);
    }

    #[test]
    fn test_missing_table_uses_defaults() {
        let config = DiffConfig::from_toml_str("").unwrap();
        assert_eq!(config, DiffConfig::default());
    }

    #[test]
    fn test_threshold_is_clamped() {
        let config = DiffConfig::from_toml_str("[diff]\nsimilarity_threshold = 3.5\n").unwrap();
        assert_eq!(config.similarity_threshold, 1.0);

        let config = DiffConfig {
            similarity_threshold: -1.0,
            ..Default::default()
        };
        assert_eq!(config.threshold(), 0.0);
    }

    #[test]
    fn test_invalid_toml() {
        let err = DiffConfig::from_toml_str("[diff]\nsimilarity_threshold = \"high\"\n").unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
