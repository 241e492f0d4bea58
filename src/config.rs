//! Validator configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Settings for reading declarative field annotations.
///
/// Passed explicitly to every session; there is no global state.
///
/// ```rust
/// let config = valdn::Config::from_json(r#"{"tag_name": "rules", "tag_separator": ";"}"#).unwrap();
/// assert_eq!(config.tag_name, "rules");
/// assert_eq!(config.tag_separator, ';');
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Annotation key holding a field's rule spec.
    pub tag_name: String,
    /// Separator between rule expressions inside an annotation.
    pub tag_separator: char,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_name: "valdn".to_string(),
            tag_separator: '|',
        }
    }
}

impl Config {
    pub fn with_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    pub fn with_tag_separator(mut self, separator: char) -> Self {
        self.tag_separator = separator;
        self
    }

    /// Splits an annotation into a rule spec.
    pub fn split_annotation(&self, annotation: &str) -> Vec<String> {
        annotation
            .split(self.tag_separator)
            .map(str::to_string)
            .collect()
    }

    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(input).map_err(|e| ConfigError::Yaml(e.to_string()))
    }

    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(|e| ConfigError::Json(e.to_string()))
    }
}
