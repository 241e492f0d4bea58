//! Text → [`Value`] and text → [`Rules`] adapters.

use crate::error::ConfigError;
use crate::rules::Rules;
use crate::value::Value;

/// Parses JSON text into a [`Value`] of any kind.
pub fn parse_json(input: &str) -> Result<Value, ConfigError> {
    let json: serde_json::Value =
        serde_json::from_str(input).map_err(|e| ConfigError::Json(e.to_string()))?;
    Ok(Value::from(json))
}

/// Parses JSON text whose root must be an object.
pub fn parse_json_object(input: &str) -> Result<Value, ConfigError> {
    let value = parse_json(input)?;
    match value {
        Value::Map(_) => Ok(value),
        other => Err(ConfigError::TypeMismatch {
            path: String::new(),
            expected: "map",
            actual: other.kind().as_str(),
        }),
    }
}

/// Reads a rule table from a JSON object of `path → [rule, ...]`.
///
/// ```rust
/// let rules = valdn::parse::rules_from_json(r#"{"user.name": ["required", "min:2"]}"#).unwrap();
/// assert_eq!(rules["user.name"], vec!["required", "min:2"]);
/// ```
pub fn rules_from_json(input: &str) -> Result<Rules, ConfigError> {
    serde_json::from_str(input).map_err(|e| ConfigError::Json(e.to_string()))
}

/// Reads a rule table from a YAML mapping of `path → [rule, ...]`.
pub fn rules_from_yaml(input: &str) -> Result<Rules, ConfigError> {
    if input.trim().is_empty() {
        return Ok(Rules::new());
    }
    serde_saphyr::from_str(input).map_err(|e| ConfigError::Yaml(e.to_string()))
}
