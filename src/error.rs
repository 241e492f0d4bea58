use thiserror::Error;

/// A fatal misconfiguration detected while validating.
///
/// Configuration errors abort the whole call and are never recorded in the
/// [`Errors`](crate::Errors) map: they signal a programming mistake (an
/// unregistered rule, an unusable rule parameter, an input of the wrong
/// shape) rather than bad user data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A rule expression references a name the registry does not know.
    #[error("unknown rule '{rule}' at '{path}'")]
    UnknownRule { rule: String, path: String },

    /// A registered rule was given a parameter it cannot interpret.
    #[error("rule '{rule}' at '{path}' has invalid parameter '{param}': {reason}")]
    BadParameter {
        rule: String,
        param: String,
        path: String,
        reason: String,
    },

    /// The value handed to an entry point is not of the kind it validates.
    #[error("error validating '{path}': expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Input text could not be parsed as JSON.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// Input text could not be parsed as YAML.
    #[error("invalid YAML: {0}")]
    Yaml(String),

    /// A request body does not match its declared content type.
    #[error("invalid request body: {0}")]
    Request(String),
}

/// Outcome of a single rule check that did not pass.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The value violates the rule; the message is user-facing.
    #[error("{0}")]
    Invalid(String),

    /// The rule parameter is unusable (e.g. `min:abc`, `regex:(`).
    #[error("invalid parameter '{param}': {reason}")]
    BadParameter { param: String, reason: String },
}

impl RuleError {
    pub(crate) fn bad_parameter(param: &str, reason: impl Into<String>) -> Self {
        RuleError::BadParameter {
            param: param.to_string(),
            reason: reason.into(),
        }
    }
}
