//! Top-level entry points.

use crate::config::Config;
use crate::error::ConfigError;
use crate::parse;
use crate::rules::{Errors, Registry, Rules};
use crate::session::Session;
use crate::value::{Kind, Value};
use std::sync::LazyLock;

#[cfg(feature = "request")]
use crate::request::Request;

static DEFAULT: LazyLock<Validator> = LazyLock::new(Validator::default);

/// A rule registry paired with annotation settings.
///
/// Each `validate_*` call runs in its own [`Session`], so a `Validator` can
/// be shared freely between threads.
#[derive(Clone, Debug)]
pub struct Validator {
    registry: Registry,
    config: Config,
}

impl Default for Validator {
    fn default() -> Self {
        Validator::new()
    }
}

impl Validator {
    /// Built-in rules and the default [`Config`].
    pub fn new() -> Self {
        Validator {
            registry: Registry::with_defaults(),
            config: Config::default(),
        }
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluates a single rule spec against one value.
    ///
    /// Returns the message of the first failing rule, or `None`.
    pub fn validate(
        &self,
        path: &str,
        value: &Value,
        spec: &[String],
    ) -> Result<Option<String>, ConfigError> {
        self.registry.evaluate(path, value, spec)
    }

    /// Validates a value of any kind against `rules`.
    ///
    /// A failing node hides its descendants; sibling subtrees are still
    /// checked. The caller's `rules` are never modified.
    pub fn validate_value(&self, value: &Value, rules: &Rules) -> Result<Errors, ConfigError> {
        let mut session = Session::new(&self.registry, &self.config, rules);
        session.run(value)?;
        Ok(session.into_errors())
    }

    /// Validates a [`Value::Record`], merging its field annotations.
    pub fn validate_record(&self, value: &Value, rules: &Rules) -> Result<Errors, ConfigError> {
        expect_kind(value, Kind::Record)?;
        self.validate_value(value, rules)
    }

    pub fn validate_map(&self, value: &Value, rules: &Rules) -> Result<Errors, ConfigError> {
        expect_kind(value, Kind::Map)?;
        self.validate_value(value, rules)
    }

    pub fn validate_list(&self, value: &Value, rules: &Rules) -> Result<Errors, ConfigError> {
        expect_kind(value, Kind::List)?;
        self.validate_value(value, rules)
    }

    /// Parses `input` as a JSON object and validates it.
    pub fn validate_json(&self, input: &str, rules: &Rules) -> Result<Errors, ConfigError> {
        let value = parse::parse_json_object(input)?;
        self.validate_value(&value, rules)
    }

    /// Decodes query and body of `request` and validates the merged map.
    #[cfg(feature = "request")]
    pub fn validate_request(&self, request: &Request, rules: &Rules) -> Result<Errors, ConfigError> {
        let value = request.to_value()?;
        self.validate_value(&value, rules)
    }
}

fn expect_kind(value: &Value, expected: Kind) -> Result<(), ConfigError> {
    if value.kind() == expected {
        Ok(())
    } else {
        Err(ConfigError::TypeMismatch {
            path: String::new(),
            expected: expected.as_str(),
            actual: value.kind().as_str(),
        })
    }
}

/// [`Validator::validate`] with the built-in rules.
pub fn validate(path: &str, value: &Value, spec: &[String]) -> Result<Option<String>, ConfigError> {
    DEFAULT.validate(path, value, spec)
}

/// [`Validator::validate_value`] with the built-in rules.
pub fn validate_value(value: &Value, rules: &Rules) -> Result<Errors, ConfigError> {
    DEFAULT.validate_value(value, rules)
}

/// [`Validator::validate_record`] with the built-in rules.
pub fn validate_record(value: &Value, rules: &Rules) -> Result<Errors, ConfigError> {
    DEFAULT.validate_record(value, rules)
}

/// [`Validator::validate_map`] with the built-in rules.
pub fn validate_map(value: &Value, rules: &Rules) -> Result<Errors, ConfigError> {
    DEFAULT.validate_map(value, rules)
}

/// [`Validator::validate_list`] with the built-in rules.
pub fn validate_list(value: &Value, rules: &Rules) -> Result<Errors, ConfigError> {
    DEFAULT.validate_list(value, rules)
}

/// [`Validator::validate_json`] with the built-in rules.
pub fn validate_json(input: &str, rules: &Rules) -> Result<Errors, ConfigError> {
    DEFAULT.validate_json(input, rules)
}

/// [`Validator::validate_request`] with the built-in rules.
#[cfg(feature = "request")]
pub fn validate_request(request: &Request, rules: &Rules) -> Result<Errors, ConfigError> {
    DEFAULT.validate_request(request, rules)
}
