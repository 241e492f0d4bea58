//! Rule registry and rule expression evaluation.
//!
//! A rule expression is `name` or `name:parameter`. An ordered list of them
//! (a rule spec) governs one path and is evaluated left to right, stopping at
//! the first failure.

use crate::builtin;
use crate::error::{ConfigError, RuleError};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Rule table: field path (exact or wildcard) → rule spec.
pub type Rules = HashMap<String, Vec<String>>;

/// Validation output: field path → message. Empty means valid.
pub type Errors = BTreeMap<String, String>;

/// Separator between a rule name and its parameter.
pub const PARAM_SEPARATOR: char = ':';

/// Name of the rule the completeness check looks for.
pub const REQUIRED: &str = "required";

/// A parsed rule expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleExpr<'a> {
    pub name: &'a str,
    pub param: &'a str,
}

impl<'a> RuleExpr<'a> {
    /// Splits on the first `:`; everything after it is the parameter, so
    /// parameters may themselves contain `:`.
    pub fn parse(expr: &'a str) -> Self {
        match expr.split_once(PARAM_SEPARATOR) {
            Some((name, param)) => RuleExpr { name, param },
            None => RuleExpr {
                name: expr,
                param: "",
            },
        }
    }
}

impl fmt::Display for RuleExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.param.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}{}{}", self.name, PARAM_SEPARATOR, self.param)
        }
    }
}

/// A validating function stored in a [`Registry`].
///
/// Receives the field path, the value found there (composites included) and
/// the rule parameter (empty if none was given).
pub trait Rule: Send + Sync {
    fn check(&self, path: &str, value: &Value, param: &str) -> Result<(), RuleError>;
}

impl<F> Rule for F
where
    F: Fn(&str, &Value, &str) -> Result<(), RuleError> + Send + Sync,
{
    fn check(&self, path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
        self(path, value, param)
    }
}

/// Name → rule lookup, plus per-rule message overrides.
#[derive(Clone, Default)]
pub struct Registry {
    rules: HashMap<String, Arc<dyn Rule>>,
    messages: HashMap<String, String>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.rules.keys().collect();
        names.sort();
        f.debug_struct("Registry")
            .field("rules", &names)
            .field("messages", &self.messages)
            .finish()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in rule set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Registers (or replaces) a rule under `name`.
    pub fn register(&mut self, name: impl Into<String>, rule: impl Rule + 'static) -> &mut Self {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.get(name).map(|r| r.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Overrides the failure message of `name`. The template may use
    /// `{field}` and `{param}` placeholders.
    pub fn set_message(&mut self, name: impl Into<String>, template: impl Into<String>) -> &mut Self {
        self.messages.insert(name.into(), template.into());
        self
    }

    /// Renders the message for a failure of `name` at `path`: the override
    /// if one is set, otherwise the built-in template.
    pub fn message(&self, name: &str, path: &str, param: &str) -> String {
        let template = self
            .messages
            .get(name)
            .map(String::as_str)
            .unwrap_or_else(|| builtin::default_template(name));
        render(template, path, param)
    }

    /// Runs `spec` against `value` at `path`.
    ///
    /// Returns `Ok(None)` when every expression passes and `Ok(Some(message))`
    /// for the first one that fails. Empty expressions are skipped.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownRule`] for an unregistered name and
    /// [`ConfigError::BadParameter`] when a rule rejects its parameter.
    pub fn evaluate(
        &self,
        path: &str,
        value: &Value,
        spec: &[String],
    ) -> Result<Option<String>, ConfigError> {
        for raw in spec {
            if raw.is_empty() {
                continue;
            }
            let expr = RuleExpr::parse(raw);
            let rule = self.get(expr.name).ok_or_else(|| ConfigError::UnknownRule {
                rule: expr.name.to_string(),
                path: path.to_string(),
            })?;

            match rule.check(path, value, expr.param) {
                Ok(()) => {}
                Err(RuleError::Invalid(message)) => {
                    tracing::trace!(path, rule = %expr, "rule failed");
                    let message = if self.messages.contains_key(expr.name) {
                        self.message(expr.name, path, expr.param)
                    } else {
                        message
                    };
                    return Ok(Some(message));
                }
                Err(RuleError::BadParameter { param, reason }) => {
                    return Err(ConfigError::BadParameter {
                        rule: expr.name.to_string(),
                        param,
                        path: path.to_string(),
                        reason,
                    });
                }
            }
        }
        Ok(None)
    }
}

/// Parameter of the first `required` expression in `spec`, if any.
pub(crate) fn required_param(spec: &[String]) -> Option<&str> {
    spec.iter()
        .map(|raw| RuleExpr::parse(raw))
        .find(|expr| expr.name == REQUIRED)
        .map(|expr| expr.param)
}

pub(crate) fn render(template: &str, path: &str, param: &str) -> String {
    let field = if path.is_empty() { "value" } else { path };
    template.replace("{field}", field).replace("{param}", param)
}
