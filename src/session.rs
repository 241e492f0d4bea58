//! A single validation pass.
//!
//! A [`Session`] owns a private copy of the rule table, the error map and the
//! set of visited paths. It runs in three phases:
//!
//! ```text
//! merge_annotations → walk → check_missing_required
//! ```
//!
//! Annotations only fill paths the caller left unconfigured. The walk
//! evaluates each node's own rules before its children and stops descending
//! below a node that fails. The final phase reports `required` paths that the
//! walk never reached.

use crate::config::Config;
use crate::error::ConfigError;
use crate::path;
use crate::rules::{self, Errors, REQUIRED, Registry, Rules};
use crate::value::Value;
use std::collections::HashSet;

/// State for one top-level validation call.
#[derive(Debug)]
pub struct Session<'a> {
    registry: &'a Registry,
    config: &'a Config,
    rules: Rules,
    errors: Errors,
    visited: HashSet<String>,
}

impl<'a> Session<'a> {
    /// Creates a session over a deep copy of `rules`.
    pub fn new(registry: &'a Registry, config: &'a Config, rules: &Rules) -> Self {
        Session {
            registry,
            config,
            rules: rules.clone(),
            errors: Errors::new(),
            visited: HashSet::new(),
        }
    }

    /// The session's rule table, including merged annotations.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Paths reached by the walk. The root (`""`) is always present once
    /// the walk has started.
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Runs all three phases against `value`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ConfigError`] raised by rule evaluation; the
    /// partially filled error map is then meaningless.
    pub fn run(&mut self, value: &Value) -> Result<(), ConfigError> {
        let _span = tracing::debug_span!("validate", kind = value.kind().as_str()).entered();

        self.merge_annotations(value, "");
        self.visited.insert(String::new());
        self.dispatch(value, "")?;
        self.check_missing_required();

        tracing::debug!(errors = self.errors.len(), "validation finished");
        Ok(())
    }

    /// Consumes the session, yielding its error map.
    pub fn into_errors(self) -> Errors {
        self.errors
    }

    /// Inserts annotation-derived specs for every record field under `parent`
    /// that has no entry yet. Maps and lists are only descended through the
    /// composite entries they actually hold.
    pub fn merge_annotations(&mut self, value: &Value, parent: &str) {
        match value {
            Value::Record(record) => {
                for field in &record.fields {
                    let name = path::join(parent, &field.name);
                    if !self.rules.contains_key(&name)
                        && let Some(annotation) = field.annotation(&self.config.tag_name)
                    {
                        let spec = self.config.split_annotation(annotation);
                        tracing::trace!(path = %name, annotation, "merged annotation");
                        self.rules.insert(name.clone(), spec);
                    }
                    if field.value.is_composite() {
                        self.merge_annotations(&field.value, &name);
                    }
                }
            }
            Value::Map(entries) => {
                for (key, child) in entries {
                    if child.is_composite() {
                        self.merge_annotations(child, &path::join(parent, key));
                    }
                }
            }
            Value::List(items) => {
                for (idx, child) in items.iter().enumerate() {
                    if child.is_composite() {
                        self.merge_annotations(child, &path::join(parent, &idx.to_string()));
                    }
                }
            }
            Value::Scalar(_) => {}
        }
    }

    /// Evaluates the rules governing `name`, then, if they pass and the
    /// value is composite, visits its children.
    fn dispatch(&mut self, value: &Value, name: &str) -> Result<(), ConfigError> {
        let spec = path::resolve(&self.rules, name);
        if let Some(message) = self.registry.evaluate(name, value, spec)? {
            self.add_error(name, message);
            return Ok(());
        }

        match value {
            Value::Record(record) => {
                tracing::trace!(path = %name, record = %record.type_name, "descend into record");
                for field in record.exported() {
                    self.visit(&field.value, path::join(name, &field.name))?;
                }
            }
            Value::Map(entries) => {
                for (key, child) in entries {
                    self.visit(child, path::join(name, key))?;
                }
            }
            Value::List(items) => {
                for (idx, child) in items.iter().enumerate() {
                    self.visit(child, path::join(name, &idx.to_string()))?;
                }
            }
            Value::Scalar(_) => {}
        }
        Ok(())
    }

    fn visit(&mut self, value: &Value, name: String) -> Result<(), ConfigError> {
        tracing::trace!(path = %name, kind = value.kind().as_str(), "visit");
        self.visited.insert(name.clone());
        self.dispatch(value, &name)
    }

    fn add_error(&mut self, name: &str, message: String) {
        self.errors.entry(name.to_string()).or_insert(message);
    }

    /// Reports `required` paths the walk never reached.
    ///
    /// Wildcard keys are skipped: they only govern children that exist. Paths
    /// below a node that already failed are skipped too, since the walk
    /// deliberately did not descend there.
    pub fn check_missing_required(&mut self) {
        let mut missing = Vec::new();
        for (name, spec) in &self.rules {
            if path::is_wildcard(name)
                || self.visited.contains(name)
                || self.errors.contains_key(name)
                || self.errors.keys().any(|failed| path::is_descendant(name, failed))
            {
                continue;
            }
            if let Some(param) = rules::required_param(spec) {
                missing.push((name.clone(), self.registry.message(REQUIRED, name, param)));
            }
        }

        for (name, message) in missing {
            tracing::debug!(path = %name, "required field absent");
            self.errors.insert(name, message);
        }
    }
}
