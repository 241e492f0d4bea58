//! Built-in rule set loaded by [`Registry::with_defaults`].
//!
//! Only `required` enforces presence: every other rule accepts null.

use crate::error::RuleError;
use crate::rules::{Registry, render};
use crate::value::{Scalar, Value};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").unwrap()
});

pub(crate) fn register_all(registry: &mut Registry) {
    registry
        .register("required", required)
        .register("min", min)
        .register("max", max)
        .register("len", len)
        .register("between", between)
        .register("email", email)
        .register("url", web_url)
        .register("numeric", numeric)
        .register("integer", integer)
        .register("alpha", alpha)
        .register("alpha_num", alpha_num)
        .register("in", one_of)
        .register("not_in", not_one_of)
        .register("regex", pattern)
        .register("bool", boolean);
}

/// Message template for a built-in rule. Unknown names get a generic text.
pub(crate) fn default_template(name: &str) -> &'static str {
    match name {
        "required" => "{field} is required",
        "min" => "{field} must be at least {param}",
        "max" => "{field} must be at most {param}",
        "len" => "{field} must have a length of {param}",
        "between" => "{field} must be between {param}",
        "email" => "{field} must be a valid email address",
        "url" => "{field} must be a valid URL",
        "numeric" => "{field} must be numeric",
        "integer" => "{field} must be an integer",
        "alpha" => "{field} may only contain letters",
        "alpha_num" => "{field} may only contain letters and digits",
        "in" => "{field} must be one of: {param}",
        "not_in" => "{field} must not be one of: {param}",
        "regex" => "{field} has an invalid format",
        "bool" => "{field} must be a boolean",
        "measurable" => "{field} must be a number, string or collection",
        _ => "{field} is invalid",
    }
}

fn invalid(name: &str, path: &str, param: &str) -> RuleError {
    RuleError::Invalid(render(default_template(name), path, param))
}

fn check(ok: bool, name: &str, path: &str, param: &str) -> Result<(), RuleError> {
    if ok {
        Ok(())
    } else {
        Err(invalid(name, path, param))
    }
}

fn number_param(param: &str) -> Result<f64, RuleError> {
    param
        .trim()
        .parse::<f64>()
        .map_err(|_| RuleError::bad_parameter(param, "expected a number"))
}

/// Numbers measure as themselves; strings and composites by length.
fn measure(value: &Value) -> Option<f64> {
    value.as_f64().or_else(|| value.size().map(|n| n as f64))
}

fn list_param(param: &str) -> impl Iterator<Item = &str> {
    param.split(',').map(str::trim)
}

fn required(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    let empty = match value {
        Value::Scalar(Scalar::Null) => true,
        Value::Scalar(Scalar::Str(s)) => s.is_empty(),
        Value::Map(m) => m.is_empty(),
        Value::List(l) => l.is_empty(),
        Value::Record(r) => r.exported().next().is_none(),
        Value::Scalar(_) => false,
    };
    check(!empty, "required", path, param)
}

fn bounded(
    name: &str,
    path: &str,
    value: &Value,
    param: &str,
    accept: impl Fn(f64) -> bool,
) -> Result<(), RuleError> {
    if value.is_null() {
        return Ok(());
    }
    match measure(value) {
        Some(size) => check(accept(size), name, path, param),
        None => Err(invalid("measurable", path, param)),
    }
}

fn min(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    let limit = number_param(param)?;
    bounded("min", path, value, param, |size| size >= limit)
}

fn max(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    let limit = number_param(param)?;
    bounded("max", path, value, param, |size| size <= limit)
}

fn len(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    let expected = param
        .trim()
        .parse::<usize>()
        .map_err(|_| RuleError::bad_parameter(param, "expected a non-negative integer"))?;
    if value.is_null() {
        return Ok(());
    }
    match value.size() {
        Some(n) => check(n == expected, "len", path, param),
        None => Err(invalid("measurable", path, param)),
    }
}

fn between(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    let (lo, hi) = param
        .split_once(',')
        .ok_or_else(|| RuleError::bad_parameter(param, "expected 'min,max'"))?;
    let (lo, hi) = (number_param(lo)?, number_param(hi)?);
    if lo > hi {
        return Err(RuleError::bad_parameter(param, "lower bound exceeds upper bound"));
    }
    bounded("between", path, value, param, |size| size >= lo && size <= hi)
}

/// Applies `accept` to the string form of a scalar; non-text values fail.
fn textual(
    name: &str,
    path: &str,
    value: &Value,
    param: &str,
    accept: impl Fn(&str) -> bool,
) -> Result<(), RuleError> {
    if value.is_null() {
        return Ok(());
    }
    match value.to_text() {
        Some(text) => check(accept(&text), name, path, param),
        None => Err(invalid(name, path, param)),
    }
}

fn email(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    match value.as_str() {
        Some(s) => check(EMAIL_RE.is_match(s), "email", path, param),
        None if value.is_null() => Ok(()),
        None => Err(invalid("email", path, param)),
    }
}

fn web_url(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    match value.as_str() {
        Some(s) => {
            let ok = url::Url::parse(s).is_ok_and(|u| u.has_host());
            check(ok, "url", path, param)
        }
        None if value.is_null() => Ok(()),
        None => Err(invalid("url", path, param)),
    }
}

fn numeric(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    if value.as_f64().is_some() {
        return Ok(());
    }
    textual("numeric", path, value, param, |s| s.trim().parse::<f64>().is_ok())
}

fn integer(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    match value {
        Value::Scalar(Scalar::Int(_) | Scalar::UInt(_)) => Ok(()),
        Value::Scalar(Scalar::Float(f)) => check(f.fract() == 0.0, "integer", path, param),
        _ => textual("integer", path, value, param, |s| s.trim().parse::<i64>().is_ok()),
    }
}

fn alpha(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    match value.as_str() {
        Some(s) => check(s.chars().all(char::is_alphabetic), "alpha", path, param),
        None if value.is_null() => Ok(()),
        None => Err(invalid("alpha", path, param)),
    }
}

fn alpha_num(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    match value.as_str() {
        Some(s) => check(s.chars().all(char::is_alphanumeric), "alpha_num", path, param),
        None if value.is_null() => Ok(()),
        None => Err(invalid("alpha_num", path, param)),
    }
}

fn one_of(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    textual("in", path, value, param, |s| list_param(param).any(|p| p == s))
}

fn not_one_of(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    textual("not_in", path, value, param, |s| list_param(param).all(|p| p != s))
}

fn pattern(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    let re = Regex::new(param).map_err(|e| RuleError::bad_parameter(param, e.to_string()))?;
    textual("regex", path, value, param, |s| re.is_match(s))
}

fn boolean(path: &str, value: &Value, param: &str) -> Result<(), RuleError> {
    match value {
        Value::Scalar(Scalar::Bool(_)) => Ok(()),
        _ => textual("bool", path, value, param, |s| {
            matches!(s, "true" | "false" | "1" | "0")
        }),
    }
}
