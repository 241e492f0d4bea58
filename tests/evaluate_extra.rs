use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use valdn::{ConfigError, Registry, RuleError, RuleExpr, Validator, Value, rules};

fn spec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn text(s: &str) -> Value {
    Value::from(serde_json::json!(s))
}

#[test]
fn rule_expression_splits_on_first_colon() {
    assert_eq!(
        RuleExpr::parse("regex:^a:b$"),
        RuleExpr {
            name: "regex",
            param: "^a:b$"
        }
    );
    assert_eq!(RuleExpr::parse("required").param, "");
    assert_eq!(RuleExpr::parse("min:3").to_string(), "min:3");
}

#[test]
fn evaluation_stops_at_first_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut registry = Registry::with_defaults();
    registry.register("count", move |_: &str, _: &Value, _: &str| -> Result<(), RuleError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let result = registry
        .evaluate("f", &text(""), &spec(&["count", "required", "count"]))
        .unwrap();
    assert_eq!(result.as_deref(), Some("f is required"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_expressions_are_skipped() {
    let registry = Registry::with_defaults();
    let result = registry
        .evaluate("f", &text("abc"), &spec(&["", "min:2", ""]))
        .unwrap();
    assert_eq!(result, None);
}

#[test]
fn empty_spec_passes() {
    let registry = Registry::new();
    assert_eq!(registry.evaluate("f", &Value::null(), &[]).unwrap(), None);
}

#[test]
fn unknown_rule_is_configuration_error() {
    let registry = Registry::new();
    let err = registry
        .evaluate("f", &text("x"), &spec(&["required"]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownRule { ref rule, .. } if rule == "required"));
}

#[test]
fn bad_parameter_is_configuration_error() {
    let registry = Registry::with_defaults();
    let err = registry
        .evaluate("age", &text("x"), &spec(&["min:lots"]))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::BadParameter {
            rule: "min".to_string(),
            param: "lots".to_string(),
            path: "age".to_string(),
            reason: "expected a number".to_string(),
        }
    );
}

#[test]
fn custom_rule_message_is_kept() {
    let mut registry = Registry::with_defaults();
    registry.register(
        "even",
        |path: &str, v: &Value, _: &str| -> Result<(), RuleError> {
            match v.as_f64() {
                Some(n) if n % 2.0 == 0.0 => Ok(()),
                _ => Err(RuleError::Invalid(format!("{} must be even", path))),
            }
        },
    );

    let validator = Validator::new().with_registry(registry);
    let errors = validator
        .validate_json(r#"{"n": 3, "m": 4}"#, &rules! { "*" => ["even"] })
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["n"], "n must be even");
}

#[test]
fn message_override_applies_to_failures_and_missing_fields() {
    let mut validator = Validator::new();
    validator
        .registry_mut()
        .set_message("required", "please fill in {field}")
        .set_message("min", "{field}: at least {param}");

    let rules = rules! {
        "name" => ["required"],
        "nick" => ["min:3"],
        "email" => ["required"],
    };
    let errors = validator
        .validate_json(r#"{"name": "", "nick": "ab"}"#, &rules)
        .unwrap();

    assert_eq!(errors["name"], "please fill in name");
    assert_eq!(errors["nick"], "nick: at least 3");
    assert_eq!(errors["email"], "please fill in email");
}

#[test]
fn registry_lookup() {
    let registry = Registry::with_defaults();
    for name in ["required", "min", "max", "email", "regex", "in"] {
        assert!(registry.contains(name), "missing built-in {}", name);
    }
    assert!(registry.get("nope").is_none());
    assert!(!Registry::new().contains("required"));
}

#[test]
fn annotation_separator_is_configurable() {
    let validator = Validator::new().with_config(
        valdn::Config::default()
            .with_tag_name("check")
            .with_tag_separator(';'),
    );
    let rec = Value::from(
        valdn::Record::new("Form")
            .tagged("Code", "abcdef", "check", "required;max:3")
            .tagged("Other", "", "valdn", "required"),
    );
    let errors = validator.validate_record(&rec, &rules! {}).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["Code"], "Code must be at most 3");
}

#[test]
fn config_loads_from_yaml() {
    let config = valdn::Config::from_yaml("tag_name: check\n").unwrap();
    assert_eq!(config.tag_name, "check");
    assert_eq!(config.tag_separator, '|');

    let validator = Validator::new().with_config(config);
    let rec = Value::from(valdn::Record::new("Form").tagged("Code", "", "check", "required"));
    let errors = validator.validate_record(&rec, &rules! {}).unwrap();
    assert_eq!(errors["Code"], "Code is required");

    assert!(matches!(
        valdn::Config::from_yaml("tag_name: [unclosed"),
        Err(ConfigError::Yaml(_))
    ));
}
