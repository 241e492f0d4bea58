//! Declarative, path-keyed validation for nested data.
//!
//! A rule table maps field paths to ordered lists of rule expressions. The
//! validator walks a value (record, map, list or scalar), evaluates the rules
//! governing each path it reaches and returns a map of failures:
//!
//! ```text
//! (value, rules) → merge annotations → walk → report missing required → Errors
//! ```
//!
//! Paths are dotted: `user.name`, `tags.0`. A key `tags.*` governs every
//! direct child of `tags` that has no exact entry; `*` does the same for
//! top-level fields. When a node fails its own rules its children are not
//! checked, so each independent problem is reported once.
//!
//! # Quick Start
//!
//! ```rust
//! use valdn::rules;
//!
//! let rules = rules! {
//!     "user" => ["required"],
//!     "user.name" => ["required", "min:2"],
//!     "tags.*" => ["min:2"],
//! };
//!
//! let errors = valdn::validate_json(
//!     r#"{"user": {"name": "a"}, "tags": ["ok", "x"]}"#,
//!     &rules,
//! )
//! .expect("rules are well formed");
//!
//! assert_eq!(errors.len(), 2);
//! assert!(errors.contains_key("user.name"));
//! assert!(errors.contains_key("tags.1"));
//! ```
//!
//! Validation failures land in the returned [`Errors`] map. Misconfiguration
//! (an unregistered rule, an unusable parameter, an input of the wrong kind)
//! is reported as [`ConfigError`] instead.
//!
//! # Feature Flags
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `request` | yes     | HTTP request decoding via [`request::Request`] and [`validate_request`]. |

pub(crate) mod builtin;
pub mod config;
pub mod error;
pub mod parse;
pub mod path;
#[cfg(feature = "request")]
pub mod request;
pub mod rules;
pub mod session;
pub mod validator;
pub mod value;

pub use config::Config;
pub use error::{ConfigError, RuleError};
pub use rules::{Errors, Registry, Rule, RuleExpr, Rules};
pub use session::Session;
pub use validator::*;
pub use value::{Field, Kind, Record, Scalar, ToValue, Value};

#[cfg(feature = "request")]
pub use request::Request;

/// Builds a [`Rules`] table.
///
/// ```rust
/// let rules = valdn::rules! {
///     "email" => ["required", "email"],
///     "age" => ["min:18"],
/// };
/// assert_eq!(rules["age"], vec!["min:18".to_string()]);
/// ```
#[macro_export]
macro_rules! rules {
    ($($path:expr => [$($rule:expr),* $(,)?]),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut rules = $crate::Rules::new();
        $(
            rules.insert(
                ::std::string::String::from($path),
                ::std::vec![$(::std::string::String::from($rule)),*],
            );
        )*
        rules
    }};
}
