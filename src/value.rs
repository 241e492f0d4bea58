//! Canonical value model consumed by the validator.
//!
//! Native data, decoded JSON and decoded request bodies are all converted to
//! [`Value`] before validation. Only [`Value::Record`], [`Value::Map`] and
//! [`Value::List`] have children; everything else is a [`Scalar`] leaf.

use std::collections::{BTreeMap, HashMap};

/// A leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

/// A node in a validated structure.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    /// Fixed-shape value whose field set comes from its type.
    Record(Record),
    /// Entries named at runtime.
    Map(BTreeMap<String, Value>),
    /// Entries addressed by index.
    List(Vec<Value>),
}

/// Discriminant of a [`Value`], used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Scalar,
    Record,
    Map,
    List,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Scalar => "scalar",
            Kind::Record => "record",
            Kind::Map => "map",
            Kind::List => "list",
        }
    }
}

/// A record: a named shape with statically known fields.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Record {
    pub type_name: String,
    pub fields: Vec<Field>,
}

/// One field of a [`Record`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
    /// Declarative annotations keyed by attribute name (e.g. `valdn`).
    pub tags: BTreeMap<String, String>,
    /// Non-exported fields are skipped by traversal.
    pub exported: bool,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Record {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds an exported field without annotations.
    pub fn field(mut self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.to_value(),
            tags: BTreeMap::new(),
            exported: true,
        });
        self
    }

    /// Adds an exported field carrying one annotation under `key`.
    pub fn tagged(
        mut self,
        name: impl Into<String>,
        value: impl ToValue,
        key: impl Into<String>,
        annotation: impl Into<String>,
    ) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert(key.into(), annotation.into());
        self.fields.push(Field {
            name: name.into(),
            value: value.to_value(),
            tags,
            exported: true,
        });
        self
    }

    /// Adds a field that traversal does not visit.
    pub fn private(mut self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.to_value(),
            tags: BTreeMap::new(),
            exported: false,
        });
        self
    }

    /// Fields traversal visits.
    pub fn exported(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.exported)
    }
}

impl Field {
    /// Returns the annotation under `key`, if present and non-empty.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|a| !a.is_empty())
    }
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Scalar(_) => Kind::Scalar,
            Value::Record(_) => Kind::Record,
            Value::Map(_) => Kind::Map,
            Value::List(_) => Kind::List,
        }
    }

    pub fn is_composite(&self) -> bool {
        !matches!(self, Value::Scalar(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of a scalar. Strings are not coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Scalar(Scalar::Int(i)) => Some(*i as f64),
            Value::Scalar(Scalar::UInt(u)) => Some(*u as f64),
            Value::Scalar(Scalar::Float(f)) => Some(*f),
            _ => None,
        }
    }

    /// Size used by length-style rules: characters for strings, entry count
    /// for composites. Records count exported fields only. Other scalars have
    /// no length.
    pub fn size(&self) -> Option<usize> {
        match self {
            Value::Scalar(Scalar::Str(s)) => Some(s.chars().count()),
            Value::Record(r) => Some(r.exported().count()),
            Value::Map(m) => Some(m.len()),
            Value::List(l) => Some(l.len()),
            Value::Scalar(_) => None,
        }
    }

    /// Renders a scalar the way it would appear in a form field.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Scalar(Scalar::Str(s)) => Some(s.clone()),
            Value::Scalar(Scalar::Bool(b)) => Some(b.to_string()),
            Value::Scalar(Scalar::Int(i)) => Some(i.to_string()),
            Value::Scalar(Scalar::UInt(u)) => Some(u.to_string()),
            Value::Scalar(Scalar::Float(f)) => Some(f.to_string()),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Value::null(),
            Json::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Scalar(Scalar::UInt(u))
                } else {
                    Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Json::String(s) => Value::Scalar(Scalar::Str(s)),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

/// Conversion from native Rust data into the canonical [`Value`] model.
///
/// Implement this for your own types to validate them as records:
///
/// ```rust
/// use valdn::{Record, ToValue, Value};
///
/// struct Signup { email: String, age: u32 }
///
/// impl ToValue for Signup {
///     fn to_value(&self) -> Value {
///         Record::new("Signup")
///             .tagged("Email", &self.email, "valdn", "required|email")
///             .tagged("Age", self.age, "valdn", "min:18")
///             .into()
///     }
/// }
/// ```
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for Record {
    fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Bool(*self))
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Str(self.to_string()))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Str(self.clone()))
    }
}

macro_rules! signed_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Scalar(Scalar::Int(i64::from(*self)))
            }
        })*
    };
}

macro_rules! unsigned_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Scalar(Scalar::UInt(u64::from(*self)))
            }
        })*
    };
}

signed_to_value!(i8, i16, i32, i64);
unsigned_to_value!(u8, u16, u32, u64);

impl ToValue for isize {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Int(*self as i64))
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::UInt(*self as u64))
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Float(f64::from(*self)))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Float(*self))
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::null(),
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for HashMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}
