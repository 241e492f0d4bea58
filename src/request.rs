//! Decoding of HTTP request payloads into a [`Value::Map`].
//!
//! Query parameters are read first, then the body according to its content
//! type. Supported bodies: `application/json`, `application/x-www-form-urlencoded`
//! and `multipart/form-data`. Other content types contribute nothing.

use crate::error::ConfigError;
use crate::value::{Scalar, Value};
use std::collections::BTreeMap;

/// The parts of an HTTP request the validator reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    pub content_type: Option<String>,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the canonical map for this request.
    ///
    /// A key that occurs once maps to a string; repeated keys collect into a
    /// list. JSON body members replace query parameters of the same name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Request`] when the body does not match its content type.
    pub fn to_map(&self) -> Result<BTreeMap<String, Value>, ConfigError> {
        let mut fields = BTreeMap::new();

        if let Some(query) = self.query.as_deref() {
            let query = query.strip_prefix('?').unwrap_or(query);
            decode_urlencoded(query.as_bytes(), &mut fields);
        }

        let Some(content_type) = self.content_type.as_deref() else {
            return Ok(fields);
        };
        let (essence, params) = split_content_type(content_type);

        match essence.as_str() {
            "application/json" => decode_json(&self.body, &mut fields)?,
            "application/x-www-form-urlencoded" => decode_urlencoded(&self.body, &mut fields),
            "multipart/form-data" => {
                let boundary = params
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case("boundary"))
                    .map(|(_, v)| v.as_str())
                    .filter(|b| !b.is_empty())
                    .ok_or_else(|| {
                        ConfigError::Request("multipart body without boundary".to_string())
                    })?;
                decode_multipart(&self.body, boundary, &mut fields)?;
            }
            other => {
                tracing::debug!(content_type = other, "ignoring body of unsupported content type");
            }
        }

        Ok(fields)
    }

    pub fn to_value(&self) -> Result<Value, ConfigError> {
        self.to_map().map(Value::Map)
    }
}

/// Lower-cased media type plus its `key=value` parameters.
fn split_content_type(content_type: &str) -> (String, Vec<(String, String)>) {
    let mut parts = split_params(content_type).into_iter();
    let essence = parts.next().unwrap_or("").trim().to_ascii_lowercase();
    let params = parts.filter_map(parse_param).collect();
    (essence, params)
}

/// Splits a header value on `;`, leaving separators inside quoted strings
/// alone.
fn split_params(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn parse_param(raw: &str) -> Option<(String, String)> {
    let (key, value) = raw.trim().split_once('=')?;
    let value = value.trim();
    let value = match value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        Some(inner) => unquote(inner),
        None => value.to_string(),
    };
    Some((key.trim().to_string(), value))
}

/// Resolves `\x` escapes inside a quoted string.
fn unquote(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn append(fields: &mut BTreeMap<String, Value>, key: String, value: Value) {
    match fields.remove(&key) {
        None => {
            fields.insert(key, value);
        }
        Some(Value::List(mut items)) => {
            items.push(value);
            fields.insert(key, Value::List(items));
        }
        Some(existing) => {
            fields.insert(key, Value::List(vec![existing, value]));
        }
    }
}

fn decode_urlencoded(input: &[u8], fields: &mut BTreeMap<String, Value>) {
    for (key, value) in url::form_urlencoded::parse(input) {
        append(
            fields,
            key.into_owned(),
            Value::Scalar(Scalar::Str(value.into_owned())),
        );
    }
}

fn decode_json(body: &[u8], fields: &mut BTreeMap<String, Value>) -> Result<(), ConfigError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }
    let json: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ConfigError::Request(format!("malformed JSON body: {}", e)))?;
    match Value::from(json) {
        Value::Map(members) => {
            fields.extend(members);
            Ok(())
        }
        other => Err(ConfigError::Request(format!(
            "JSON body must be an object, got {}",
            other.kind().as_str()
        ))),
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

fn decode_multipart(
    body: &[u8],
    boundary: &str,
    fields: &mut BTreeMap<String, Value>,
) -> Result<(), ConfigError> {
    // Every delimiter, including the first, is preceded by CRLF.
    let mut data = b"\r\n".to_vec();
    data.extend_from_slice(body);
    let delimiter = format!("\r\n--{}", boundary).into_bytes();

    let mut pos = find(&data, &delimiter, 0)
        .ok_or_else(|| ConfigError::Request("multipart boundary not found".to_string()))?;

    loop {
        let after = pos + delimiter.len();
        let rest = &data[after..];
        if rest.starts_with(b"--") {
            return Ok(());
        }
        // Transport padding may sit between the boundary and its CRLF.
        let padding = rest.iter().take_while(|&&b| b == b' ' || b == b'\t').count();
        if !rest[padding..].starts_with(b"\r\n") {
            return Err(ConfigError::Request(
                "malformed multipart delimiter".to_string(),
            ));
        }
        let start = after + padding + 2;
        let end = find(&data, &delimiter, start)
            .ok_or_else(|| ConfigError::Request("unterminated multipart body".to_string()))?;
        decode_part(&data[start..end], fields)?;
        pos = end;
    }
}

fn decode_part(part: &[u8], fields: &mut BTreeMap<String, Value>) -> Result<(), ConfigError> {
    let split = find(part, b"\r\n\r\n", 0)
        .ok_or_else(|| ConfigError::Request("multipart part without headers".to_string()))?;
    let headers = std::str::from_utf8(&part[..split])
        .map_err(|_| ConfigError::Request("multipart headers are not UTF-8".to_string()))?;
    let content = &part[split + 4..];

    let mut disposition = Vec::new();
    let mut content_type = None;
    for line in headers.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("content-disposition") {
            disposition = split_params(value).into_iter().filter_map(parse_param).collect();
        } else if name.trim().eq_ignore_ascii_case("content-type") {
            content_type = Some(value.trim().to_string());
        }
    }

    let lookup = |key: &str| {
        disposition
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.clone())
    };
    let name = lookup("name")
        .ok_or_else(|| ConfigError::Request("multipart part without a name".to_string()))?;

    let value = match lookup("filename") {
        Some(filename) => {
            let mut file = BTreeMap::new();
            file.insert("filename".to_string(), Value::Scalar(Scalar::Str(filename)));
            file.insert(
                "content_type".to_string(),
                content_type
                    .map(|ct| Value::Scalar(Scalar::Str(ct)))
                    .unwrap_or_else(Value::null),
            );
            file.insert(
                "size".to_string(),
                Value::Scalar(Scalar::UInt(content.len() as u64)),
            );
            Value::Map(file)
        }
        None => {
            let text = String::from_utf8(content.to_vec()).map_err(|_| {
                ConfigError::Request(format!("multipart field '{}' is not UTF-8", name))
            })?;
            Value::Scalar(Scalar::Str(text))
        }
    };

    append(fields, name, value);
    Ok(())
}
