//! Query-string construction from parameter records.

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// Ordered list of query pairs.
///
/// Built from any record that serializes to a JSON object. Null fields are
/// skipped, scalars become their text form, and arrays repeat the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a parameter record.
    ///
    /// Field order follows the record's serialization order for structs.
    /// Fails with [`Error::InvalidCall`] if the record is not a flat object.
    pub fn from_record<Q: Serialize + ?Sized>(record: &Q) -> Result<Self> {
        let value = serde_json::to_value(record)?;
        Self::from_value(&value)
    }

    /// Build from an already-serialized JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut params = Self::new();
        match value {
            Value::Null => {}
            Value::Object(map) => {
                for (key, value) in map {
                    params.push_value(key, value)?;
                }
            }
            other => {
                return Err(invalid(format!(
                    "query parameters must be an object, got {}",
                    kind(other)
                )))
            }
        }
        Ok(params)
    }

    fn push_value(&mut self, key: &str, value: &Value) -> Result<()> {
        match value {
            Value::Null => Ok(()),
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Array(_) | Value::Object(_) => {
                            return Err(invalid(format!("query parameter '{}' is nested", key)));
                        }
                        _ => self.push_value(key, item)?,
                    }
                }
                Ok(())
            }
            Value::Object(_) => Err(invalid(format!("query parameter '{}' is nested", key))),
            Value::String(s) => {
                self.push(key, s.as_str());
                Ok(())
            }
            Value::Bool(b) => {
                self.push(key, b.to_string());
                Ok(())
            }
            Value::Number(n) => {
                self.push(key, n.to_string());
                Ok(())
            }
        }
    }

    /// Append a single pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Append every pair of another parameter list.
    pub fn extend(&mut self, other: QueryParams) {
        self.pairs.extend(other.pairs);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Form-urlencoded rendering, without the leading `?`.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Append the pairs to a URL. An empty list leaves the URL untouched.
    pub fn apply_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(self.pairs.iter());
    }
}

fn invalid(reason: String) -> Error {
    Error::invalid_call("query", reason)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
