//! Arguments for a single endpoint invocation.

use serde::Serialize;
use serde_json::Value;

use crate::query::QueryParams;

/// Path parameters, query record and body for one call.
///
/// ```
/// use nexthara_client::CallArgs;
/// use serde_json::json;
///
/// let args = CallArgs::new()
///     .param("id", 42)
///     .query(&json!({"page": 2, "limit": 30}))
///     .unwrap()
///     .body(&json!({"status": "APPROVED"}))
///     .unwrap();
/// assert_eq!(args.path_params()[0], ("id".to_string(), "42".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    params: Vec<(String, String)>,
    query: QueryParams,
    body: Option<Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a call with a single `id` path parameter.
    pub fn id(id: impl ToString) -> Self {
        Self::new().param("id", id)
    }

    /// Set a path parameter, replacing an earlier value with the same name.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == name) {
            Some(existing) => existing.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// Add the fields of a parameter record to the query string.
    pub fn query<Q: Serialize + ?Sized>(mut self, record: &Q) -> crate::Result<Self> {
        let params = QueryParams::from_record(record)?;
        self.query.extend(params);
        Ok(self)
    }

    /// Use prebuilt query pairs.
    pub fn query_params(mut self, params: QueryParams) -> Self {
        self.query.extend(params);
        self
    }

    /// Set the JSON body.
    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> crate::Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set an already-built JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn path_params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn query_pairs(&self) -> &QueryParams {
        &self.query
    }

    pub fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Vec<(String, String)>, QueryParams, Option<Value>) {
        (self.params, self.query, self.body)
    }
}
