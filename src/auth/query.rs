//! Request parameters and their canonical query-string form.
//!
//! The query hash in a signed token is computed over the canonical string, and
//! the same string is what goes on the wire for GET and DELETE requests, so the
//! two can never disagree.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::SigningError;

/// Ordered request parameters with unique keys.
///
/// Values are JSON scalars or arrays of scalars. Arrays are expanded into
/// repeated `key[]=value` pairs, which is how Upbit expects list parameters.
/// `null` values are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, Value)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from any value that serializes to a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, SigningError> {
        let value = serde_json::to_value(value)
            .map_err(|e| SigningError::Canonicalize(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Ok(Self::new()),
            other => Err(SigningError::Canonicalize(format!(
                "parameters must serialize to an object, got {other}"
            ))),
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut params = Self::new();
        for (key, value) in map {
            params.insert(key, value);
        }
        params
    }

    /// Insert a parameter, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a parameter only when a value is present.
    pub fn with_opt<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Look up a parameter by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether there are no non-null parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_null())
    }

    /// Number of parameters, including null ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the canonical query string.
    ///
    /// Keys keep their insertion order. Scalars are form-encoded; array values
    /// become `key[]=value` pairs with the brackets left literal, which is the
    /// form Upbit hashes on its side.
    pub fn to_query_string(&self) -> Result<String, SigningError> {
        let mut parts: Vec<String> = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let list_key = format!("{}[]", encode(key.trim_end_matches("[]")));
                    for item in items {
                        if let Some(s) = scalar_to_string(key, item)? {
                            parts.push(format!("{list_key}={}", encode(&s)));
                        }
                    }
                }
                scalar => {
                    if let Some(s) = scalar_to_string(key, scalar)? {
                        let pair = serde_urlencoded::to_string([(key.as_str(), s.as_str())])
                            .map_err(|e| SigningError::Canonicalize(e.to_string()))?;
                        parts.push(pair);
                    }
                }
            }
        }
        Ok(parts.join("&"))
    }

    /// Render the parameters as a JSON object body, skipping nulls.
    pub fn to_json_body(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.trim_end_matches("[]").to_string(), v.clone()))
            .collect();
        Value::Object(map)
    }
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

fn scalar_to_string(key: &str, value: &Value) -> Result<Option<String>, SigningError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(SigningError::Canonicalize(format!(
            "parameter `{key}` holds a nested value"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_string_keeps_insertion_order() {
        let params = QueryParams::new()
            .with("market", "KRW-BTC")
            .with("side", "bid")
            .with("volume", "0.01");
        assert_eq!(
            params.to_query_string().unwrap(),
            "market=KRW-BTC&side=bid&volume=0.01"
        );
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut params = QueryParams::new().with("a", 1).with("b", 2);
        params.insert("a", 3);
        assert_eq!(params.len(), 2);
        assert_eq!(params.to_query_string().unwrap(), "a=3&b=2");
    }

    #[test]
    fn test_arrays_expand_to_bracket_keys() {
        let params = QueryParams::new()
            .with("state", "done")
            .with("uuids", json!(["u1", "u2"]))
            .with("txids[]", json!(["t1"]));
        assert_eq!(
            params.to_query_string().unwrap(),
            "state=done&uuids[]=u1&uuids[]=u2&txids[]=t1"
        );
    }

    #[test]
    fn test_list_query_hashes_like_the_server() {
        let params = QueryParams::new()
            .with("state", "done")
            .with("uuids", json!(["u1", "u2"]));
        let query = params.to_query_string().unwrap();
        assert_eq!(
            crate::auth::query_hash(&query),
            crate::auth::query_hash("state=done&uuids[]=u1&uuids[]=u2")
        );
    }

    #[test]
    fn test_values_are_form_encoded() {
        let params = QueryParams::new()
            .with("to", "2024-01-01 09:00:00")
            .with("states", json!(["wait", "a&b"]));
        assert_eq!(
            params.to_query_string().unwrap(),
            "to=2024-01-01+09%3A00%3A00&states[]=wait&states[]=a%26b"
        );
    }

    #[test]
    fn test_nulls_are_skipped() {
        let params = QueryParams::new().with("uuid", Value::Null).with("identifier", "abc");
        assert_eq!(params.to_query_string().unwrap(), "identifier=abc");
        assert!(!params.is_empty());
        assert!(QueryParams::new().with("x", Value::Null).is_empty());
    }

    #[test]
    fn test_nested_object_cannot_be_canonicalized() {
        let params = QueryParams::new().with("filter", json!({ "a": 1 }));
        assert!(matches!(
            params.to_query_string(),
            Err(SigningError::Canonicalize(_))
        ));

        let nested = QueryParams::new().with("ids", json!([[1, 2]]));
        assert!(nested.to_query_string().is_err());
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Req {
            market: &'static str,
            count: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            to: Option<String>,
        }

        let params = QueryParams::from_serialize(&Req {
            market: "KRW-ETH",
            count: 5,
            to: None,
        })
        .unwrap();
        assert_eq!(params.get("market"), Some(&json!("KRW-ETH")));
        assert_eq!(params.get("to"), None);
        assert!(QueryParams::from_serialize(&42).is_err());
    }

    #[test]
    fn test_json_body_strips_list_suffix() {
        let params = QueryParams::new()
            .with("market", "KRW-BTC")
            .with("uuids[]", json!(["u1"]))
            .with("skip", Value::Null);
        assert_eq!(
            params.to_json_body(),
            json!({ "market": "KRW-BTC", "uuids": ["u1"] })
        );
    }
}
