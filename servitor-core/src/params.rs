//! Service parameters

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while building params
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Params must be a JSON object
    #[error("params must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Failed to parse params from text
    #[error("failed to parse params: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable input mapping handed to a service
///
/// Opaque to the runner: it is passed to the contract and readable from the
/// service hooks, but never modified once the runner owns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add a key while building params
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Parse params from a JSON object string
    pub fn from_json_str(source: &str) -> Result<Self, ParamsError> {
        let value: Value = serde_json::from_str(source)?;
        Self::try_from(value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Check whether `key` is present with a non-null value
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(value) if !value.is_null())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Deserialize params into a typed input struct
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Params {
    type Error = ParamsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(ParamsError::NotAnObject("null")),
            Value::Bool(_) => Err(ParamsError::NotAnObject("boolean")),
            Value::Number(_) => Err(ParamsError::NotAnObject("number")),
            Value::String(_) => Err(ParamsError::NotAnObject("string")),
            Value::Array(_) => Err(ParamsError::NotAnObject("array")),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_and_getters() {
        let params = Params::new()
            .with("fqdn", "example.com")
            .with("years", 2)
            .with("renew", true);

        assert_eq!(params.get_str("fqdn"), Some("example.com"));
        assert_eq!(params.get_i64("years"), Some(2));
        assert_eq!(params.get_bool("renew"), Some(true));
        assert_eq!(params.get_str("years"), None);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_contains_ignores_null() {
        let params = Params::try_from(json!({ "a": 1, "b": null })).unwrap();
        assert!(params.contains("a"));
        assert!(!params.contains("b"));
        assert!(!params.contains("c"));
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        assert!(matches!(
            Params::try_from(json!([1, 2])),
            Err(ParamsError::NotAnObject("array"))
        ));
        assert!(matches!(
            Params::try_from(json!("x")),
            Err(ParamsError::NotAnObject("string"))
        ));
    }

    #[test]
    fn test_from_json_str() {
        let params = Params::from_json_str(r#"{"owner": "alice"}"#).unwrap();
        assert_eq!(params.get_str("owner"), Some("alice"));

        assert!(matches!(
            Params::from_json_str("not json"),
            Err(ParamsError::Parse(_))
        ));
        assert!(matches!(
            Params::from_json_str("42"),
            Err(ParamsError::NotAnObject("number"))
        ));
    }

    #[test]
    fn test_deserialize_into_struct() {
        #[derive(Debug, Deserialize)]
        struct Input {
            fqdn: String,
            years: u32,
        }

        let params = Params::new().with("fqdn", "example.com").with("years", 3);
        let input: Input = params.deserialize().unwrap();
        assert_eq!(input.fqdn, "example.com");
        assert_eq!(input.years, 3);
    }

    #[test]
    fn test_from_iterator() {
        let params: Params = vec![("a", json!(1)), ("b", json!("two"))]
            .into_iter()
            .collect();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
