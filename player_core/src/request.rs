//! Request and response types for the path-addressed interface

use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// String-keyed map used for both request fields and response data
pub type DataMap = serde_json::Map<String, Value>;

/// Kind of operation a request performs on its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
    List,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "read"),
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::List => write!(f, "list"),
        }
    }
}

/// An inbound request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub operation: Operation,
    /// Path relative to the backend mount, e.g. `alice/stats`
    pub path: String,
    /// Field values supplied with the request
    #[serde(default)]
    pub data: DataMap,
}

impl Request {
    pub fn new(operation: Operation, path: impl Into<String>) -> Self {
        Request {
            operation,
            path: path.into(),
            data: DataMap::new(),
        }
    }

    pub fn read(path: impl Into<String>) -> Self {
        Self::new(Operation::Read, path)
    }

    pub fn create(path: impl Into<String>) -> Self {
        Self::new(Operation::Create, path)
    }

    pub fn update(path: impl Into<String>) -> Self {
        Self::new(Operation::Update, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Operation::Delete, path)
    }

    pub fn list() -> Self {
        Self::new(Operation::List, "")
    }

    /// Add a field value
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Typed view over the supplied fields
    pub fn fields(&self) -> FieldData<'_> {
        FieldData { data: &self.data }
    }
}

/// Successful response carrying data
///
/// Handlers return `Option<Response>`; `None` means "no content".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub data: DataMap,
}

impl Response {
    pub fn new(data: DataMap) -> Self {
        Response { data }
    }

    /// Single key/value response
    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut data = DataMap::new();
        data.insert(key.into(), value.into());
        Response { data }
    }

    /// Listing response: `{"keys": [...]}`
    pub fn list(keys: Vec<String>) -> Self {
        Self::single("keys", keys)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Typed accessors for request fields
///
/// A field that is missing or `null` reads as `None`. A field of the wrong
/// type is an `InvalidArgument`.
#[derive(Debug, Clone, Copy)]
pub struct FieldData<'a> {
    data: &'a DataMap,
}

impl<'a> FieldData<'a> {
    pub fn new(data: &'a DataMap) -> Self {
        FieldData { data }
    }

    fn raw(&self, key: &str) -> Option<&'a Value> {
        self.data.get(key).filter(|v| !v.is_null())
    }

    /// String field
    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(PlayerError::InvalidArgument(format!(
                "field '{}' must be a string, got {}",
                key, other
            ))),
        }
    }

    /// Integer field; base-10 strings are accepted and parsed
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        let invalid = |v: &Value| {
            PlayerError::InvalidArgument(format!("field '{}' must be an integer, got {}", key, v))
        };
        let Some(value) = self.raw(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| invalid(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_field() {
        let request = Request::create("alice").with_field("class", "warrior");
        let fields = request.fields();
        assert_eq!(fields.get_string("class").unwrap().as_deref(), Some("warrior"));
        assert_eq!(fields.get_string("missing").unwrap(), None);
    }

    #[test]
    fn test_string_field_wrong_type() {
        let request = Request::create("alice").with_field("class", 7);
        assert!(matches!(
            request.fields().get_string("class"),
            Err(PlayerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_int_field_coercion() {
        let request = Request::create("alice")
            .with_field("a", 10)
            .with_field("b", "-42")
            .with_field("c", " 7 ")
            .with_field("d", Value::Null);
        let fields = request.fields();
        assert_eq!(fields.get_int("a").unwrap(), Some(10));
        assert_eq!(fields.get_int("b").unwrap(), Some(-42));
        assert_eq!(fields.get_int("c").unwrap(), Some(7));
        assert_eq!(fields.get_int("d").unwrap(), None);
    }

    #[test]
    fn test_int_field_rejects_non_integers() {
        let request = Request::create("alice")
            .with_field("float", 1.5)
            .with_field("word", "ten")
            .with_field("flag", true)
            .with_field("huge", json!(u64::MAX));
        let fields = request.fields();
        for key in ["float", "word", "flag", "huge"] {
            assert!(
                matches!(fields.get_int(key), Err(PlayerError::InvalidArgument(_))),
                "expected '{}' to be rejected",
                key
            );
        }
    }

    #[test]
    fn test_request_from_json() {
        let request: Request = serde_json::from_value(json!({
            "operation": "update",
            "path": "alice/stats",
            "data": {"strength": 5}
        }))
        .unwrap();
        assert_eq!(request.operation, Operation::Update);
        assert_eq!(request.fields().get_int("strength").unwrap(), Some(5));

        let list: Request =
            serde_json::from_value(json!({"operation": "list", "path": ""})).unwrap();
        assert!(list.data.is_empty());
    }

    #[test]
    fn test_list_response() {
        let response = Response::list(vec!["a".into(), "b".into()]);
        assert_eq!(response.get("keys"), Some(&json!(["a", "b"])));
    }
}
