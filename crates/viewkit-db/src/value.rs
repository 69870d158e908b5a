//! Dynamic field values.
//!
//! [`Value`] is what a [`Document`](crate::Document) exposes for each named
//! field. Views compare values against URL parameters, hand them to
//! templates, and encode them as JSON.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::object_id::ObjectId;

/// The named fields of a document, in key order.
pub type Fields = BTreeMap<String, Value>;

/// A dynamically typed field value.
///
/// # Examples
///
/// ```
/// use viewkit_db::Value;
///
/// assert_eq!(Value::from(42_i64), Value::Int(42));
/// assert!(Value::from("bar").matches_param("bar"));
/// assert!(Value::Int(3).matches_param("3"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A document identifier.
    ObjectId(ObjectId),
    /// A UTC timestamp.
    DateTime(DateTime<Utc>),
    /// An embedded document.
    Document(Fields),
    /// A list of values.
    List(Vec<Value>),
    /// Arbitrary JSON.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` for [`Value::Null`] and JSON `null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Json(serde_json::Value::Null))
    }

    /// Returns the string contents if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts to JSON.
    ///
    /// Ids become their hex string, timestamps RFC 3339 strings, embedded
    /// documents objects. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::ObjectId(id) => serde_json::Value::String(id.to_hex()),
            Self::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Self::Document(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Json(j) => j.clone(),
        }
    }

    /// Returns `true` if this value equals a raw URL parameter.
    ///
    /// URL parameters are strings, so the parameter is interpreted in this
    /// value's type: integers parse as `i64`, ids as hex, and so on. Null,
    /// documents and lists never match.
    pub fn matches_param(&self, param: &str) -> bool {
        match self {
            Self::String(s) => s == param,
            Self::Int(i) => param.parse::<i64>().is_ok_and(|p| p == *i),
            #[allow(clippy::float_cmp)]
            Self::Float(f) => param.parse::<f64>().is_ok_and(|p| p == *f),
            Self::Bool(b) => param.parse::<bool>().is_ok_and(|p| p == *b),
            Self::ObjectId(id) => param.parse::<ObjectId>().is_ok_and(|p| p == *id),
            Self::DateTime(dt) => {
                DateTime::parse_from_rfc3339(param).is_ok_and(|p| p == *dt)
            }
            Self::Json(serde_json::Value::String(s)) => s == param,
            Self::Json(j @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => {
                j.to_string() == param
            }
            Self::Null | Self::Document(_) | Self::List(_) | Self::Json(_) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::ObjectId(id) => write!(f, "{id}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Document(_) | Self::List(_) | Self::Json(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<ObjectId> for Value {
    fn from(v: ObjectId) -> Self {
        Self::ObjectId(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<Fields> for Value {
    fn from(v: Fields) -> Self {
        Self::Document(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_param_string() {
        assert!(Value::from("bar").matches_param("bar"));
        assert!(!Value::from("bar").matches_param("baz"));
    }

    #[test]
    fn test_matches_param_int() {
        assert!(Value::Int(4).matches_param("4"));
        assert!(!Value::Int(4).matches_param("four"));
    }

    #[test]
    fn test_matches_param_object_id() {
        let id: ObjectId = "507f1f77bcf86cd799439011".parse().unwrap();
        assert!(Value::ObjectId(id).matches_param("507f1f77bcf86cd799439011"));
        assert!(!Value::ObjectId(id).matches_param("not-an-id"));
    }

    #[test]
    fn test_matches_param_bool_and_null() {
        assert!(Value::Bool(true).matches_param("true"));
        assert!(!Value::Null.matches_param(""));
        assert!(!Value::List(vec![]).matches_param("[]"));
    }

    #[test]
    fn test_to_json_nested() {
        let id: ObjectId = "507f1f77bcf86cd799439011".parse().unwrap();
        let mut inner = Fields::new();
        inner.insert("city".into(), Value::from("Oslo"));
        let value = Value::List(vec![Value::ObjectId(id), Value::Document(inner), Value::Null]);
        assert_eq!(
            value.to_json(),
            serde_json::json!(["507f1f77bcf86cd799439011", {"city": "Oslo"}, null])
        );
    }

    #[test]
    fn test_to_json_nan_is_null() {
        assert_eq!(Value::Float(f64::NAN).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("user10").to_string(), "user10");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(7).to_string(), "7");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
