//! Query validation.
//!
//! Adapters format identifiers as strings (zero padding, prefixes), so a
//! non-string identifier is a caller bug. It is rejected here, before any
//! request is built, rather than encoded as a fetch outcome.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("query must be a string, found {found}")]
    TypeMismatch { found: &'static str },
    #[error("query is empty")]
    Empty,
    #[error("query {0:?} contains control characters")]
    Malformed(String),
}

/// A validated standard identifier, e.g. `D92`, `60076-10-1`, `TS EN 60422`.
///
/// Holds the identifier exactly as submitted; records echo it back verbatim.
/// Requests are built from [`Query::trimmed`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(QueryError::Malformed(trimmed.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, QueryError> {
        use serde_json::Value;
        let found = match value {
            Value::String(s) => return Self::parse(s),
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_f64() => "float",
            Value::Number(_) => "integer",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Err(QueryError::TypeMismatch { found })
    }

    pub fn from_toml(value: &toml::Value) -> Result<Self, QueryError> {
        use toml::Value;
        let found = match value {
            Value::String(s) => return Self::parse(s),
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Datetime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        };
        Err(QueryError::TypeMismatch { found })
    }

    /// The identifier as submitted.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier without surrounding whitespace, for building requests.
    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
