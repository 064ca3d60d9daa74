//! Errors raised while decoding or encoding keyed containers

use thiserror::Error;

/// Errors that can occur during decoding/encoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodingError {
    /// The decoder was asked for a keyed container but holds something else
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("key `{key}` not found")]
    KeyNotFound { key: String },

    /// The key is present but `null` for a value that cannot be absent
    #[error("expected a value for key `{key}`, found null")]
    ValueNotFound { key: String },

    #[error("type mismatch for key `{key}`: {message}")]
    TypeMismatch { key: String, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Custom(String),
}

impl CodingError {
    /// Create a free-form error, for hand-written routines
    pub fn custom(message: impl std::fmt::Display) -> Self {
        CodingError::Custom(message.to_string())
    }

    /// Wire key the error is about, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            CodingError::KeyNotFound { key }
            | CodingError::ValueNotFound { key }
            | CodingError::TypeMismatch { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CodingError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CodingError::Custom(format!("invalid JSON: {err}"))
        } else {
            CodingError::Serialization(err.to_string())
        }
    }
}

/// Name of a JSON value's kind, for messages
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
