//! Error types for the codify engine

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by the key table generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyTableError {
    /// The type already declares a key table with the reserved name
    #[error("key table `{name}` already exists")]
    AlreadyExists { name: String },

    /// Annotation combinations that cannot be resolved; carries every diagnostic collected
    #[error("conflicting key annotations ({} diagnostics)", .0.len())]
    Conflict(Vec<Diagnostic>),
}

impl KeyTableError {
    /// Convert into the diagnostics reported to the user
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            KeyTableError::AlreadyExists { name } => {
                vec![Diagnostic::on_type(DiagnosticKind::KeyTableExists { name })]
            }
            KeyTableError::Conflict(diagnostics) => diagnostics,
        }
    }
}

/// Error loading a `codify.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration value: {0}")]
    Invalid(String),
}

/// Error rendering generated code
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("default value for `{field}` is not a valid expression: {source}")]
    InvalidExpression {
        field: String,
        #[source]
        source: syn::Error,
    },

    #[error("type `{text}` cannot be rendered: {source}")]
    InvalidType {
        text: String,
        #[source]
        source: syn::Error,
    },

    #[error("key table name `{0}` is not a valid identifier")]
    InvalidKeyTableName(String),
}

impl From<EmitError> for Diagnostic {
    fn from(err: EmitError) -> Self {
        Diagnostic::on_type(DiagnosticKind::Internal {
            detail: err.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
