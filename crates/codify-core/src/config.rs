//! Generator configuration (`codify.toml`)

use crate::diagnostic::Severity;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by every type expanded in a crate.
///
/// ```toml
/// key_table_suffix = "Keys"
/// advisory_severity = "error"
/// serde_bridge = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// The reserved key table name is `<Type><suffix>`
    #[serde(default = "default_key_table_suffix")]
    pub key_table_suffix: String,

    /// Severity of advisories such as a custom key shadowing a case style.
    ///
    /// `error` turns them into conflicts that abort the type.
    #[serde(default = "default_advisory_severity")]
    pub advisory_severity: Severity,

    /// Emit `serde::Serialize`/`Deserialize` impls that route through the
    /// generated routines
    #[serde(default = "default_serde_bridge")]
    pub serde_bridge: bool,
}

fn default_key_table_suffix() -> String {
    "CodingKeys".to_string()
}

fn default_advisory_severity() -> Severity {
    Severity::Warning
}

fn default_serde_bridge() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            key_table_suffix: default_key_table_suffix(),
            advisory_severity: default_advisory_severity(),
            serde_bridge: default_serde_bridge(),
        }
    }
}

impl GeneratorConfig {
    /// File looked up by [`GeneratorConfig::discover`]
    pub const FILE_NAME: &'static str = "codify.toml";

    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text. Empty text yields the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `codify.toml` from `dir`, falling back to defaults when absent
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(Self::FILE_NAME);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no codify.toml, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Reserved key table name for a type
    pub fn key_table_name(&self, type_name: &str) -> String {
        format!("{type_name}{}", self.key_table_suffix)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let suffix = &self.key_table_suffix;
        if suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "key_table_suffix must not be empty".to_string(),
            ));
        }
        if !suffix.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(ConfigError::Invalid(format!(
                "key_table_suffix `{suffix}` must only contain letters, digits and underscores"
            )));
        }
        Ok(())
    }
}
