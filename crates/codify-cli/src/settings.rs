//! Generator configuration for CLI runs

use anyhow::{Context, Result};
use codify_core::config::GeneratorConfig;
use std::path::Path;

/// Load an explicit config file, or `codify.toml` from the working directory when present
pub fn load(path: Option<&str>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config: {path}")),
        None => GeneratorConfig::discover(Path::new("."))
            .context("Failed to load codify.toml from the current directory"),
    }
}
