//! codify-macros - Derive macro for codify
//!
//! This crate provides `#[derive(Codify)]`, which generates for a struct with
//! named fields:
//! - a `<Type>CodingKeys` enum mapping each stored field to its wire key
//! - `codify::Decodable` and `codify::Encodable` impls
//! - `serde::Serialize` / `serde::Deserialize` impls routed through them
//!
//! Generation is configured by a `codify.toml` next to the crate's
//! `Cargo.toml`, when present.

use codify_core::config::GeneratorConfig;
use codify_core::error::ConfigError;
use proc_macro::TokenStream;
use std::path::Path;
use syn::{DeriveInput, parse_macro_input};

/// Derive key table, decode and encode routines
///
/// # Example
///
/// ```ignore
/// use codify::Codify;
///
/// #[derive(Codify)]
/// #[codify(case = "snake_case")]
/// struct User {
///     user_name: String,
///     #[codify(rename = "nick")]
///     nickname: Option<String>,
///     #[codify(default = 18)]
///     age: u32,
/// }
/// ```
#[proc_macro_derive(Codify, attributes(codify))]
pub fn derive_codify(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").ok();

    expand(&input, load_config(manifest_dir.as_deref())).into()
}

/// Read `codify.toml` from the crate being compiled
fn load_config(manifest_dir: Option<&str>) -> Result<GeneratorConfig, ConfigError> {
    match manifest_dir {
        Some(dir) => GeneratorConfig::discover(Path::new(dir)),
        None => Ok(GeneratorConfig::default()),
    }
}

fn expand(
    input: &DeriveInput,
    config: Result<GeneratorConfig, ConfigError>,
) -> proc_macro2::TokenStream {
    match config {
        Ok(config) => codify_core::expand_derive(input, &config),
        Err(err) => syn::Error::new_spanned(&input.ident, format!("codify.toml: {err}")).to_compile_error(),
    }
}
