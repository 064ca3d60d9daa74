//! `codify keys`

use crate::source::{self, SourceFile};
use anyhow::{Context, Result};
use codify_core::config::GeneratorConfig;
use codify_core::orchestrator;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Output format for `codify keys`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Key table of one type as printed by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyListing {
    #[serde(rename = "type")]
    pub type_name: String,
    pub table: String,
    /// `false` when the type declares its table with `manual_keys`
    pub generated: bool,
    pub keys: Vec<KeyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyEntry {
    pub field: String,
    pub key: String,
}

pub fn run(input: &str, format: Format, config: &GeneratorConfig) -> Result<()> {
    let source = source::parse_source_file(Path::new(input))?;
    let listings = list_keys(&source, config);

    let output = match format {
        Format::Text => render_text(&listings),
        Format::Json => {
            serde_json::to_string_pretty(&listings).context("Failed to serialize key tables")?
        }
    };
    println!("{output}");
    Ok(())
}

/// Key tables for every type in `source` that generates cleanly
pub fn list_keys(source: &SourceFile, config: &GeneratorConfig) -> Vec<KeyListing> {
    let mut listings = Vec::new();

    for ty in source.derived() {
        let lowered = source.lower(ty, config);
        if lowered.blocks_generation() {
            tracing::warn!(type_name = %ty.name(), "skipped, run `codify check` for details");
            continue;
        }

        let decl = &lowered.parsed.decl;
        let outcome = orchestrator::generate(decl, config);
        if outcome.is_failed() {
            tracing::warn!(type_name = %ty.name(), "skipped, run `codify check` for details");
            continue;
        }

        let listing = match &outcome.artifacts.key_table {
            Some(table) => KeyListing {
                type_name: outcome.type_name.clone(),
                table: table.name.clone(),
                generated: true,
                keys: table
                    .entries
                    .iter()
                    .map(|entry| KeyEntry {
                        field: entry.field_name.clone(),
                        key: entry.wire_key.clone(),
                    })
                    .collect(),
            },
            None => KeyListing {
                type_name: outcome.type_name.clone(),
                table: outcome.key_table_name.clone(),
                generated: false,
                keys: Vec::new(),
            },
        };
        listings.push(listing);
    }

    listings
}

pub fn render_text(listings: &[KeyListing]) -> String {
    let mut out = String::new();
    for listing in listings {
        let _ = writeln!(out, "{} ({})", listing.table, listing.type_name);
        if !listing.generated {
            let _ = writeln!(out, "  declared by hand");
            continue;
        }
        for entry in &listing.keys {
            let _ = writeln!(out, "  {} => \"{}\"", entry.field, entry.key);
        }
    }
    out
}
