//! `codify expand`

use crate::source::{self, SourceFile};
use anyhow::{Result, bail};
use codify_core::config::GeneratorConfig;
use codify_core::diagnostic::DiagnosticSink;
use codify_core::emit;
use codify_core::orchestrator;
use codify_logging::TracingSink;
use proc_macro2::TokenStream;
use std::path::Path;

/// Generated code for one type
#[derive(Debug)]
pub struct Expansion {
    pub type_name: String,
    pub tokens: TokenStream,
}

pub fn run(input: &str, type_name: Option<&str>, config: &GeneratorConfig) -> Result<()> {
    let source = source::parse_source_file(Path::new(input))?;
    let expansions = expand_source(&source, type_name, config)?;

    for expansion in &expansions {
        println!("// ---- {} ----", expansion.type_name);
        println!("{}", expansion.tokens);
        println!();
    }
    Ok(())
}

/// Expand each type deriving `Codify`, or only `type_name` when given.
///
/// Diagnostics are logged through `tracing` and also rendered into the
/// tokens, exactly as the derive would.
pub fn expand_source(
    source: &SourceFile,
    type_name: Option<&str>,
    config: &GeneratorConfig,
) -> Result<Vec<Expansion>> {
    let sink = TracingSink;
    let mut expansions = Vec::new();

    for ty in source.derived() {
        let name = ty.name();
        if type_name.is_some_and(|wanted| wanted != name) {
            continue;
        }

        let lowered = source.lower(ty, config);
        for spanned in &lowered.parsed.diagnostics {
            sink.report(&name, &spanned.diagnostic);
        }

        let mut diagnostics = lowered.parsed.diagnostics.clone();
        if let Some(conflict) = &lowered.conflict {
            sink.report(&name, conflict);
            diagnostics.push(lowered.parsed.spanned(conflict));
        }

        let tokens = if lowered.blocks_generation() {
            emit::render_diagnostics(&diagnostics)
        } else {
            let outcome = orchestrator::generate_with_sink(&lowered.parsed.decl, config, &sink);
            emit::render(&ty.input, &lowered.parsed, &outcome, config)
        };
        expansions.push(Expansion {
            type_name: name,
            tokens,
        });
    }

    if let Some(wanted) = type_name
        && expansions.is_empty()
    {
        bail!(
            "No type `{}` deriving Codify in {}",
            wanted,
            source.path.display()
        );
    }
    Ok(expansions)
}
